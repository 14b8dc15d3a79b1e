use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use salvo_arena::audit::{verify_round, RoundRecord};
use salvo_arena::game::{
    generate_shots, process_salvo, transition, validate_placement, GameConfig, GameEvent, GameId,
    GameState, GameStatus, PlayerState, ShipSize, TransitionContext, WalletAddress,
};
use salvo_arena::Seed;

// Eight ships spread across the board, two per row pair.
fn fleet() -> Vec<PlayerState> {
    let starts = [0i64, 3, 5, 8, 15, 18, 20, 23];
    starts
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            PlayerState::new(
                WalletAddress::parse(&format!("wallet-{}", i)).unwrap(),
                validate_placement(&[s, s + 1], ShipSize::Two).unwrap(),
            )
        })
        .collect()
}

fn bench_generate_shots(c: &mut Criterion) {
    let seed = Seed::from_bytes([0xa5; 32]);

    c.bench_function("generate_shots_5", |b| {
        b.iter(|| generate_shots(black_box(&seed), black_box(5)))
    });

    c.bench_function("generate_shots_25", |b| {
        b.iter(|| generate_shots(black_box(&seed), black_box(25)))
    });
}

fn bench_process_salvo(c: &mut Criterion) {
    let seed = Seed::from_bytes([0x3c; 32]);
    let players = fleet();

    c.bench_function("process_salvo_8_players", |b| {
        b.iter(|| process_salvo(black_box(&seed), 5, black_box(&players)))
    });
}

fn bench_transition(c: &mut Criterion) {
    let config = GameConfig::default();
    let players = fleet();
    let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    let state = GameState { status: GameStatus::Active, round: 1, ..GameState::new() };
    let survivors: Vec<WalletAddress> = players.iter().map(|p| p.wallet.clone()).collect();
    let event = GameEvent::SalvoComplete { seed: Seed::from_bytes([1; 32]), survivors };

    c.bench_function("transition_salvo_complete", |b| {
        b.iter(|| {
            let ctx = TransitionContext::new(&config, &players, now);
            transition(black_box(&state), black_box(&event), &ctx)
        })
    });
}

fn bench_verify_round(c: &mut Criterion) {
    let seed = Seed::from_bytes([0x77; 32]);
    let players = fleet();
    let result = process_salvo(&seed, 5, &players).unwrap();
    let record = RoundRecord::new(GameId::from_bytes([1; 16]), 1, seed, 5, &players, &result);

    c.bench_function("verify_round", |b| {
        b.iter(|| verify_round(black_box(&record)))
    });
}

criterion_group!(
    benches,
    bench_generate_shots,
    bench_process_salvo,
    bench_transition,
    bench_verify_round
);
criterion_main!(benches);

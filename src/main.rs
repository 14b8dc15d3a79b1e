//! Salvo Arena Demo
//!
//! Plays one complete game in-process with simulated collaborators:
//! notifications and payouts are logged, timers fire on a virtual clock,
//! and every salvo is recorded and re-verified at the end.

use std::collections::VecDeque;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use salvo_arena::{
    VERSION, CellIndex, Seed,
    audit::{verify_transcript, GameTranscript, RoundRecord},
    game::{
        apply_salvo, process_salvo, transition, valid_placements,
        GameConfig, GameEvent, GameId, GameState, GameStatus, Placement, PlayerState,
        SideEffect, TransitionContext, WalletAddress,
    },
};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Salvo Arena engine v{}", VERSION);

    let config = GameConfig::from_env().context("loading game config")?;
    info!(
        "Config: {} players, ship size {}, {} shots per salvo, {} rounds max",
        config.max_players,
        config.ship_size.cells(),
        config.shots_per_salvo,
        config.max_rounds
    );

    let mut table = DemoTable::new(GameId::new_v4(), config, [0x5a; 32]);
    table.run()?;

    verify_transcript(&table.transcript).context("transcript failed verification")?;
    info!("=== Verified {} round(s) ===", table.transcript.rounds.len());
    info!("Transcript digest: {}", table.transcript.digest_hex());

    let summary = serde_json::json!({
        "game_id": table.game_id.to_string(),
        "state": table.state,
        "transcript_digest": table.transcript.digest_hex(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Stand-in orchestrator: owns persisted state and plays every collaborator.
struct DemoTable {
    game_id: GameId,
    config: GameConfig,
    beacon: [u8; 32],
    state: GameState,
    players: Vec<PlayerState>,
    transcript: GameTranscript,
    clock: DateTime<Utc>,
    queue: VecDeque<GameEvent>,
    /// Timer owned by this game; replaced or cancelled explicitly.
    timer: Option<(DateTime<Utc>, GameEvent)>,
}

impl DemoTable {
    fn new(game_id: GameId, config: GameConfig, beacon: [u8; 32]) -> Self {
        let clock = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default();
        Self {
            game_id,
            state: GameState::open(clock, &config),
            transcript: GameTranscript::new(game_id, config.clone()),
            config,
            beacon,
            players: Vec::new(),
            clock,
            queue: VecDeque::new(),
            timer: None,
        }
    }

    fn run(&mut self) -> Result<()> {
        info!("=== Opening game {} ===", self.game_id);

        for i in 0..self.config.max_players {
            let wallet = WalletAddress::parse(&format!("wallet-{:02}", i + 1))?;
            let start = CellIndex::new((i as i64 * 7) % 25)?;
            let position = self.pick_placement(start, i)?;
            info!("{} places ship at {}", wallet, position);

            let player = PlayerState::new(wallet.clone(), position)
                .with_handle(format!("captain-{}", i + 1));
            self.players.push(player);
            self.queue.push_back(GameEvent::PlayerJoined { wallet });
            self.drain()?;
        }

        while !self.state.is_finished() {
            match self.timer.take() {
                Some((at, event)) => {
                    self.clock = at;
                    self.queue.push_back(event);
                    self.drain()?;
                }
                None => bail!("game stalled in {} with no pending timer", self.state.status),
            }
        }

        info!("=== Game {} finished: {} ===", self.game_id, self.state.status);
        Ok(())
    }

    /// Feed queued events through the state machine until none remain.
    fn drain(&mut self) -> Result<()> {
        while let Some(event) = self.queue.pop_front() {
            let before = self.state.status;
            let ctx = TransitionContext::new(&self.config, &self.players, self.clock);
            let next = transition(&self.state, &event, &ctx)?;
            self.state = next.state;

            if before == GameStatus::Repositioning && self.state.status != GameStatus::Repositioning {
                self.timer = None;
            }

            for effect in next.effects {
                self.execute(effect)?;
            }

            if before == GameStatus::Active && self.state.status == GameStatus::Repositioning {
                self.submit_repositions()?;
            }
        }
        Ok(())
    }

    fn execute(&mut self, effect: SideEffect) -> Result<()> {
        match effect {
            SideEffect::NotifyPlayers { message, wallets: None } => info!("[notify all] {}", message),
            SideEffect::NotifyPlayers { message, wallets: Some(wallets) } => {
                info!("[notify {} player(s)] {}", wallets.len(), message)
            }
            SideEffect::PostTweet { content } => info!("[announce] {}", content),
            SideEffect::ProcessPayouts { winners } => {
                let pot = self.config.pot(self.players.len());
                let share = pot / winners.len().max(1) as u64;
                for winner in &winners {
                    info!("[payout] {} receives {}", winner, share);
                }
            }
            SideEffect::ProcessRefunds { wallets } => {
                for wallet in &wallets {
                    info!("[refund] {} refunded {}", wallet, self.config.entry_fee);
                }
            }
            SideEffect::ScheduleTimeout { duration_ms, event } => {
                let at = self.clock + Duration::milliseconds(duration_ms as i64);
                info!("[timer] {} scheduled at {}", event, at);
                self.timer = Some((at, event));
            }
            SideEffect::TriggerSalvo => self.fire_salvo()?,
        }
        Ok(())
    }

    fn fire_salvo(&mut self) -> Result<()> {
        let round = self.state.round;
        let seed = Seed::derive(&self.beacon, self.game_id.as_bytes(), round);
        let result = process_salvo(&seed, self.config.shots_per_salvo as usize, &self.players)?;

        let shots: Vec<String> = result.shots.iter().map(|c| c.label()).collect();
        info!("Round {} salvo [{}] fires at {}", round, seed, shots.join(" "));
        for wallet in &result.eliminations {
            info!("{} eliminated in round {}", wallet, round);
        }

        let record = RoundRecord::new(
            self.game_id,
            round,
            seed,
            self.config.shots_per_salvo,
            &self.players,
            &result,
        );
        info!("Round {} record digest {}", round, record.digest_hex());

        apply_salvo(&mut self.players, &result, round);
        self.transcript.push(record)?;
        self.queue.push_back(GameEvent::SalvoComplete {
            seed,
            survivors: result.survivors,
        });
        Ok(())
    }

    /// Every other survivor moves; the rest wait for the timeout.
    fn submit_repositions(&mut self) -> Result<()> {
        let round = self.state.round;
        let movers: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .step_by(2)
            .collect();

        for i in movers {
            let start = CellIndex::new((i as i64 * 11 + round as i64 * 3) % 25)?;
            let placement = self.pick_placement(start, i + round as usize)?;
            let player = &mut self.players[i];
            match player.reposition(placement.clone(), round) {
                Ok(()) => {
                    info!("{} moves to {}", player.wallet, placement);
                    self.queue.push_back(GameEvent::RepositionSubmitted {
                        wallet: player.wallet.clone(),
                        position: placement,
                    });
                }
                Err(e) => warn!("{} cannot move: {}", player.wallet, e),
            }
        }
        Ok(())
    }

    fn pick_placement(&self, start: CellIndex, salt: usize) -> Result<Placement> {
        let options = valid_placements(start, self.config.ship_size);
        let cells = options
            .get(salt % options.len().max(1))
            .context("no placement fits from start cell")?;
        Ok(Placement::from_cells(cells, self.config.ship_size)?)
    }
}

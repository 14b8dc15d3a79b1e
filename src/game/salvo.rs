//! Salvo Engine
//!
//! Derives each round's shot cells from a seed and resolves hits and
//! eliminations against a snapshot of players.
//!
//! ## Shot Selection
//!
//! The seed is walked in 16-bit chunks (wrapping after 16). Each chunk,
//! reduced modulo the number of cells not yet chosen, picks the next cell
//! by counting forward through the unchosen cells in ascending order.
//! Every remaining cell is reachable at each draw, and the result depends
//! on nothing but the seed and the shot count.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::debug;

use crate::core::grid::{CellIndex, CELL_COUNT};
use crate::core::seed::{Seed, SeedError};
use crate::game::identity::WalletAddress;
use crate::game::state::PlayerState;

/// Salvo input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SalvoError {
    /// Seed was not 64 hex characters.
    #[error("invalid seed: {0}")]
    InvalidSeed(#[from] SeedError),

    /// Shot count outside `[1, 25]`.
    #[error("shot count {0} is outside 1-25")]
    InvalidShotCount(usize),
}

/// Outcome of one salvo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalvoResult {
    /// Fired cells, ascending
    pub shots: Vec<CellIndex>,

    /// New cells hit this round, per player with at least one
    pub hits: BTreeMap<WalletAddress, Vec<CellIndex>>,

    /// Players eliminated this round
    pub eliminations: Vec<WalletAddress>,

    /// Active players left standing after this round
    pub survivors: Vec<WalletAddress>,
}

/// Generate `count` unique shot cells from `seed`, sorted ascending.
pub fn generate_shots(seed: &Seed, count: usize) -> Result<Vec<CellIndex>, SalvoError> {
    if count == 0 || count > CELL_COUNT as usize {
        return Err(SalvoError::InvalidShotCount(count));
    }

    let mut remaining: Vec<CellIndex> = CellIndex::all().collect();
    let mut shots = Vec::with_capacity(count);

    for draw in 0..count {
        let pick = seed.chunk(draw) as usize % remaining.len();
        shots.push(remaining.remove(pick));
    }

    shots.sort_unstable();
    Ok(shots)
}

/// Parse `seed` and generate shots in one step.
pub fn generate_shots_hex(seed: &str, count: usize) -> Result<Vec<CellIndex>, SalvoError> {
    let seed = Seed::parse(seed)?;
    generate_shots(&seed, count)
}

/// Fire a salvo at `players` and report what it did.
///
/// Eliminated players are skipped. A player's new hits are the fired
/// cells on their position not already in their hit list; they are
/// eliminated once earlier hits on the current position plus new hits
/// cover the whole position.
/// Player records are not modified (see [`apply_salvo`]).
pub fn process_salvo(
    seed: &Seed,
    shot_count: usize,
    players: &[PlayerState],
) -> Result<SalvoResult, SalvoError> {
    let shots = generate_shots(seed, shot_count)?;
    let mut result = SalvoResult {
        shots,
        ..SalvoResult::default()
    };

    for player in players.iter().filter(|p| p.is_active()) {
        let new_hits: Vec<CellIndex> = calculate_hits(player.position.cells(), &result.shots)
            .into_iter()
            .filter(|c| player.hits.binary_search(c).is_err())
            .collect();

        // Hits left behind on an earlier position do not count against the current ship.
        let struck = player.position.len() - player.unhit_cells().len();
        let sunk = struck + new_hits.len() >= player.position.len();
        if !new_hits.is_empty() {
            result.hits.insert(player.wallet.clone(), new_hits);
        }

        if sunk {
            result.eliminations.push(player.wallet.clone());
        } else {
            result.survivors.push(player.wallet.clone());
        }
    }

    debug!(
        seed = %seed,
        shots = result.shots.len(),
        hit_players = result.hits.len(),
        eliminated = result.eliminations.len(),
        survivors = result.survivors.len(),
        "Salvo resolved"
    );

    Ok(result)
}

/// Apply a salvo result to player records for `round`.
pub fn apply_salvo(players: &mut [PlayerState], result: &SalvoResult, round: u32) {
    for player in players.iter_mut() {
        if let Some(cells) = result.hits.get(&player.wallet) {
            player.record_hits(cells);
        }
        if result.eliminations.contains(&player.wallet) {
            player.eliminate(round);
        }
    }
}

/// Would a ship at `position` be struck by any of `shots`?
pub fn would_be_hit(position: &[CellIndex], shots: &[CellIndex]) -> bool {
    position.iter().any(|c| shots.contains(c))
}

/// Cells of `position` struck by `shots`, in position order.
pub fn calculate_hits(position: &[CellIndex], shots: &[CellIndex]) -> Vec<CellIndex> {
    position.iter().copied().filter(|c| shots.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::placement::{validate_placement, ShipSize};

    fn cell(i: i64) -> CellIndex {
        CellIndex::new(i).unwrap()
    }

    fn cells(raw: &[i64]) -> Vec<CellIndex> {
        raw.iter().map(|&i| cell(i)).collect()
    }

    fn seed(c: char) -> Seed {
        Seed::parse(&c.to_string().repeat(64)).unwrap()
    }

    fn player(wallet: &str, position: &[i64]) -> PlayerState {
        let size = ShipSize::try_from(position.len() as u8).unwrap();
        PlayerState::new(
            WalletAddress::parse(wallet).unwrap(),
            validate_placement(position, size).unwrap(),
        )
    }

    fn wallet(w: &str) -> WalletAddress {
        WalletAddress::parse(w).unwrap()
    }

    #[test]
    fn test_known_shots() {
        // Every chunk is 0xaaaa = 43690.
        // These values must never change! Published audits depend on them.
        let shots = generate_shots(&seed('a'), 5).unwrap();
        assert_eq!(shots, cells(&[10, 11, 14, 15, 23]));
    }

    #[test]
    fn test_zero_seed_picks_lowest() {
        let shots = generate_shots(&seed('0'), 5).unwrap();
        assert_eq!(shots, cells(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_shots_deterministic() {
        let s = Seed::parse(&"3f9a".repeat(16)).unwrap();
        for count in 1..=25 {
            assert_eq!(generate_shots(&s, count).unwrap(), generate_shots(&s, count).unwrap());
        }
    }

    #[test]
    fn test_full_board() {
        let shots = generate_shots(&seed('7'), 25).unwrap();
        assert_eq!(shots, CellIndex::all().collect::<Vec<_>>());
    }

    #[test]
    fn test_shot_count_bounds() {
        assert_eq!(generate_shots(&seed('a'), 0), Err(SalvoError::InvalidShotCount(0)));
        assert_eq!(generate_shots(&seed('a'), 26), Err(SalvoError::InvalidShotCount(26)));
    }

    #[test]
    fn test_hex_entry_point() {
        assert_eq!(
            generate_shots_hex(&"A".repeat(64), 5).unwrap(),
            generate_shots(&seed('a'), 5).unwrap()
        );
        assert!(matches!(
            generate_shots_hex("abc", 5),
            Err(SalvoError::InvalidSeed(SeedError::WrongLength(3)))
        ));
    }

    #[test]
    fn test_process_salvo_outcomes() {
        // shots for seed 'a' x5: [10, 11, 14, 15, 23]
        let mut hit_once = player("hit", &[14, 19]);
        hit_once.record_hits(&[cell(19)]);
        let players = vec![
            player("sunk", &[10, 11]),
            player("grazed", &[15, 16]),
            player("missed", &[0, 1]),
            hit_once,
        ];

        let result = process_salvo(&seed('a'), 5, &players).unwrap();

        assert_eq!(result.eliminations, vec![wallet("sunk"), wallet("hit")]);
        assert_eq!(result.survivors, vec![wallet("grazed"), wallet("missed")]);
        assert_eq!(result.hits.get(&wallet("sunk")), Some(&cells(&[10, 11])));
        assert_eq!(result.hits.get(&wallet("grazed")), Some(&cells(&[15])));
        assert_eq!(result.hits.get(&wallet("hit")), Some(&cells(&[14])));
        assert!(!result.hits.contains_key(&wallet("missed")));
    }

    #[test]
    fn test_process_salvo_skips_eliminated() {
        let mut dead = player("dead", &[10, 11]);
        dead.eliminate(1);
        let players = vec![dead, player("alive", &[0, 1])];

        let result = process_salvo(&seed('a'), 5, &players).unwrap();
        assert!(!result.hits.contains_key(&wallet("dead")));
        assert!(!result.eliminations.contains(&wallet("dead")));
        assert!(!result.survivors.contains(&wallet("dead")));
        assert_eq!(result.survivors, vec![wallet("alive")]);
    }

    #[test]
    fn test_already_hit_cells_not_recounted() {
        let mut p = player("p", &[10, 5]);
        p.record_hits(&[cell(10)]);
        let result = process_salvo(&seed('a'), 5, &[p]).unwrap();
        assert!(result.hits.is_empty());
        assert_eq!(result.survivors, vec![wallet("p")]);
    }

    #[test]
    fn test_old_hits_do_not_sink_moved_ship() {
        // shots for seed 'a' x5: [10, 11, 14, 15, 23]
        let mut p = player("p", &[0, 1]);
        p.record_hits(&[cell(0)]);
        p.reposition(validate_placement(&[14, 19], ShipSize::Two).unwrap(), 1).unwrap();

        let mut players = vec![p];
        let result = process_salvo(&seed('a'), 5, &players).unwrap();
        assert_eq!(result.hits.get(&wallet("p")), Some(&cells(&[14])));
        assert!(result.eliminations.is_empty());
        assert_eq!(result.survivors, vec![wallet("p")]);

        apply_salvo(&mut players, &result, 2);
        assert!(!players[0].is_eliminated);
        assert_eq!(players[0].hits, cells(&[0, 14]));
        assert_eq!(players[0].unhit_cells(), cells(&[19]));

        // Finishing off the remaining cell sinks it.
        let result = process_salvo(&Seed::parse(&"0013".repeat(16)).unwrap(), 1, &players).unwrap();
        assert_eq!(result.shots, cells(&[19]));
        assert_eq!(result.eliminations, vec![wallet("p")]);
    }

    #[test]
    fn test_apply_salvo() {
        let mut players = vec![player("a", &[10, 11]), player("b", &[15, 16])];
        let result = process_salvo(&seed('a'), 5, &players).unwrap();
        apply_salvo(&mut players, &result, 3);

        assert!(players[0].is_eliminated);
        assert_eq!(players[0].eliminated_round, Some(3));
        assert_eq!(players[0].hits, cells(&[10, 11]));
        assert!(!players[1].is_eliminated);
        assert_eq!(players[1].hits, cells(&[15]));
    }

    #[test]
    fn test_hit_helpers() {
        let position = cells(&[7, 12]);
        assert!(would_be_hit(&position, &cells(&[1, 12])));
        assert!(!would_be_hit(&position, &cells(&[1, 2])));
        assert_eq!(calculate_hits(&position, &cells(&[7, 12, 13])), position);
        assert!(calculate_hits(&position, &[]).is_empty());
    }
}

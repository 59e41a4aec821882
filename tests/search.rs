use std::rc::Rc;

use antichess::chess::position::Position;
use antichess::chess::zobrist::ZobristKeys;
use antichess::search::transposition::DEFAULT_CAPACITY;
use antichess::search::{Difficulty, Searcher};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const PLAYOUTS: u64 = 32;
const PLIES: usize = 60;

/// Plays random legal moves until the game ends or the ply limit is hit,
/// calling `check` on every position on the way.
fn random_playout(seed: u64, mut check: impl FnMut(&mut Position)) -> Position {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut position = Position::starting(Rc::new(ZobristKeys::seeded(seed)));
    for _ in 0..PLIES {
        check(&mut position);
        if position.is_terminal() {
            break;
        }
        let moves = position.generate_moves();
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        let _ = position.make_move(mv);
    }
    position
}

#[test]
fn incremental_hash_matches_recomputed() {
    for seed in 0..PLAYOUTS {
        let _ = random_playout(seed, |position| {
            assert_eq!(position.hash(), position.keys().hash(position.board()));
            // Every child has a consistent hash and unmaking restores the
            // parent exactly.
            let before = (position.to_string(), position.hash(), position.occurrences());
            for mv in position.generate_moves() {
                let child = position.apply(&mv);
                assert_eq!(child.hash(), child.keys().hash(child.board()));
            }
            assert_eq!(
                (position.to_string(), position.hash(), position.occurrences()),
                before
            );
        });
    }
}

#[test]
fn captures_are_forced() {
    for seed in 0..PLAYOUTS {
        let _ = random_playout(seed, |position| {
            let moves = position.generate_moves();
            if moves.iter().any(|mv| mv.is_capture()) {
                assert!(moves.iter().all(|mv| mv.is_capture()), "{position}");
                let mut forced = position.forced_pieces();
                let mut movers: Vec<_> = moves.iter().map(|mv| mv.from()).collect();
                forced.sort();
                movers.sort();
                movers.dedup();
                assert_eq!(forced, movers, "{position}");
            } else {
                assert!(position.forced_pieces().is_empty());
            }
        });
    }
}

#[test]
fn selected_moves_are_legal() {
    for seed in 0..8 {
        let mut position = random_playout(seed, |_| {});
        if position.is_terminal() {
            continue;
        }
        let mut searcher = Searcher::new(Difficulty::try_from(2).unwrap(), DEFAULT_CAPACITY);
        let before = position.to_string();
        let result = searcher.select_move(&mut position);
        let best_move = result.best_move.unwrap();
        assert!(position.generate_moves().contains(&best_move), "{position}");
        assert_eq!(position.to_string(), before);
    }
}

#[test]
fn small_table_still_works() {
    let mut position = Position::starting(Rc::new(ZobristKeys::seeded(5)));
    let mut bounded = Searcher::new(Difficulty::try_from(3).unwrap(), 16);
    let mut unbounded = Searcher::new(Difficulty::try_from(3).unwrap(), DEFAULT_CAPACITY);
    let bounded_result = bounded.select_move(&mut position);
    let unbounded_result = unbounded.select_move(&mut position);
    assert!(bounded.table().len() <= 16);
    assert_eq!(bounded_result.score, unbounded_result.score);
}

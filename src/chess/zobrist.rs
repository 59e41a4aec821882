//! Zobrist hashing-related utilities.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, BOARD_SIZE};
use crate::chess::piece::Piece;

/// Zobrist keys are 64-bit unsigned integers that are computed once position is
/// created and updated whenever a move is made.
pub type Key = u64;

const KIND_COLORS: usize = 2 * PieceKind::ALL.len();

/// Random keys for every (square, kind, color) combination plus the
/// side-to-move key. Drawn once per engine and never changed afterwards.
#[derive(Clone)]
pub struct ZobristKeys {
    pieces: [[Key; KIND_COLORS]; BOARD_SIZE as usize],
    black_to_move: Key,
}

impl ZobristKeys {
    /// Draws all keys from the given generator.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut pieces = [[0; KIND_COLORS]; BOARD_SIZE as usize];
        for square_keys in &mut pieces {
            rng.fill(square_keys);
        }
        Self {
            pieces,
            black_to_move: rng.next_u64(),
        }
    }

    /// Keys from the thread-local entropy source.
    #[must_use]
    pub fn random() -> Self {
        Self::new(&mut rand::thread_rng())
    }

    /// Reproducible keys, used by tests and benchmarks.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Key of the piece standing on its current square.
    #[must_use]
    pub fn piece(&self, piece: &Piece) -> Key {
        self.pieces[piece.square().index()][kind_color_index(piece.kind(), piece.owner())]
    }

    /// Key XORed into table keys when Black is to move.
    #[must_use]
    pub const fn black_to_move(&self) -> Key {
        self.black_to_move
    }

    /// Fingerprint of the placement computed from scratch.
    #[must_use]
    pub fn hash(&self, board: &Board) -> Key {
        board.pieces().fold(0, |hash, piece| hash ^ self.piece(piece))
    }
}

/// Kinds of White pieces come first, Black ones are offset by the number of
/// kinds.
const fn kind_color_index(kind: PieceKind, owner: Player) -> usize {
    match owner {
        Player::White => kind.index(),
        Player::Black => kind.index() + PieceKind::ALL.len(),
    }
}

/// Number of times each placement occurred in the current game.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    table: HashMap<Key, u8>,
}

impl RepetitionTable {
    /// Creates an empty repetition table.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers one more occurrence of the position and returns how many
    /// times it has been seen.
    pub(crate) fn record(&mut self, key: Key) -> u8 {
        let count = self.table.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Reverts [`RepetitionTable::record`].
    pub(crate) fn remove(&mut self, key: Key) {
        if let Some(count) = self.table.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                let _ = self.table.remove(&key);
            }
        }
    }

    #[must_use]
    pub(crate) fn count(&self, key: Key) -> u8 {
        self.table.get(&key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Square;

    #[test]
    fn keys_are_reproducible() {
        let board = Board::starting();
        assert_eq!(
            ZobristKeys::seeded(42).hash(&board),
            ZobristKeys::seeded(42).hash(&board)
        );
        assert_ne!(
            ZobristKeys::seeded(42).hash(&board),
            ZobristKeys::seeded(43).hash(&board)
        );
        assert_eq!(ZobristKeys::seeded(1).hash(&Board::empty()), 0);
    }

    #[test]
    fn colors_have_distinct_keys() {
        let keys = ZobristKeys::seeded(7);
        let white = Piece::new(Player::White, PieceKind::Rook, Square::A1);
        let black = Piece::new(Player::Black, PieceKind::Rook, Square::A1);
        assert_ne!(keys.piece(&white), keys.piece(&black));
        assert_eq!(kind_color_index(PieceKind::Pawn, Player::Black), 6);
        assert_eq!(kind_color_index(PieceKind::King, Player::White), 5);
    }

    #[test]
    fn repetition_table() {
        let mut table = RepetitionTable::new();
        assert_eq!(table.count(1), 0);
        assert_eq!(table.record(1), 1);
        assert_eq!(table.record(2), 1);
        assert_eq!(table.record(1), 2);
        assert_eq!(table.count(1), 2);
        table.remove(1);
        assert_eq!(table.count(1), 1);
        table.remove(1);
        table.remove(2);
        assert_eq!(table.count(1), 0);
        assert!(table.table.is_empty());
    }
}

//! This module implements "static" [evaluation], i.e. predicting the value of
//! a position without [`crate::search`].
//!
//! Antichess inverts the usual material logic: giving pieces away is the
//! goal, so the evaluator does not count material. Instead it sums, over every
//! piece of both sides, the capture scores of the candidate moves cached by
//! the last lookahead pass (see [`crate::chess::movegen::refresh_candidates`]).
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

use std::fmt;
use std::ops::Neg;

use crate::chess::board::Board;
use crate::chess::core::Move;

/// A thin wrapper around `i32` ordering positions from the automated player's
/// point of view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    value: i32,
}

impl Score {
    /// Bound no evaluation can reach, used as the initial search window.
    pub const INFINITY: Self = Self {
        value: 1_000_000_000,
    };
    /// Score of a drawn position.
    pub const DRAW: Self = Self { value: 0 };

    #[allow(missing_docs)]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.value
    }
}

impl Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { value: -self.value }
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        debug_assert!(value.abs() < Self::INFINITY.value);
        Self { value }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Score of a single move: the capture score of the piece it would take, zero
/// for quiet moves.
#[must_use]
pub fn move_score(mv: &Move) -> i32 {
    mv.captured().map_or(0, |kind| kind.capture_score())
}

/// Sums the scores of all cached candidates on the board. The caches have to
/// be refreshed for the board first.
#[must_use]
pub fn evaluate(board: &Board) -> Score {
    Score::from(
        board
            .pieces()
            .flat_map(|piece| piece.candidates())
            .map(move_score)
            .sum::<i32>(),
    )
}

//! Choosing the piece a pawn on the farthest rank turns into.
//!
//! The automated player tries every kind and keeps the one the evaluator
//! likes best, a human player is asked through [`PromotionChooser`].

use crate::chess::core::{Promotion, Square};
use crate::chess::position::Position;
use crate::evaluation::{evaluate, Score};

/// Supplies the promotion kind for a human player's pawn (e.g. a dialog).
pub trait PromotionChooser {
    /// Picks the kind the pawn on `square` is promoted to.
    fn choose(&mut self, position: &Position, square: Square) -> Promotion;
}

/// A kind decided in advance, e.g. the suffix of a move in coordinate
/// notation.
impl PromotionChooser for Promotion {
    fn choose(&mut self, _position: &Position, _square: Square) -> Promotion {
        *self
    }
}

/// Tries each kind in [`Promotion::ALL`] order on a copy of the position and
/// returns the first one with the highest evaluation.
#[must_use]
pub fn best_promotion(position: &Position, square: Square, lookahead: usize) -> Promotion {
    let mut best = (Promotion::Queen, -Score::INFINITY);
    for promotion in Promotion::ALL {
        let mut candidate = position.clone();
        candidate.promote(square, promotion);
        candidate.refresh_candidates(lookahead);
        let score = evaluate(candidate.board());
        tracing::trace!(%promotion, %score, "promotion candidate");
        if score > best.1 {
            best = (promotion, score);
        }
    }
    best.0
}

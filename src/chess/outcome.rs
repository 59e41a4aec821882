//! Game-over and draw detection.

use std::fmt;

use crate::chess::core::Player;

/// Repeating the same placement this many times is a draw.
pub const REPETITION_LIMIT: u8 = 3;

/// Half-moves without a pawn move or a capture after which the game is drawn.
pub const FIFTY_MOVE_LIMIT: u8 = 50;

/// Why the game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The winner has no pieces left.
    NoPiecesLeft,
    /// The winner was to move and had no legal moves.
    Stalemate,
    #[allow(missing_docs)]
    ThreefoldRepetition,
    #[allow(missing_docs)]
    FiftyMoveRule,
    /// The loser gave up.
    Resignation,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoPiecesLeft => "no pieces left",
            Self::Stalemate => "stalemate",
            Self::ThreefoldRepetition => "threefold repetition",
            Self::FiftyMoveRule => "fifty-move rule",
            Self::Resignation => "resignation",
        })
    }
}

/// Result of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// `None` for a draw.
    pub winner: Option<Player>,
    #[allow(missing_docs)]
    pub termination: Termination,
}

impl Outcome {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn win(winner: Player, termination: Termination) -> Self {
        Self {
            winner: Some(winner),
            termination,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn draw(termination: Termination) -> Self {
        Self {
            winner: None,
            termination,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Score in the usual notation: `1-0`, `0-1` or `1/2-1/2`.
    #[must_use]
    pub const fn score(&self) -> &'static str {
        match self.winner {
            Some(Player::White) => "1-0",
            Some(Player::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.score(), self.termination)
    }
}

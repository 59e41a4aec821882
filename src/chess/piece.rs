//! Pieces on the board and what each kind is capable of.
//!
//! Kind-specific behavior (movement pattern, the score of capturing it, the
//! symbol used in position notation) lives in a single capability table
//! indexed by [`PieceKind`] instead of being spread across `match`
//! expressions.

use std::fmt;

use anyhow::bail;
use arrayvec::ArrayVec;

use crate::chess::core::{Move, PieceKind, Player, Rank, Square};

/// The most destinations a single piece can have: a queen in the middle of an
/// empty board.
pub const MAX_DESTINATIONS: usize = 27;

/// Destination squares of a single piece.
pub type Destinations = ArrayVec<Square, MAX_DESTINATIONS>;

/// Cached candidate moves of a single piece, annotated with what they would
/// capture.
pub type Candidates = ArrayVec<Move, MAX_DESTINATIONS>;

/// `(files, ranks)` step.
pub(crate) type Offset = (i8, i8);

const DIAGONALS: [Offset; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const LINES: [Offset; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const ALL_DIRECTIONS: [Offset; 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_JUMPS: [Offset; 8] = [
    (2, -1),
    (2, 1),
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (1, 2),
    (-1, -2),
    (1, -2),
];

/// How a piece moves.
#[derive(Debug)]
pub(crate) enum Pattern {
    /// Pushes forward onto empty squares, captures diagonally forward.
    Pawn,
    /// Single step in each of the directions.
    Leap(&'static [Offset]),
    /// Rays in each of the directions, stopping at the first occupied square.
    Slide(&'static [Offset]),
}

/// Everything that depends on the kind of a piece.
#[derive(Debug)]
pub(crate) struct Capabilities {
    pub(crate) pattern: Pattern,
    /// Score of a move capturing a piece of this kind. Losing material is
    /// the goal of the game, so cheap captures are not necessarily good ones:
    /// taking a pawn or a queen is discouraged, taking a rook or a king is
    /// encouraged.
    pub(crate) capture_score: i32,
    /// Lowercase symbol in position notation.
    pub(crate) symbol: char,
}

static CAPABILITIES: [Capabilities; 6] = [
    Capabilities {
        pattern: Pattern::Pawn,
        capture_score: -3,
        symbol: 'p',
    },
    Capabilities {
        pattern: Pattern::Leap(&KNIGHT_JUMPS),
        capture_score: 2,
        symbol: 'n',
    },
    Capabilities {
        pattern: Pattern::Slide(&DIAGONALS),
        capture_score: 2,
        symbol: 'b',
    },
    Capabilities {
        pattern: Pattern::Slide(&LINES),
        capture_score: 3,
        symbol: 'r',
    },
    Capabilities {
        pattern: Pattern::Slide(&ALL_DIRECTIONS),
        capture_score: -2,
        symbol: 'q',
    },
    Capabilities {
        pattern: Pattern::Leap(&ALL_DIRECTIONS),
        capture_score: 4,
        symbol: 'k',
    },
];

impl PieceKind {
    pub(crate) fn capabilities(self) -> &'static Capabilities {
        &CAPABILITIES[self.index()]
    }

    /// Score of capturing a piece of this kind.
    #[must_use]
    pub fn capture_score(self) -> i32 {
        self.capabilities().capture_score
    }
}

/// A piece standing on the board.
///
/// Besides its identity, a piece remembers whether it has moved (pawns only
/// advance two squares from the starting rank if they did not) and keeps the
/// candidate moves computed by the last lookahead pass.
#[derive(Clone, Debug)]
pub struct Piece {
    owner: Player,
    kind: PieceKind,
    square: Square,
    has_moved: bool,
    candidates: Candidates,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub fn new(owner: Player, kind: PieceKind, square: Square) -> Self {
        Self {
            owner,
            kind,
            square,
            has_moved: false,
            candidates: Candidates::new(),
        }
    }

    /// Parses a piece from its symbol in position notation: uppercase for
    /// White, lowercase for Black.
    ///
    /// A pawn placed outside of its starting rank is considered to have moved
    /// already.
    pub fn from_symbol(symbol: char, square: Square) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let lowercase = symbol.to_ascii_lowercase();
        let Some(kind) = PieceKind::ALL
            .into_iter()
            .find(|kind| kind.capabilities().symbol == lowercase)
        else {
            bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'");
        };
        let mut piece = Self::new(owner, kind, square);
        piece.has_moved = kind == PieceKind::Pawn && square.rank() != Rank::pawns_starting(owner);
        Ok(piece)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Candidate moves cached by the last lookahead pass.
    #[must_use]
    pub fn candidates(&self) -> &[Move] {
        &self.candidates
    }

    pub(crate) fn set_candidates(&mut self, candidates: Candidates) {
        self.candidates = candidates;
    }

    /// Moves the piece to a new square. The caller is responsible for keeping
    /// the board consistent.
    pub(crate) fn relocate(&mut self, square: Square) {
        self.square = square;
        self.has_moved = true;
    }

    /// Restores the state of the piece before [`Piece::relocate`].
    pub(crate) fn restore(&mut self, square: Square, has_moved: bool) {
        self.square = square;
        self.has_moved = has_moved;
    }

    /// Symbol in position notation.
    #[must_use]
    pub fn symbol(&self) -> char {
        let symbol = self.kind.capabilities().symbol;
        match self.owner {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_scores() {
        assert_eq!(PieceKind::Pawn.capture_score(), -3);
        assert_eq!(PieceKind::Knight.capture_score(), 2);
        assert_eq!(PieceKind::Bishop.capture_score(), 2);
        assert_eq!(PieceKind::Queen.capture_score(), -2);
        assert_eq!(PieceKind::Rook.capture_score(), 3);
        assert_eq!(PieceKind::King.capture_score(), 4);
    }

    #[test]
    fn symbols() {
        for symbol in "KQRBNPkqrbnp".chars() {
            let piece = Piece::from_symbol(symbol, Square::D4).unwrap();
            assert_eq!(piece.symbol(), symbol);
            assert_eq!(piece.square(), Square::D4);
        }
        assert!(Piece::from_symbol('x', Square::D4).is_err());
        assert_eq!(
            Piece::from_symbol('n', Square::B8).unwrap().owner(),
            Player::Black
        );
    }

    #[test]
    fn moved_pawns() {
        assert!(!Piece::from_symbol('P', Square::E2).unwrap().has_moved());
        assert!(Piece::from_symbol('P', Square::E3).unwrap().has_moved());
        assert!(!Piece::from_symbol('p', Square::E7).unwrap().has_moved());
        assert!(Piece::from_symbol('p', Square::E2).unwrap().has_moved());
        assert!(!Piece::from_symbol('R', Square::E4).unwrap().has_moved());
    }

    #[test]
    fn relocation() {
        let mut knight = Piece::new(Player::White, PieceKind::Knight, Square::G1);
        knight.relocate(Square::F3);
        assert_eq!(knight.square(), Square::F3);
        assert!(knight.has_moved());
        knight.restore(Square::G1, false);
        assert_eq!(knight.square(), Square::G1);
        assert!(!knight.has_moved());
    }
}

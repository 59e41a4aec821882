//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A single ply: the piece standing on `from` goes to `to`, removing the
/// opponent's piece standing there (if any).
///
/// The captured piece kind is recorded when the move is generated: the
/// evaluator scores moves by what they would capture without looking at the
/// board again.
///
/// Moves are descriptions, they are only meaningful for the position they were
/// generated in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) captured: Option<PieceKind>,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square, captured: Option<PieceKind>) -> Self {
        Self { from, to, captured }
    }

    /// Square of the moving piece.
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn captured(&self) -> Option<PieceKind> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Checks whether the move goes between the same squares as the request,
    /// ignoring the promotion suffix.
    #[must_use]
    pub fn matches(&self, request: &MoveRequest) -> bool {
        self.from == request.from && self.to == request.to
    }
}

impl fmt::Display for Move {
    /// Serializes a move in coordinate notation (e.g. `e2e4`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A move as a human (or a GUI) sends it: origin, destination and the kind a
/// pawn should be promoted to if it reaches the farthest rank. Requests are
/// validated against the legal moves before they are played.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
    #[allow(missing_docs)]
    pub promotion: Option<Promotion>,
}

impl TryFrom<&str> for MoveRequest {
    type Error = anyhow::Error;

    /// Parses coordinate notation with an optional promotion suffix:
    /// `e2e4`, `b7b8k`.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        if !input.is_ascii() || !(4..=5).contains(&input.len()) {
            bail!("move should be 4 or 5 ASCII chars (e.g. e2e4, b7b8q), got '{input}'");
        }
        let from = Square::try_from(&input[0..2])?;
        let to = Square::try_from(&input[2..4])?;
        let promotion = match input.chars().nth(4) {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use antichess::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use antichess::chess::core::Square;
/// use std::mem;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Index of the square in `0..BOARD_SIZE`, used to address per-square
    /// tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Iterates over all squares from [`Square::A1`] to [`Square::H8`].
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).map(|index| unsafe { mem::transmute::<u8, Self>(index) })
    }

    /// Returns the square `files` columns to the right and `ranks` rows up, or
    /// `None` if that would step off the board.
    #[must_use]
    pub fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        let file = self.file() as i8 + files;
        let rank = self.rank() as i8 + ranks;
        if !(0..BOARD_WIDTH as i8).contains(&file) || !(0..BOARD_WIDTH as i8).contains(&rank) {
            return None;
        }
        Some(Self::new(
            File::try_from(file as u8).ok()?,
            Rank::try_from(rank as u8).ok()?,
        ))
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Files from left to right.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// Ranks from bottom (White's side) to top.
    pub const ALL: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// The rank pawns of given player start on.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The farthest rank for the player's pawns: reaching it promotes them.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        match player {
            Player::White => Self::Eight,
            Player::Black => Self::One,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A game is played between two players: White (having the advantage of the
/// first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank offset of a single pawn push.
    #[must_use]
    pub const fn push_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::White => 'w',
                Self::Black => 'b',
            }
        )
    }
}

/// Standard [chess pieces]. The discriminant doubles as the index into the
/// per-kind capability table and the Zobrist keys.
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[allow(missing_docs)]
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    #[allow(missing_docs)]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
            Promotion::King => Self::King,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// A pawn reaching the farthest rank is replaced by one of these. Unlike
/// standard chess, promoting to a king is allowed: it is just another piece
/// that can be lost.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
    King,
}

impl Promotion {
    /// All choices in the order they are offered (and tried by the engine).
    pub const ALL: [Self; 5] = [
        Self::Queen,
        Self::Rook,
        Self::Bishop,
        Self::Knight,
        Self::King,
    ];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            'k' => Ok(Self::King),
            _ => bail!("promotion should be one of 'q', 'r', 'b', 'n', 'k', got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rank() {
        assert_eq!(
            ('1'..='9')
                .filter_map(|ch| Rank::try_from(ch).ok())
                .collect::<Vec<Rank>>(),
            vec![
                Rank::One,
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
            ]
        );
        assert!(Rank::try_from('0').is_err());
        assert!(Rank::try_from(8).is_err());
    }

    #[test]
    fn file() {
        assert_eq!(
            ('a'..='i')
                .filter_map(|ch| File::try_from(ch).ok())
                .collect::<Vec<File>>(),
            vec![
                File::A,
                File::B,
                File::C,
                File::D,
                File::E,
                File::F,
                File::G,
                File::H,
            ]
        );
        assert!(File::try_from('A').is_err());
        assert!(File::try_from(8).is_err());
    }

    #[test]
    fn square() {
        let squares: Vec<_> = [0u8, BOARD_SIZE - 1, BOARD_WIDTH - 1, BOARD_WIDTH]
            .iter()
            .map(|square| Square::try_from(*square).unwrap())
            .collect();
        assert_eq!(squares, vec![Square::A1, Square::H8, Square::H1, Square::A2]);
        assert!(Square::try_from(BOARD_SIZE).is_err());
        assert_eq!(Square::try_from("e4").unwrap(), Square::E4);
        assert!(Square::try_from("e9").is_err());
        assert!(Square::try_from("e").is_err());
        assert_eq!(Square::iter().count(), BOARD_SIZE as usize);
        assert_eq!(Square::iter().last(), Some(Square::H8));
    }

    #[test]
    fn square_offsets() {
        assert_eq!(Square::E4.offset(1, 2), Some(Square::F6));
        assert_eq!(Square::E4.offset(-4, -3), Some(Square::A1));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::H1.offset(1, 1), None);
    }

    #[test]
    fn player() {
        assert_eq!(Player::White.opponent(), Player::Black);
        assert_eq!(Player::try_from("b").unwrap(), Player::Black);
        assert_eq!(Player::try_from("white").unwrap(), Player::White);
        assert!(Player::try_from("x").is_err());
        assert_eq!(Player::Black.to_string(), "b");
    }

    #[test]
    fn move_requests() {
        assert_eq!(
            MoveRequest::try_from("e2e4").unwrap(),
            MoveRequest {
                from: Square::E2,
                to: Square::E4,
                promotion: None
            }
        );
        assert_eq!(
            MoveRequest::try_from("b7b8k").unwrap(),
            MoveRequest {
                from: Square::B7,
                to: Square::B8,
                promotion: Some(Promotion::King)
            }
        );
        assert_eq!(MoveRequest::try_from("a7a8N").unwrap().to_string(), "a7a8n");
        assert!(MoveRequest::try_from("e2").is_err());
        assert!(MoveRequest::try_from("e2e4x").is_err());
        assert!(MoveRequest::try_from("i2e4").is_err());
    }

    #[test]
    fn move_display() {
        let capture = Move::new(Square::E4, Square::D5, Some(PieceKind::Pawn));
        assert_eq!(capture.to_string(), "e4d5");
        assert!(capture.is_capture());
        assert!(capture.matches(&MoveRequest::try_from("e4d5q").unwrap()));
        assert!(!Move::new(Square::G1, Square::F3, None).is_capture());
    }
}

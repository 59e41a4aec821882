//! Provides the antichess [`Position`]: the board, the side to move and the
//! state needed to enforce draw rules, together with making and unmaking
//! moves.
//!
//! The search explores the game tree by mutating a single position in place.
//! [`Position::apply`] returns an [`Applied`] guard that gives access to the
//! position after the move and unmakes the move when dropped, so every way out
//! of a search frame restores the state its caller expects.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use anyhow::{bail, Context};

use crate::chess::board::Board;
use crate::chess::core::{Move, PieceKind, Player, Promotion, Rank, Square};
use crate::chess::movegen;
use crate::chess::outcome::{Outcome, Termination, FIFTY_MOVE_LIMIT, REPETITION_LIMIT};
use crate::chess::piece::Piece;
use crate::chess::zobrist::{Key, RepetitionTable, ZobristKeys};

/// State of the antichess game: the board, whose turn it is, the halfmove
/// clock and how many times each placement has occurred.
///
/// The fingerprint ([`Position::hash`]) is maintained incrementally by
/// [`Position::make_move`] and [`Position::unmake_move`] and always equals
/// [`ZobristKeys::hash`] of the current board.
#[derive(Clone)]
pub struct Position {
    board: Board,
    side_to_move: Player,
    keys: Rc<ZobristKeys>,
    hash: Key,
    /// Half-moves since the last capture or pawn move, used to enforce the
    /// fifty-move rule.
    halfmove_clock: u8,
    repetitions: RepetitionTable,
}

/// Everything [`Position::unmake_move`] needs to revert a move.
#[derive(Debug)]
#[must_use]
pub struct Undo {
    mv: Move,
    captured: Option<Piece>,
    had_moved: bool,
    halfmove_clock: u8,
}

impl Position {
    /// Creates a position and registers its first occurrence.
    #[must_use]
    pub fn new(board: Board, side_to_move: Player, keys: Rc<ZobristKeys>) -> Self {
        let hash = keys.hash(&board);
        let mut repetitions = RepetitionTable::new();
        let _ = repetitions.record(hash);
        Self {
            board,
            side_to_move,
            keys,
            hash,
            halfmove_clock: 0,
            repetitions,
        }
    }

    /// Standard starting position, White to move.
    #[must_use]
    pub fn starting(keys: Rc<ZobristKeys>) -> Self {
        Self::new(Board::starting(), Player::White, keys)
    }

    /// Parses `<placement> <w|b> [halfmove clock]`, e.g.
    /// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w`.
    ///
    /// ```
    /// use std::rc::Rc;
    ///
    /// use antichess::chess::position::Position;
    /// use antichess::chess::zobrist::ZobristKeys;
    ///
    /// let keys = Rc::new(ZobristKeys::seeded(0));
    /// let position = Position::from_notation("8/8/8/3k4/8/8/4P3/8 b 12", keys).unwrap();
    /// assert_eq!(position.halfmove_clock(), 12);
    /// assert_eq!(position.to_string(), "8/8/8/3k4/8/8/4P3/8 b 12");
    /// ```
    pub fn from_notation(input: &str, keys: Rc<ZobristKeys>) -> anyhow::Result<Self> {
        let mut parts = input.split_ascii_whitespace();
        let board = match parts.next() {
            Some(placement) => Board::try_from(placement)?,
            None => bail!("incorrect position: missing pieces placement"),
        };
        let side_to_move = match parts.next() {
            Some(value) => Player::try_from(value)?,
            None => bail!("incorrect position: missing side to move"),
        };
        let halfmove_clock = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("halfmove clock can not contain anything other than digits");
                }
                value.parse::<u8>().with_context(|| {
                    format!("incorrect position: halfmove clock can not be parsed {value}")
                })?
            },
            None => 0,
        };
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in position: {input}");
        }
        let mut position = Self::new(board, side_to_move, keys);
        position.halfmove_clock = halfmove_clock;
        Ok(position)
    }

    /// Side to move.
    #[must_use]
    pub const fn us(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn keys(&self) -> &Rc<ZobristKeys> {
        &self.keys
    }

    /// Incrementally maintained fingerprint of the placement.
    #[must_use]
    pub const fn hash(&self) -> Key {
        self.hash
    }

    /// Transposition table key: the fingerprint combined with the side to
    /// move.
    #[must_use]
    pub fn search_key(&self) -> Key {
        match self.side_to_move {
            Player::White => self.hash,
            Player::Black => self.hash ^ self.keys.black_to_move(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    /// How many times the current placement occurred in this game.
    #[must_use]
    pub fn occurrences(&self) -> u8 {
        self.repetitions.count(self.hash)
    }

    /// Legal moves of the side to move.
    #[must_use]
    pub fn generate_moves(&self) -> Vec<Move> {
        movegen::generate_moves(&self.board, self.side_to_move)
    }

    /// Squares of the pieces of the side to move that have to capture.
    #[must_use]
    pub fn forced_pieces(&self) -> Vec<Square> {
        movegen::forced_pieces(&self.board, self.side_to_move)
    }

    /// Recomputes cached candidates of every piece on the board.
    pub fn refresh_candidates(&mut self, budget: usize) {
        movegen::refresh_candidates(&mut self.board, budget);
    }

    /// Plays the move and returns what is needed to take it back.
    ///
    /// # Panics
    ///
    /// If there is no piece on the origin square: moves are only valid for the
    /// position they were generated in.
    pub fn make_move(&mut self, mv: &Move) -> Undo {
        let Some(mut piece) = self.board.take(mv.from()) else {
            panic!("no piece to make {mv} in {self}");
        };
        let captured = self.board.take(mv.to());
        self.hash ^= self.keys.piece(&piece);
        if let Some(captured) = &captured {
            self.hash ^= self.keys.piece(captured);
        }
        let undo = Undo {
            mv: *mv,
            had_moved: piece.has_moved(),
            halfmove_clock: self.halfmove_clock,
            captured,
        };
        if piece.kind() == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        piece.relocate(mv.to());
        self.hash ^= self.keys.piece(&piece);
        self.board.place(piece);
        self.side_to_move = self.side_to_move.opponent();
        let _ = self.repetitions.record(self.hash);
        undo
    }

    /// Reverts the last move made by [`Position::make_move`].
    ///
    /// # Panics
    ///
    /// If the undo record does not belong to the last move.
    pub fn unmake_move(&mut self, undo: Undo) {
        self.repetitions.remove(self.hash);
        self.side_to_move = self.side_to_move.opponent();
        let Some(mut piece) = self.board.take(undo.mv.to()) else {
            panic!("no piece to unmake {} in {self}", undo.mv);
        };
        self.hash ^= self.keys.piece(&piece);
        piece.restore(undo.mv.from(), undo.had_moved);
        self.hash ^= self.keys.piece(&piece);
        self.board.place(piece);
        if let Some(captured) = undo.captured {
            self.hash ^= self.keys.piece(&captured);
            self.board.place(captured);
        }
        self.halfmove_clock = undo.halfmove_clock;
    }

    /// Makes the move for the lifetime of the returned guard.
    pub fn apply(&mut self, mv: &Move) -> Applied<'_> {
        let undo = self.make_move(mv);
        Applied {
            position: self,
            undo: Some(undo),
        }
    }

    /// Square of the pawn the move brought to its promotion rank, if any.
    #[must_use]
    pub fn promotion_square(&self, mv: &Move) -> Option<Square> {
        self.board
            .at(mv.to())
            .filter(|piece| {
                piece.kind() == PieceKind::Pawn
                    && piece.square().rank() == Rank::promotion(piece.owner())
            })
            .map(Piece::square)
    }

    /// Replaces the pawn on the square with a piece of the chosen kind. The
    /// occurrence recorded for the placement with the pawn is moved to the
    /// new placement.
    ///
    /// # Panics
    ///
    /// If there is no pawn on the square.
    pub fn promote(&mut self, square: Square, promotion: Promotion) {
        let Some(pawn) = self.board.take(square) else {
            panic!("no pawn to promote on {square} in {self}");
        };
        assert_eq!(pawn.kind(), PieceKind::Pawn, "only pawns are promoted");
        self.repetitions.remove(self.hash);
        self.hash ^= self.keys.piece(&pawn);
        let piece = Piece::new(pawn.owner(), promotion.into(), square);
        self.hash ^= self.keys.piece(&piece);
        self.board.place(piece);
        let _ = self.repetitions.record(self.hash);
    }

    /// Checks whether the game is over, in this order: a side without pieces
    /// wins, a side to move without legal moves wins, threefold repetition and
    /// the fifty-move rule are draws.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        for player in [Player::White, Player::Black] {
            if self.board.count(player) == 0 {
                return Some(Outcome::win(player, Termination::NoPiecesLeft));
            }
        }
        if !movegen::has_legal_moves(&self.board, self.side_to_move) {
            return Some(Outcome::win(self.side_to_move, Termination::Stalemate));
        }
        self.draw()
    }

    /// Draw by threefold repetition or by the fifty-move rule.
    #[must_use]
    pub fn draw(&self) -> Option<Outcome> {
        if self.occurrences() >= REPETITION_LIMIT {
            return Some(Outcome::draw(Termination::ThreefoldRepetition));
        }
        if self.halfmove_clock >= FIFTY_MOVE_LIMIT {
            return Some(Outcome::draw(Termination::FiftyMoveRule));
        }
        None
    }

    /// Whether the game can not continue from this position.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}

impl fmt::Display for Position {
    /// Prints the position in the same notation [`Position::from_notation`]
    /// accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            &self.board, &self.side_to_move, self.halfmove_clock
        )
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Halfmove clock: {}", self.halfmove_clock)?;
        writeln!(f, "Fingerprint: {:016x}", self.hash)?;
        writeln!(f, "Position: {self}")?;
        Ok(())
    }
}

/// A position with a move applied to it. Dereferences to the position after
/// the move, unmakes the move when dropped.
pub struct Applied<'a> {
    position: &'a mut Position,
    undo: Option<Undo>,
}

impl Deref for Applied<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for Applied<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for Applied<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.position.unmake_move(undo);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::board::STARTING_PLACEMENT;

    fn keys() -> Rc<ZobristKeys> {
        Rc::new(ZobristKeys::seeded(2024))
    }

    fn setup(input: &str) -> Position {
        let position = Position::from_notation(input, keys());
        assert!(position.is_ok(), "input: {input}");
        position.unwrap()
    }

    fn play(position: &mut Position, mv: &str) -> Undo {
        let mv = position
            .generate_moves()
            .into_iter()
            .find(|candidate| candidate.to_string() == mv)
            .unwrap_or_else(|| panic!("{mv} is not legal in {position}"));
        position.make_move(&mv)
    }

    #[test]
    fn notation() {
        let position = setup(&format!("{STARTING_PLACEMENT} w"));
        assert_eq!(position.to_string(), format!("{STARTING_PLACEMENT} w 0"));
        assert_eq!(position.us(), Player::White);
        assert_eq!(position.occurrences(), 1);

        let position = setup("8/8/8/8/8/8/8/K6k b 49");
        assert_eq!(position.us(), Player::Black);
        assert_eq!(position.halfmove_clock(), 49);
    }

    #[test]
    fn incorrect_notation() {
        assert!(Position::from_notation("", keys()).is_err());
        assert!(Position::from_notation(STARTING_PLACEMENT, keys()).is_err());
        assert!(Position::from_notation(&format!("{STARTING_PLACEMENT} x"), keys()).is_err());
        assert!(Position::from_notation(&format!("{STARTING_PLACEMENT} w +1"), keys()).is_err());
        assert!(Position::from_notation(&format!("{STARTING_PLACEMENT} w 256"), keys()).is_err());
        assert!(Position::from_notation(&format!("{STARTING_PLACEMENT} w 0 1"), keys()).is_err());
        assert!(Position::from_notation("8/8/8/8/8/8/8/K6k ?", keys()).is_err());
    }

    #[test]
    fn make_and_unmake() {
        let mut position = Position::starting(keys());
        let initial = position.to_string();
        let initial_hash = position.hash();

        let first = play(&mut position, "e2e4");
        assert_eq!(position.us(), Player::Black);
        assert_ne!(position.hash(), initial_hash);
        assert_eq!(position.hash(), position.keys().hash(position.board()));
        let second = play(&mut position, "d7d5");
        let capture = play(&mut position, "e4d5");
        assert_eq!(position.board().count(Player::Black), 15);
        assert_eq!(position.hash(), position.keys().hash(position.board()));

        position.unmake_move(capture);
        position.unmake_move(second);
        position.unmake_move(first);
        assert_eq!(position.to_string(), initial);
        assert_eq!(position.hash(), initial_hash);
        assert!(!position.board().at(Square::E2).unwrap().has_moved());
        assert_eq!(position.occurrences(), 1);
    }

    #[test]
    fn halfmove_clock() {
        let mut position = Position::starting(keys());
        let _ = play(&mut position, "g1f3");
        assert_eq!(position.halfmove_clock(), 1);
        let _ = play(&mut position, "b8c6");
        assert_eq!(position.halfmove_clock(), 2);
        let _ = play(&mut position, "e2e3");
        assert_eq!(position.halfmove_clock(), 0);
        let _ = play(&mut position, "c6d4");
        let _ = play(&mut position, "e3d4");
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn guard_restores_position() {
        let mut position = Position::starting(keys());
        let before = position.to_string();
        let moves = position.generate_moves();
        for mv in &moves {
            let applied = position.apply(mv);
            assert_eq!(applied.us(), Player::Black);
            assert_eq!(applied.hash(), applied.keys().hash(applied.board()));
        }
        assert_eq!(position.to_string(), before);
        assert_eq!(position.hash(), position.keys().hash(position.board()));
    }

    #[test]
    fn search_key_depends_on_side_to_move() {
        let white = setup("8/8/8/3k4/8/8/4P3/8 w");
        let black = setup("8/8/8/3k4/8/8/4P3/8 b");
        assert_eq!(white.hash(), black.hash());
        assert_ne!(white.search_key(), black.search_key());
    }

    #[test]
    fn promotion() {
        let mut position = setup("8/4P3/8/8/8/8/8/k7 w");
        let mv = position.generate_moves()[0];
        let _ = position.make_move(&mv);
        let square = position.promotion_square(&mv);
        assert_eq!(square, Some(Square::E8));
        position.promote(Square::E8, Promotion::King);
        assert_eq!(position.to_string(), "4K3/8/8/8/8/8/8/k7 b 0");
        assert_eq!(position.hash(), position.keys().hash(position.board()));
        assert_eq!(position.occurrences(), 1);
    }

    #[test]
    fn terminal_positions() {
        let position = setup("8/8/8/8/8/8/8/k7 w");
        assert_eq!(
            position.outcome(),
            Some(Outcome::win(Player::White, Termination::NoPiecesLeft))
        );
        let position = setup("8/8/8/8/8/p7/P7/8 w");
        assert_eq!(
            position.outcome(),
            Some(Outcome::win(Player::White, Termination::Stalemate))
        );
        let position = setup("8/8/8/8/8/8/8/K6k w 50");
        assert_eq!(
            position.outcome(),
            Some(Outcome::draw(Termination::FiftyMoveRule))
        );
        let position = setup("8/8/8/8/8/8/8/K6k w 49");
        assert_eq!(position.outcome(), None);
        assert!(Position::starting(keys()).outcome().is_none());
    }
}

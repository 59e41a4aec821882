//! Move generation under the forced-capture rule.
//!
//! Generation is two-phase: [`CaptureObligation::of`] looks at every piece of
//! the side to move and decides whether capturing is mandatory this ply, only
//! then each piece filters its own destinations. Deciding the obligation
//! up-front makes the result independent of the order pieces are visited in.

use crate::chess::board::Board;
use crate::chess::core::{Move, Player, Rank, Square};
use crate::chess::piece::{Candidates, Destinations, Pattern, Piece};

/// Whether the side to move is obliged to capture during this ply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaptureObligation {
    /// No piece of the side can capture: every move is allowed.
    Free,
    /// At least one piece can capture, pieces that can not are frozen.
    MustCapture,
}

impl CaptureObligation {
    /// Computes the obligation for the player across all of their pieces.
    #[must_use]
    pub fn of(board: &Board, player: Player) -> Self {
        if board.pieces_of(player).any(|piece| piece.can_capture(board)) {
            Self::MustCapture
        } else {
            Self::Free
        }
    }
}

impl Piece {
    /// Squares the piece could go to by its movement pattern alone, ignoring
    /// the forced-capture rule.
    #[must_use]
    pub fn destinations(&self, board: &Board) -> Destinations {
        let mut destinations = Destinations::new();
        match self.kind().capabilities().pattern {
            Pattern::Pawn => self.pawn_destinations(board, &mut destinations),
            Pattern::Leap(offsets) => {
                for &(files, ranks) in offsets {
                    if let Some(target) = self.square().offset(files, ranks) {
                        if board.owner_at(target) != Some(self.owner()) {
                            destinations.push(target);
                        }
                    }
                }
            },
            Pattern::Slide(directions) => {
                for &(files, ranks) in directions {
                    let mut current = self.square();
                    while let Some(target) = current.offset(files, ranks) {
                        match board.owner_at(target) {
                            None => destinations.push(target),
                            Some(owner) => {
                                if owner != self.owner() {
                                    destinations.push(target);
                                }
                                break;
                            },
                        }
                        current = target;
                    }
                }
            },
        }
        destinations
    }

    fn pawn_destinations(&self, board: &Board, destinations: &mut Destinations) {
        let forward = self.owner().push_direction();
        if let Some(single) = self.square().offset(0, forward) {
            if board.at(single).is_none() {
                destinations.push(single);
                if !self.has_moved() && self.square().rank() == Rank::pawns_starting(self.owner())
                {
                    if let Some(double) = single.offset(0, forward) {
                        if board.at(double).is_none() {
                            destinations.push(double);
                        }
                    }
                }
            }
        }
        for side in [-1, 1] {
            if let Some(target) = self.square().offset(side, forward) {
                if board.owner_at(target) == Some(self.owner().opponent()) {
                    destinations.push(target);
                }
            }
        }
    }

    fn captures(&self, board: &Board, target: Square) -> bool {
        board.owner_at(target) == Some(self.owner().opponent())
    }

    /// Whether any of the piece's destinations lands on an enemy piece.
    #[must_use]
    pub fn can_capture(&self, board: &Board) -> bool {
        self.destinations(board)
            .into_iter()
            .any(|target| self.captures(board, target))
    }

    /// Destinations the piece may legally go to this ply: captures only if the
    /// piece can capture, nothing if some other piece of the side has to.
    #[must_use]
    pub fn legal_destinations(&self, board: &Board, obligation: CaptureObligation) -> Destinations {
        let mut destinations = self.destinations(board);
        if destinations
            .iter()
            .any(|&target| self.captures(board, target))
        {
            destinations.retain(|target| self.captures(board, *target));
        } else if obligation == CaptureObligation::MustCapture {
            destinations.clear();
        }
        destinations
    }

    /// Legal moves of the piece annotated with what they capture.
    #[must_use]
    pub fn legal_moves(&self, board: &Board, obligation: CaptureObligation) -> Candidates {
        self.legal_destinations(board, obligation)
            .into_iter()
            .map(|target| Move::new(self.square(), target, board.at(target).map(Piece::kind)))
            .collect()
    }
}

/// All legal moves of the player, pieces visited from [`Square::A1`] to
/// [`Square::H8`].
#[must_use]
pub fn generate_moves(board: &Board, player: Player) -> Vec<Move> {
    let obligation = CaptureObligation::of(board, player);
    board
        .pieces_of(player)
        .flat_map(|piece| piece.legal_moves(board, obligation))
        .collect()
}

/// Whether the player has at least one legal move. Every piece that has any
/// destination keeps at least one of them under the forced-capture rule, so the
/// obligation does not need to be computed.
#[must_use]
pub fn has_legal_moves(board: &Board, player: Player) -> bool {
    board
        .pieces_of(player)
        .any(|piece| !piece.destinations(board).is_empty())
}

/// Squares of the player's pieces that have to capture this ply.
#[must_use]
pub fn forced_pieces(board: &Board, player: Player) -> Vec<Square> {
    board
        .pieces_of(player)
        .filter(|piece| piece.can_capture(board))
        .map(Piece::square)
        .collect()
}

/// Recomputes the cached candidates of every piece on the board, for both
/// sides, keeping at most `budget` legal moves per piece in generation order.
pub fn refresh_candidates(board: &mut Board, budget: usize) {
    let obligations = [
        CaptureObligation::of(board, Player::White),
        CaptureObligation::of(board, Player::Black),
    ];
    let updates: Vec<(Square, Candidates)> = board
        .pieces()
        .map(|piece| {
            let obligation = match piece.owner() {
                Player::White => obligations[0],
                Player::Black => obligations[1],
            };
            let mut candidates = piece.legal_moves(board, obligation);
            candidates.truncate(budget);
            (piece.square(), candidates)
        })
        .collect();
    for (square, candidates) in updates {
        if let Some(piece) = board.at_mut(square) {
            piece.set_candidates(candidates);
        }
    }
}

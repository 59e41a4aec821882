//! The 8x8 grid holding the pieces.

use std::fmt::{self, Write};

use anyhow::bail;

use crate::chess::core::{File, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::piece::Piece;

/// Piece placement of the standard starting position.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Each cell holds at most one piece, and the piece's own square always
/// matches the cell it is stored in.
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            squares: std::array::from_fn(|_| None),
        }
    }

    /// Standard chess setup.
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            let back_rank = match player {
                Player::White => Rank::One,
                Player::Black => Rank::Eight,
            };
            for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
                board.place(Piece::new(player, kind, Square::new(file, back_rank)));
                board.place(Piece::new(
                    player,
                    PieceKind::Pawn,
                    Square::new(file, Rank::pawns_starting(player)),
                ));
            }
        }
        board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn at(&self, square: Square) -> Option<&Piece> {
        self.squares[square.index()].as_ref()
    }

    pub(crate) fn at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares[square.index()].as_mut()
    }

    /// Color of the piece standing on the square.
    #[must_use]
    pub fn owner_at(&self, square: Square) -> Option<Player> {
        self.at(square).map(Piece::owner)
    }

    /// Puts the piece on its square, which has to be empty.
    pub(crate) fn place(&mut self, piece: Piece) {
        let cell = &mut self.squares[piece.square().index()];
        debug_assert!(cell.is_none(), "{} is occupied", piece.square());
        *cell = Some(piece);
    }

    /// Lifts the piece off the square.
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// All pieces, from [`Square::A1`] to [`Square::H8`].
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    /// Pieces of one color.
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.owner() == player)
    }

    /// Number of pieces the player has left.
    #[must_use]
    pub fn count(&self, player: Player) -> usize {
        self.pieces_of(player).count()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Parses the piece placement field of FEN: ranks from 8 to 1 separated by
    /// `/`, digits standing for runs of empty squares.
    fn try_from(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let mut rank_id = BOARD_WIDTH;
        for rank_placement in placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect placement: expected 8 ranks, got {placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_placement.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect placement: rank {rank_placement} is wider than {BOARD_WIDTH}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let square = Square::new(file.try_into()?, rank);
                board.place(Piece::from_symbol(symbol, square)?);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect placement: rank size should be exactly {BOARD_WIDTH}, got {rank_placement} of length {file}"
                );
            }
        }
        if rank_id != 0 {
            bail!("incorrect placement: there should be 8 ranks, got {placement}");
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Prints the piece placement field of FEN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_squares = 0;
            for file in File::ALL {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a human-readable format ('.' for an empty square).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => f.write_char(piece.symbol())?,
                    None => f.write_char('.')?,
                }
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

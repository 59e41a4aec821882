//! A single game between a human and the automated player (or two humans, or
//! two automated players driven by `go`).

use std::rc::Rc;

use anyhow::bail;

use crate::chess::core::{Move, MoveRequest, Player, Promotion, Square};
use crate::chess::outcome::{Outcome, Termination};
use crate::chess::position::Position;
use crate::chess::zobrist::ZobristKeys;
use crate::search::promotion::{best_promotion, PromotionChooser};
use crate::search::{Difficulty, Searcher};

/// Owns the position, the search state and the roles of the players.
///
/// The transposition table, the repetition counts and the halfmove clock are
/// reset whenever a new game starts. The Zobrist keys are drawn once and kept
/// for every game.
pub struct Game {
    keys: Rc<ZobristKeys>,
    position: Position,
    searcher: Searcher,
    computer: Option<Player>,
    outcome: Option<Outcome>,
    last_move: Option<MoveRequest>,
}

impl Game {
    /// Starts a game from the standard position with freshly drawn keys.
    #[must_use]
    pub fn new(difficulty: Difficulty, table_capacity: usize, computer: Option<Player>) -> Self {
        Self::with_keys(
            Rc::new(ZobristKeys::random()),
            difficulty,
            table_capacity,
            computer,
        )
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn with_keys(
        keys: Rc<ZobristKeys>,
        difficulty: Difficulty,
        table_capacity: usize,
        computer: Option<Player>,
    ) -> Self {
        Self {
            position: Position::starting(Rc::clone(&keys)),
            keys,
            searcher: Searcher::new(difficulty, table_capacity),
            computer,
            outcome: None,
            last_move: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Color of the automated player, `None` if both sides are human.
    #[must_use]
    pub const fn computer(&self) -> Option<Player> {
        self.computer
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The last committed move including the promotion it caused.
    #[must_use]
    pub const fn last_move(&self) -> Option<MoveRequest> {
        self.last_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    #[allow(missing_docs)]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        tracing::info!(%difficulty, "difficulty changed");
        self.searcher.set_difficulty(difficulty);
    }

    #[allow(missing_docs)]
    pub fn set_table_capacity(&mut self, capacity: usize) {
        tracing::info!(capacity, "transposition table resized");
        self.searcher.resize_table(capacity);
    }

    /// Whether the automated player should move now.
    #[must_use]
    pub fn is_computer_turn(&self) -> bool {
        self.outcome.is_none() && self.computer == Some(self.position.us())
    }

    /// Starts over from the standard position.
    pub fn restart(&mut self, computer: Option<Player>) {
        self.start(Position::starting(Rc::clone(&self.keys)), computer);
    }

    /// Starts over from a position in `<placement> <w|b> [clock]` notation.
    /// The current game is kept if the notation is malformed.
    pub fn setup(&mut self, notation: &str) -> anyhow::Result<()> {
        let position = Position::from_notation(notation, Rc::clone(&self.keys))?;
        self.start(position, self.computer);
        Ok(())
    }

    fn start(&mut self, position: Position, computer: Option<Player>) {
        self.searcher.clear();
        self.computer = computer;
        self.outcome = position.outcome();
        self.last_move = None;
        self.position = position;
        tracing::info!(
            position = %self.position,
            computer = ?self.computer,
            "new game"
        );
    }

    /// Plays a human move. The promotion suffix of the request picks the kind
    /// of a promoted pawn, a queen if there is none.
    pub fn play(&mut self, request: &MoveRequest) -> anyhow::Result<MoveRequest> {
        let mut promotion = request.promotion.unwrap_or(Promotion::Queen);
        self.play_with(request, &mut promotion)
    }

    /// Plays a human move, asking the chooser if a pawn gets promoted.
    pub fn play_with<C: PromotionChooser>(
        &mut self,
        request: &MoveRequest,
        chooser: &mut C,
    ) -> anyhow::Result<MoveRequest> {
        self.ensure_in_progress()?;
        if self.is_computer_turn() {
            bail!("it is the computer's turn to move");
        }
        let Some(mv) = self
            .position
            .generate_moves()
            .into_iter()
            .find(|mv| mv.matches(request))
        else {
            tracing::warn!(%request, position = %self.position, "illegal move");
            bail!("illegal move {request} in {}", self.position);
        };
        Ok(self.commit(mv, |position, square| chooser.choose(position, square)))
    }

    /// Lets the automated player pick and play a move for the side to move,
    /// whichever color that is.
    pub fn play_computer(&mut self) -> anyhow::Result<MoveRequest> {
        self.ensure_in_progress()?;
        let result = self.searcher.select_move(&mut self.position);
        let Some(mv) = result.best_move else {
            bail!("no legal moves in {}", self.position);
        };
        let lookahead = self.searcher.difficulty().lookahead();
        Ok(self.commit(mv, |position, square| {
            best_promotion(position, square, lookahead)
        }))
    }

    /// The side to move gives up.
    pub fn resign(&mut self) -> anyhow::Result<Outcome> {
        self.ensure_in_progress()?;
        let outcome = Outcome::win(self.position.us().opponent(), Termination::Resignation);
        tracing::info!(%outcome, "game over");
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    fn ensure_in_progress(&self) -> anyhow::Result<()> {
        if let Some(outcome) = self.outcome {
            bail!("the game is over: {outcome}");
        }
        Ok(())
    }

    fn commit(
        &mut self,
        mv: Move,
        promote: impl FnOnce(&Position, Square) -> Promotion,
    ) -> MoveRequest {
        let _undo = self.position.make_move(&mv);
        let promotion = self.position.promotion_square(&mv).map(|square| {
            let promotion = promote(&self.position, square);
            self.position.promote(square, promotion);
            promotion
        });
        let played = MoveRequest {
            from: mv.from(),
            to: mv.to(),
            promotion,
        };
        tracing::info!(mv = %played, position = %self.position, "move played");
        self.last_move = Some(played);
        self.outcome = self.position.outcome();
        if let Some(outcome) = self.outcome {
            tracing::info!(%outcome, "game over");
        }
        played
    }
}

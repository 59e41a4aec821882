//! Picks the automated player's moves: depth-limited [Minimax] with alpha-beta
//! pruning over a single mutable [`Position`], memoized in a
//! [`TranspositionTable`].
//!
//! [Minimax]: https://en.wikipedia.org/wiki/Minimax
//! [`Position`]: crate::chess::position::Position

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};

use crate::chess::core::Move;
use crate::evaluation::Score;
use crate::search::transposition::TranspositionTable;

mod minimax;
pub mod promotion;
pub mod transposition;

/// Search depth in plies.
pub type Depth = u8;

/// Candidate moves cached per piece for each level of difficulty.
const LOOKAHEAD_PER_LEVEL: usize = 4;

/// How hard the automated player tries: both the search depth and the number
/// of candidate moves per piece the evaluator considers grow with it.
///
/// The search has no move ordering and no time limit, so its cost grows
/// exponentially with the level. Levels above 4 are only practical once few
/// pieces are left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Difficulty(u8);

impl Difficulty {
    #[allow(missing_docs)]
    pub const MIN: Self = Self(1);
    #[allow(missing_docs)]
    pub const MAX: Self = Self(10);

    /// Plies searched from the root.
    #[must_use]
    pub const fn depth(self) -> Depth {
        self.0
    }

    /// Most candidate moves cached per piece before scoring a position.
    #[must_use]
    pub const fn lookahead(self) -> usize {
        self.0 as usize * LOOKAHEAD_PER_LEVEL
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = anyhow::Error;

    fn try_from(level: u8) -> anyhow::Result<Self> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&level) {
            bail!(
                "difficulty should be within {}..={}, got {level}",
                Self::MIN,
                Self::MAX
            );
        }
        Ok(Self(level))
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> anyhow::Result<Self> {
        let level = input
            .trim()
            .parse::<u8>()
            .with_context(|| format!("difficulty should be a number, got '{input}'"))?;
        Self::try_from(level)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The move picked by [`Searcher::select_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` if the side to move has no legal moves.
    pub best_move: Option<Move>,
    /// Score of the best move from the automated player's point of view.
    pub score: Score,
    /// Positions visited by the search.
    pub nodes: u64,
}

/// Search state that outlives a single move decision: the transposition
/// table and the difficulty. Lives as long as one game.
pub struct Searcher {
    table: TranspositionTable,
    difficulty: Difficulty,
    nodes: u64,
}

impl Searcher {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(difficulty: Difficulty, table_capacity: usize) -> Self {
        Self {
            table: TranspositionTable::new(table_capacity),
            difficulty,
            nodes: 0,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Changes the difficulty and drops the table: stored scores were
    /// evaluated with the previous lookahead.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty != self.difficulty {
            self.table.clear();
        }
        self.difficulty = difficulty;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// Changes the transposition table capacity, dropping its entries.
    pub fn resize_table(&mut self, capacity: usize) {
        self.table.resize(capacity);
    }

    /// Forgets everything learned in the previous game.
    pub fn clear(&mut self) {
        self.table.clear();
        self.nodes = 0;
    }
}

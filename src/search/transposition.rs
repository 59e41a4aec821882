//! Implements the [Transposition Table]: memoized search results keyed by the
//! position's search key.
//!
//! Different positions sharing a key are not told apart: such collisions are
//! rare enough to be tolerated.
//!
//! [Transposition Table]: https://www.chessprogramming.org/Transposition_Table

use std::collections::HashMap;

use crate::chess::core::Move;
use crate::chess::zobrist::Key;
use crate::evaluation::Score;
use crate::search::Depth;

/// Number of entries the table holds by default.
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// How the stored score relates to the true value of the position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact.
    Exact,
    /// Search was cut off: the true value is at least the score.
    Lower,
    /// No move improved alpha: the true value is at most the score.
    Upper,
}

impl Bound {
    /// Classifies a score against the window it was searched with.
    #[must_use]
    pub fn classify(score: Score, alpha: Score, beta: Score) -> Self {
        if score <= alpha {
            Self::Upper
        } else if score >= beta {
            Self::Lower
        } else {
            Self::Exact
        }
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub score: Score,
    pub depth: Depth,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

/// What the search should do after consulting the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    /// The stored result answers the query.
    Hit(Score),
    /// The position has to be searched, possibly with a narrower window.
    Window {
        #[allow(missing_docs)]
        alpha: Score,
        #[allow(missing_docs)]
        beta: Score,
    },
}

/// Bounded map from search keys to results. Storing a new key into a full
/// table clears it first.
pub struct TranspositionTable {
    table: HashMap<Key, Entry>,
    capacity: usize,
}

impl TranspositionTable {
    /// Creates an empty table holding at most `capacity` entries (at least
    /// one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            table: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, dropping all entries.
    pub fn resize(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }

    #[allow(missing_docs)]
    pub fn clear(&mut self) {
        self.table.clear();
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn get(&self, key: Key) -> Option<&Entry> {
        self.table.get(&key)
    }

    /// Looks up the key for a search of `depth` plies within `(alpha, beta)`.
    /// Entries searched shallower than requested are ignored.
    #[must_use]
    pub fn probe(&self, key: Key, depth: Depth, mut alpha: Score, mut beta: Score) -> Probe {
        let Some(entry) = self.get(key).filter(|entry| entry.depth >= depth) else {
            return Probe::Window { alpha, beta };
        };
        match entry.bound {
            Bound::Exact => return Probe::Hit(entry.score),
            Bound::Lower => alpha = alpha.max(entry.score),
            Bound::Upper => beta = beta.min(entry.score),
        }
        if alpha >= beta {
            return Probe::Hit(entry.score);
        }
        Probe::Window { alpha, beta }
    }

    /// Stores the result of searching the position with the `(alpha, beta)`
    /// window, replacing whatever was stored for the key.
    pub fn store(
        &mut self,
        key: Key,
        score: Score,
        depth: Depth,
        alpha: Score,
        beta: Score,
        best_move: Option<Move>,
    ) {
        if self.table.len() >= self.capacity && !self.table.contains_key(&key) {
            self.table.clear();
        }
        let _ = self.table.insert(
            key,
            Entry {
                score,
                depth,
                bound: Bound::classify(score, alpha, beta),
                best_move,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn score(value: i32) -> Score {
        Score::from(value)
    }

    #[test]
    fn classification() {
        assert_eq!(Bound::classify(score(-5), score(-5), score(5)), Bound::Upper);
        assert_eq!(Bound::classify(score(5), score(-5), score(5)), Bound::Lower);
        assert_eq!(Bound::classify(score(0), score(-5), score(5)), Bound::Exact);
    }

    #[test]
    fn exact_hit() {
        let mut table = TranspositionTable::new(16);
        table.store(1, score(3), 2, -Score::INFINITY, Score::INFINITY, None);
        assert_eq!(
            table.probe(1, 2, -Score::INFINITY, Score::INFINITY),
            Probe::Hit(score(3))
        );
        assert_eq!(
            table.probe(1, 1, score(10), score(20)),
            Probe::Hit(score(3))
        );
        // Too shallow for the query.
        assert_eq!(
            table.probe(1, 3, -Score::INFINITY, Score::INFINITY),
            Probe::Window {
                alpha: -Score::INFINITY,
                beta: Score::INFINITY
            }
        );
        assert_eq!(
            table.probe(2, 0, score(-1), score(1)),
            Probe::Window {
                alpha: score(-1),
                beta: score(1)
            }
        );
    }

    #[test]
    fn bounds_narrow_window() {
        let mut table = TranspositionTable::new(16);
        // Failed high: lower bound.
        table.store(1, score(7), 1, score(0), score(5), None);
        assert_eq!(table.get(1).unwrap().bound, Bound::Lower);
        assert_eq!(
            table.probe(1, 1, score(0), score(10)),
            Probe::Window {
                alpha: score(7),
                beta: score(10)
            }
        );
        assert_eq!(table.probe(1, 1, score(0), score(6)), Probe::Hit(score(7)));

        // Failed low: upper bound.
        table.store(2, score(-4), 1, score(0), score(5), None);
        assert_eq!(table.get(2).unwrap().bound, Bound::Upper);
        assert_eq!(
            table.probe(2, 1, score(-10), score(10)),
            Probe::Window {
                alpha: score(-10),
                beta: score(-4)
            }
        );
        assert_eq!(
            table.probe(2, 1, score(-3), score(10)),
            Probe::Hit(score(-4))
        );
    }

    #[test]
    fn overwrites() {
        let mut table = TranspositionTable::new(16);
        table.store(1, score(1), 1, score(-5), score(5), None);
        table.store(1, score(2), 3, score(-5), score(5), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).unwrap().score, score(2));
        assert_eq!(table.get(1).unwrap().depth, 3);
    }

    #[test]
    fn bounded() {
        let mut table = TranspositionTable::new(2);
        table.store(1, score(1), 1, score(-5), score(5), None);
        table.store(2, score(2), 1, score(-5), score(5), None);
        assert_eq!(table.len(), 2);
        // Replacing an existing key keeps the rest.
        table.store(2, score(3), 1, score(-5), score(5), None);
        assert_eq!(table.len(), 2);
        // A new key into a full table starts over.
        table.store(3, score(3), 1, score(-5), score(5), None);
        assert_eq!(table.len(), 1);
        assert!(table.get(1).is_none());
        assert!(table.get(3).is_some());

        table.resize(8);
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 8);
        assert_eq!(TranspositionTable::new(0).capacity(), 1);
    }
}

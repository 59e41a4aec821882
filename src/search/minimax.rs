//! Implementation of the [Minimax] algorithm with [Alpha-Beta pruning] and a
//! transposition table.
//!
//! The automated player is always the maximizing side and the evaluation is
//! not relative to the side to move, so the search keeps an explicit
//! `maximizing` flag instead of negating scores between plies.
//!
//! [Minimax]: https://en.wikipedia.org/wiki/Minimax
//! [Alpha-Beta pruning]: https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning

use crate::chess::position::Position;
use crate::evaluation::{evaluate, Score};
use crate::search::transposition::Probe;
use crate::search::{Depth, SearchResult, Searcher};

impl Searcher {
    /// Scores the position by searching `depth` plies ahead within the
    /// `(alpha, beta)` window. The position is restored before returning.
    ///
    /// Drawn positions score [`Score::DRAW`] and are neither searched further
    /// nor stored.
    pub fn search(
        &mut self,
        position: &mut Position,
        depth: Depth,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> Score {
        self.nodes += 1;
        if position.draw().is_some() {
            return Score::DRAW;
        }
        let key = position.search_key();
        let (mut alpha, mut beta) = match self.table.probe(key, depth, alpha, beta) {
            Probe::Hit(score) => return score,
            Probe::Window { alpha, beta } => (alpha, beta),
        };

        if depth == 0 || position.is_terminal() {
            position.refresh_candidates(self.difficulty.lookahead());
            let score = evaluate(position.board());
            self.table.store(key, score, depth, alpha, beta, None);
            return score;
        }

        // Bounds are classified against the window children were searched
        // with, before the loop narrows it.
        let (window_alpha, window_beta) = (alpha, beta);
        let mut best = if maximizing {
            -Score::INFINITY
        } else {
            Score::INFINITY
        };
        let mut best_move = None;
        for mv in position.generate_moves() {
            let score = {
                let mut child = position.apply(&mv);
                self.search(&mut child, depth - 1, alpha, beta, !maximizing)
            };
            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        self.table
            .store(key, best, depth, window_alpha, window_beta, best_move);
        best
    }

    /// Picks the move of the side to move that maximizes the score after
    /// searching [`crate::search::Difficulty::depth`] plies. Ties go to the
    /// first move generated.
    pub fn select_move(&mut self, position: &mut Position) -> SearchResult {
        self.nodes = 0;
        let depth = self.difficulty.depth();
        debug_assert!(depth > 0);
        let mut best = SearchResult {
            best_move: None,
            score: -Score::INFINITY,
            nodes: 0,
        };
        for mv in position.generate_moves() {
            let score = {
                let mut child = position.apply(&mv);
                self.search(&mut child, depth - 1, best.score, Score::INFINITY, false)
            };
            if best.best_move.is_none() || score > best.score {
                best.best_move = Some(mv);
                best.score = score;
            }
        }
        best.nodes = self.nodes;
        match best.best_move {
            Some(mv) => tracing::debug!(
                %mv,
                score = %best.score,
                depth,
                nodes = best.nodes,
                table = self.table.len(),
                "selected move"
            ),
            None => tracing::debug!(position = %position, "no legal moves"),
        }
        best
    }
}

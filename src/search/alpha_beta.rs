// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp;

use crate::error::SearchError;
use crate::eval::{BoardEvaluator, Score};
use crate::position::{apply, Position};
use crate::search::{Deadline, NodeKind, TableEntry, TranspositionTable};

/// Minimax search with alpha-beta pruning.
///
/// All scores produced by one `AlphaBeta` are from the point of view of the maximizing player,
/// that is, whoever was to move when the search was started with `maximizing == true`. The
/// evaluator scores positions for the side to move, so its verdict is negated at nodes where
/// the minimizing player is to move.
pub struct AlphaBeta<'a, E> {
    evaluator: &'a E,
    table: &'a mut TranspositionTable,
    deadline: Deadline,
    nodes: u64,
    aborted: bool,
}

impl<'a, E> AlphaBeta<'a, E> {
    pub fn new(
        evaluator: &'a E,
        table: &'a mut TranspositionTable,
        deadline: Deadline,
    ) -> AlphaBeta<'a, E> {
        AlphaBeta {
            evaluator,
            table,
            deadline,
            nodes: 0,
            aborted: false,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether the deadline cut this search short. An aborted search's score is only the best
    /// estimate available when time ran out.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Searches `pos` to `depth` plies inside the window `(alpha, beta)`, returning the score
    /// and the move that achieves it. `pos` is handed back unchanged.
    pub fn search<P>(
        &mut self,
        pos: &mut P,
        depth: u32,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> Result<(Score, Option<P::Move>), SearchError>
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        self.search_from(pos, 0, depth, alpha, beta, maximizing)
    }

    /// Like `search`, but for a node that already sits `ply` plies below the point the caller
    /// considers the root. Mate distances are counted from that root.
    pub fn search_from<P>(
        &mut self,
        pos: &mut P,
        ply: u32,
        depth: u32,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> Result<(Score, Option<P::Move>), SearchError>
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        self.nodes += 1;
        if pos.repetition_count() >= 3 {
            trace!("draw by repetition at ply {}", ply);
            return Ok((Score::DRAW, None));
        }

        if pos.is_stalemate() {
            return Ok((Score::DRAW, None));
        }

        if depth == 0 || pos.is_checkmate() {
            return Ok((self.static_value(pos, ply, maximizing), None));
        }

        if self.deadline.expired() {
            if !self.aborted {
                debug!("deadline expired at ply {}, unwinding", ply);
            }
            self.aborted = true;
            return Ok((self.static_value(pos, ply, maximizing), None));
        }

        let (mut alpha, mut beta) = (alpha, beta);
        let key = pos.fingerprint();

        // The root always searches so that it can report a move.
        if ply > 0 {
            if let Some(entry) = self.table.get(key) {
                // Only entries of exactly this depth are used, so a hit never changes the
                // result relative to a plain fixed-depth minimax.
                if entry.depth == depth {
                    match entry.node {
                        NodeKind::Exact(score) => return Ok((score.from_table(ply), None)),
                        NodeKind::Lower(score) => {
                            let score = score.from_table(ply);
                            if score >= beta {
                                return Ok((score, None));
                            }
                            alpha = cmp::max(alpha, score);
                        }
                        NodeKind::Upper(score) => {
                            let score = score.from_table(ply);
                            if score <= alpha {
                                return Ok((score, None));
                            }
                            beta = cmp::min(beta, score);
                        }
                    }
                }
            }
        }

        let (window_alpha, window_beta) = (alpha, beta);
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mut best: Option<(Score, P::Move)> = None;
        for mov in moves {
            let (score, _) = {
                let mut child = apply(pos, mov);
                self.search_from(&mut *child, ply + 1, depth - 1, alpha, beta, !maximizing)?
            };

            let improves = match best {
                None => true,
                Some((best_score, _)) if maximizing => score > best_score,
                Some((best_score, _)) => score < best_score,
            };
            if improves {
                best = Some((score, mov));
            }

            if self.aborted {
                break;
            }

            if maximizing {
                alpha = cmp::max(alpha, score);
            } else {
                beta = cmp::min(beta, score);
            }

            if beta <= alpha {
                break;
            }
        }

        let (score, mov) = match best {
            Some(best) => best,
            None => return Err(SearchError::NoLegalMoves),
        };

        if !self.aborted {
            let node = if score <= window_alpha {
                NodeKind::Upper(score.to_table(ply))
            } else if score >= window_beta {
                NodeKind::Lower(score.to_table(ply))
            } else {
                NodeKind::Exact(score.to_table(ply))
            };
            self.table.put(key, TableEntry { depth, node });
        }

        Ok((score, Some(mov)))
    }

    fn static_value<P>(&self, pos: &P, ply: u32, maximizing: bool) -> Score
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        let score = self.evaluator.evaluate(pos).at_ply(ply);
        if maximizing {
            score
        } else {
            -score
        }
    }
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::panic::{self, AssertUnwindSafe};

use crate::config::{Retention, SearchConfig};
use crate::error::{Outcome, SearchError};
use crate::eval::{BoardEvaluator, HeuristicEvaluator, Score};
use crate::position::Position;
use crate::search::{
    DataRecorder, Deadline, Record, RootDispatcher, RootOutcome, RootReport, SearchLimits,
    SearchResult, Searcher, TranspositionTable,
};

/// Searches depth 1, 2, ... up to the requested maximum, keeping the best move found so far
/// and handing it back once the depth limit or the deadline is reached.
pub struct IterativeDeepeningSearcher<E> {
    evaluator: E,
    config: SearchConfig,
    dispatcher: RootDispatcher,
}

impl<E> IterativeDeepeningSearcher<E> {
    pub fn new(
        evaluator: E,
        config: SearchConfig,
    ) -> Result<IterativeDeepeningSearcher<E>, SearchError> {
        let dispatcher = RootDispatcher::new(config.threads)?;
        Ok(IterativeDeepeningSearcher {
            evaluator,
            config,
            dispatcher,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl IterativeDeepeningSearcher<HeuristicEvaluator> {
    /// Builds a searcher around the heuristic evaluator, weighted as the config says.
    pub fn from_config(config: SearchConfig) -> Result<Self, SearchError> {
        let evaluator = HeuristicEvaluator::with_weights(config.weights.clone());
        IterativeDeepeningSearcher::new(evaluator, config)
    }
}

impl<P, E> Searcher<P> for IterativeDeepeningSearcher<E>
where
    P: Position,
    E: BoardEvaluator<P>,
{
    fn decide_move(
        &self,
        pos: &P,
        limits: SearchLimits,
        recorder: &dyn DataRecorder,
    ) -> Result<SearchResult<P::Move>, SearchError> {
        let deadline = Deadline::new(limits.time_budget);
        if pos.is_checkmate() {
            return Err(SearchError::GameOver(Outcome::Checkmate));
        }

        if pos.is_stalemate() {
            return Err(SearchError::GameOver(Outcome::Stalemate));
        }

        if pos.repetition_count() >= 3 {
            return Err(SearchError::GameOver(Outcome::Repetition));
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mut table = TranspositionTable::new();
        let mut best: Option<SearchResult<P::Move>> = None;
        let mut nodes = 0;

        // Best root score per depth. Leaf scores swing with the parity of the depth, so a
        // threshold is only ever taken from the depth two plies shallower.
        let mut root_scores: Vec<Option<Score>> = vec![None; limits.max_depth as usize + 1];
        for depth in 1..=limits.max_depth {
            if deadline.expired() {
                info!("out of time before depth {}", depth);
                break;
            }

            table.clear();
            let reference = depth
                .checked_sub(2)
                .and_then(|shallower| root_scores[shallower as usize]);
            let threshold = match reference {
                Some(reference) if deadline.under_pressure(self.config.pressure_fraction) => {
                    let threshold = reference.offset(-self.config.aspiration_margin);
                    debug!("short on time, searching depth {} against {}", depth, threshold);
                    Some(threshold)
                }
                _ => None,
            };

            let mut report = self.dispatcher.search_root(
                &self.evaluator,
                pos,
                depth,
                threshold,
                deadline,
                &mut table,
            )?;
            nodes += report.nodes;

            let all_filtered = report
                .outcomes
                .iter()
                .all(|(_, outcome)| *outcome == RootOutcome::Filtered);
            if threshold.is_some() && all_filtered {
                debug!("every root move failed low at depth {}, searching again", depth);
                table.clear();
                report = self.dispatcher.search_root(
                    &self.evaluator,
                    pos,
                    depth,
                    None,
                    deadline,
                    &mut table,
                )?;
                nodes += report.nodes;
            }

            root_scores[depth as usize] = report.best.map(|(_, score)| score);

            let mut retained = false;
            if let Some((mov, search_score)) = report.best {
                let score = self.retained_score(pos, mov, search_score);
                retained = match best {
                    Some(ref current) => score >= current.score,
                    None => true,
                };

                if retained {
                    best = Some(SearchResult {
                        best_move: mov,
                        score,
                        search_score,
                        depth,
                        nodes_searched: nodes,
                    });
                }

                info!(
                    "depth {}: {} ({}, retained as {}){}",
                    depth,
                    mov,
                    search_score,
                    score,
                    if retained { "" } else { ", discarded" }
                );
            } else {
                info!(
                    "depth {}: no move scored ({} filtered, {} abandoned, {} failed)",
                    depth,
                    report.completed(),
                    report.abandoned(),
                    report.failed()
                );
            }

            recorder.record(&self.record(pos, depth, &deadline, &report, retained));

            if let Some(ref best) = best {
                if let Score::Win(plies) = best.search_score {
                    info!("forced win in {} plies, not searching deeper", plies);
                    break;
                }
            }
        }

        match best {
            Some(mut best) => {
                best.nodes_searched = nodes;
                Ok(best)
            }
            None => {
                warn!("no depth produced a move, falling back to one ply");
                self.one_ply_fallback(pos, moves, nodes)
            }
        }
    }
}

impl<E> IterativeDeepeningSearcher<E> {
    /// The score a candidate is kept with, from the mover's point of view.
    fn retained_score<P>(&self, pos: &P, mov: P::Move, search_score: Score) -> Score
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        match self.config.retention {
            Retention::SearchScore => search_score,
            // A proven mate is not a heuristic, so it is kept as is.
            Retention::StaticReevaluation if search_score.is_mate() => search_score,
            Retention::StaticReevaluation => self.one_ply_score(pos, mov),
        }
    }

    fn one_ply_score<P>(&self, pos: &P, mov: P::Move) -> Score
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        let mut child = pos.clone();
        child.make_move(mov);
        -self.evaluator.evaluate(&child).at_ply(1)
    }

    fn one_ply_fallback<P>(
        &self,
        pos: &P,
        moves: Vec<P::Move>,
        nodes: u64,
    ) -> Result<SearchResult<P::Move>, SearchError>
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut best: Option<(P::Move, Score)> = None;
            for mov in moves {
                let score = self.one_ply_score(pos, mov);
                let improves = match best {
                    Some((_, best_score)) => score > best_score,
                    None => true,
                };
                if improves {
                    best = Some((mov, score));
                }
            }

            best
        }));

        match result {
            Ok(Some((best_move, score))) => Ok(SearchResult {
                best_move,
                score,
                search_score: score,
                depth: 0,
                nodes_searched: nodes,
            }),
            Ok(None) => Err(SearchError::NoDecision),
            Err(_) => {
                warn!("one-ply fallback panicked");
                Err(SearchError::NoDecision)
            }
        }
    }

    fn record<P: Position>(
        &self,
        pos: &P,
        depth: u32,
        deadline: &Deadline,
        report: &RootReport<P::Move>,
        retained: bool,
    ) -> Record {
        Record {
            position: format!("{:016x}", pos.fingerprint()),
            depth,
            nodes: report.nodes,
            elapsed_ms: deadline.elapsed().as_millis() as u64,
            best_move: report.best.map(|(mov, _)| mov.to_string()),
            search_score: report.best.map(|(_, score)| score.centipawns()),
            retained,
            completed: report.completed(),
            abandoned: report.abandoned(),
            failed: report.failed(),
            tt_hits: report.table_stats.hits,
            tt_misses: report.table_stats.misses,
        }
    }
}

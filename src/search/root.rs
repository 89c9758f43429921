// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::SearchError;
use crate::eval::{BoardEvaluator, Score};
use crate::position::Position;
use crate::search::{AlphaBeta, Deadline, TableStats, TranspositionTable};

/// What happened to the search of one root move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RootOutcome {
    /// The subtree was searched to completion.
    Scored(Score),

    /// The subtree failed to beat the threshold it was searched against.
    Filtered,

    /// The deadline expired before the subtree was finished.
    Abandoned,

    /// The worker searching the subtree panicked.
    Failed,
}

/// The aggregated result of searching every root move at one depth.
#[derive(Clone, Debug)]
pub struct RootReport<M> {
    /// The best scored root move, if any move was scored at all.
    pub best: Option<(M, Score)>,

    /// Every root move in generation order, with what became of it.
    pub outcomes: Vec<(M, RootOutcome)>,
    pub nodes: u64,

    /// Transposition table activity, summed over every table used.
    pub table_stats: TableStats,
}

impl<M> RootReport<M> {
    fn count(&self, pred: impl Fn(&RootOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| match o {
            RootOutcome::Scored(_) | RootOutcome::Filtered => true,
            _ => false,
        })
    }

    pub fn abandoned(&self) -> usize {
        self.count(|o| *o == RootOutcome::Abandoned)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| *o == RootOutcome::Failed)
    }
}

/// Fans the root moves of a position out to a fixed pool of workers. Every unit of work owns a
/// private copy of the position with its root move already applied, and its own transposition
/// table; nothing mutable is shared between workers.
pub struct RootDispatcher {
    pool: Option<ThreadPool>,
}

impl RootDispatcher {
    /// Builds a dispatcher with `threads` workers. A single worker means the root moves are
    /// searched in order on the calling thread.
    pub fn new(threads: usize) -> Result<RootDispatcher, SearchError> {
        if threads <= 1 {
            return Ok(RootDispatcher { pool: None });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("minerva-search-{}", idx))
            .build()
            .map_err(|err| SearchError::ThreadPool(err.to_string()))?;
        Ok(RootDispatcher { pool: Some(pool) })
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
            .unwrap_or(1)
    }

    /// Searches every root move of `pos` to `depth` plies (counting the root move itself).
    ///
    /// When `threshold` is given, each root move is searched with alpha raised to it and a move
    /// that cannot beat it is reported as filtered instead of scored. `table` is used only when
    /// the search runs sequentially; parallel workers each build their own.
    pub fn search_root<P, E>(
        &self,
        evaluator: &E,
        pos: &P,
        depth: u32,
        threshold: Option<Score>,
        deadline: Deadline,
        table: &mut TranspositionTable,
    ) -> Result<RootReport<P::Move>, SearchError>
    where
        P: Position,
        E: BoardEvaluator<P>,
    {
        let depth = depth.max(1);
        let moves = pos.legal_moves();
        let snapshots: Vec<P> = moves
            .iter()
            .map(|&mov| {
                let mut child = pos.clone();
                child.make_move(mov);
                child
            })
            .collect();

        let mut table_stats = TableStats::default();
        let results: Vec<Result<(RootOutcome, u64), SearchError>> = match self.pool {
            Some(ref pool) => {
                let results: Vec<_> = pool.install(|| {
                    snapshots
                        .into_par_iter()
                        .map(|child| {
                            let mut table = TranspositionTable::new();
                            let result =
                                run_unit(evaluator, child, depth, threshold, deadline, &mut table);
                            (result, table.stats())
                        })
                        .collect()
                });

                results
                    .into_iter()
                    .map(|(result, stats)| {
                        table_stats.hits += stats.hits;
                        table_stats.misses += stats.misses;
                        table_stats.stores += stats.stores;
                        result
                    })
                    .collect()
            }
            None => {
                let before = table.stats();
                let results = snapshots
                    .into_iter()
                    .map(|child| run_unit(evaluator, child, depth, threshold, deadline, table))
                    .collect();
                let after = table.stats();
                table_stats.hits = after.hits - before.hits;
                table_stats.misses = after.misses - before.misses;
                table_stats.stores = after.stores - before.stores;
                results
            }
        };

        let mut report = RootReport {
            best: None,
            outcomes: Vec::with_capacity(moves.len()),
            nodes: 0,
            table_stats,
        };

        for (mov, result) in moves.into_iter().zip(results) {
            let (outcome, nodes) = result?;
            report.nodes += nodes;
            debug!("root move {} at depth {}: {:?}", mov, depth, outcome);
            if let RootOutcome::Scored(score) = outcome {
                // Strictly greater, so ties go to the first move generated.
                let improves = match report.best {
                    Some((_, best)) => score > best,
                    None => true,
                };
                if improves {
                    report.best = Some((mov, score));
                }
            }

            report.outcomes.push((mov, outcome));
        }

        Ok(report)
    }
}

fn run_unit<P, E>(
    evaluator: &E,
    mut child: P,
    depth: u32,
    threshold: Option<Score>,
    deadline: Deadline,
    table: &mut TranspositionTable,
) -> Result<(RootOutcome, u64), SearchError>
where
    P: Position,
    E: BoardEvaluator<P>,
{
    if deadline.expired() {
        return Ok((RootOutcome::Abandoned, 0));
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut search = AlphaBeta::new(evaluator, table, deadline);
        let alpha = threshold.unwrap_or(Score::MIN);
        let result = search.search_from(&mut child, 1, depth - 1, alpha, Score::MAX, false);
        result.map(|(score, _)| (score, search.aborted(), search.nodes()))
    }));

    match result {
        Ok(Ok((_, true, nodes))) => Ok((RootOutcome::Abandoned, nodes)),
        Ok(Ok((score, false, nodes))) => match threshold {
            Some(threshold) if score <= threshold => Ok((RootOutcome::Filtered, nodes)),
            _ => Ok((RootOutcome::Scored(score), nodes)),
        },
        Ok(Err(err)) => Err(err),
        Err(_) => {
            warn!("root worker panicked; treating its move as unscored");
            Ok((RootOutcome::Failed, 0))
        }
    }
}

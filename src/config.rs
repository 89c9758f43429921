// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::thread;

use crate::eval::EvalWeights;

/// How the iterative deepening driver decides whether a deeper result replaces the one it
/// already holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Compare static evaluations of the positions reached by each candidate move.
    StaticReevaluation,

    /// Compare the minimax scores the searches themselves produced.
    SearchScore,
}

/// Engine configuration. Every field has a default, so a partial JSON document is enough to
/// override a single knob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of workers searching root moves in parallel. One means the root moves are
    /// searched in order on the calling thread.
    pub threads: usize,

    pub retention: Retention,

    /// When time runs short, a root move is only reported if it scores better than the
    /// static evaluation of the root minus this margin.
    pub aspiration_margin: f32,

    /// Fraction of the time budget below which time counts as "short".
    pub pressure_fraction: f32,

    pub weights: EvalWeights,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            threads: available_threads(),
            retention: Retention::StaticReevaluation,
            aspiration_margin: 50.0,
            pressure_fraction: 0.25,
            weights: EvalWeights::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_threads(mut self, threads: usize) -> SearchConfig {
        self.threads = threads.max(1);
        self
    }

    pub fn with_retention(mut self, retention: Retention) -> SearchConfig {
        self.retention = retention;
        self
    }
}

fn available_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::time::{Duration, Instant};

use crate::error::SearchError;
use crate::eval::Score;
use crate::position::Position;
use crate::search::DataRecorder;

/// The answer to a single `decide_move` call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<M> {
    pub best_move: M,

    /// The score the move was retained with, from the mover's point of view.
    pub score: Score,

    /// The score the search itself assigned to the move at `depth`.
    pub search_score: Score,

    /// Deepest depth whose result was retained. Zero means the move came from the one-ply
    /// fallback.
    pub depth: u32,
    pub nodes_searched: u64,
}

/// How much effort a single decision may spend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u32,
    pub time_budget: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(max_depth: u32) -> SearchLimits {
        SearchLimits {
            max_depth,
            time_budget: None,
        }
    }

    pub fn timed(max_depth: u32, budget: Duration) -> SearchLimits {
        SearchLimits {
            max_depth,
            time_budget: Some(budget),
        }
    }
}

/// A wall-clock deadline that searches poll cooperatively. Nothing is ever interrupted; a
/// search that sees an expired deadline winds itself down.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn new(budget: Option<Duration>) -> Deadline {
        Deadline {
            start: Instant::now(),
            budget,
        }
    }

    pub fn none() -> Deadline {
        Deadline::new(None)
    }

    pub fn expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.start.elapsed() >= budget,
            None => false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.budget
            .map(|budget| budget.checked_sub(self.start.elapsed()).unwrap_or_default())
    }

    /// True once less than `fraction` of the budget remains. Never true without a budget.
    pub fn under_pressure(&self, fraction: f32) -> bool {
        match (self.budget, self.remaining()) {
            (Some(budget), Some(remaining)) => {
                self.expired() || remaining.as_secs_f32() < budget.as_secs_f32() * fraction
            }
            _ => false,
        }
    }
}

pub trait Searcher<P: Position> {
    fn decide_move(
        &self,
        pos: &P,
        limits: SearchLimits,
        recorder: &dyn DataRecorder,
    ) -> Result<SearchResult<P::Move>, SearchError>;
}

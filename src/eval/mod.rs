// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;

mod heuristic_evaluator;
mod score;
pub(crate) mod tables;

pub use heuristic_evaluator::{EvalWeights, HeuristicEvaluator};
pub use score::{Score, MATE_SCORE};

/// A static evaluation function. The returned score is always relative to the side to move
/// in `pos`, and must be deterministic: the same position always evaluates the same.
pub trait BoardEvaluator<P: Position>: Send + Sync {
    fn evaluate(&self, pos: &P) -> Score;
}

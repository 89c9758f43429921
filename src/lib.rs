// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Minerva decides chess moves: a heuristic evaluator, an alpha-beta search over it, a root
//! dispatcher that spreads the root moves over a pool of workers, and an iterative deepening
//! driver that keeps the best answer found before the time runs out.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod analysis;
mod board;
mod config;
mod error;
pub mod eval;
mod position;
pub mod search;

pub use board::GamePosition;
pub use config::{Retention, SearchConfig};
pub use error::{Outcome, SearchError};
pub use position::{apply, MoveGuard, Position, Side};

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

/// The way a game ended, as seen from the position handed to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate,
    Stalemate,
    Repetition,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Checkmate => write!(f, "checkmate"),
            Outcome::Stalemate => write!(f, "stalemate"),
            Outcome::Repetition => write!(f, "threefold repetition"),
        }
    }
}

/// Possible errors that can arise when asking the engine for a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// The FEN string could not be parsed into a position.
    InvalidFen(String),

    /// A move string was not a legal move in the current position.
    InvalidMove(String),

    /// The position has no legal moves, yet the position collaborator claims that the game
    /// is not over. This is a contract violation and is never retried.
    NoLegalMoves,

    /// The game is already over; there is nothing to decide.
    GameOver(Outcome),

    /// Every root branch failed and not even a one-ply evaluation produced a move.
    NoDecision,

    /// The worker pool could not be constructed.
    ThreadPool(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::InvalidFen(fen) => write!(f, "invalid fen: {}", fen),
            SearchError::InvalidMove(mov) => write!(f, "invalid move: {}", mov),
            SearchError::NoLegalMoves => {
                write!(f, "position has no legal moves but is not terminal")
            }
            SearchError::GameOver(outcome) => write!(f, "game is over ({})", outcome),
            SearchError::NoDecision => write!(f, "engine could not decide on a move"),
            SearchError::ThreadPool(msg) => write!(f, "failed to build worker pool: {}", msg),
        }
    }
}

impl Error for SearchError {}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The capability the search core needs from a game position. The core never implements
//! game rules itself; it only borrows a `Position` for the duration of a search and is
//! obligated to hand it back exactly as it found it.
use std::fmt;
use std::ops::{Deref, DerefMut, Not};

/// One of the two players. `First` is the player who moves first in the game (White, in chess).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

pub trait Position: Clone + Send {
    /// A move, as produced by `legal_moves` and consumed by `make_move`.
    type Move: Copy + Eq + Send + fmt::Debug + fmt::Display;

    /// Whatever the position needs to take back a move.
    type Undo;

    fn side_to_move(&self) -> Side;

    /// All legal moves, in a stable generation order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, mov: Self::Move) -> Self::Undo;

    fn unmake_move(&mut self, undo: Self::Undo);

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    /// Whether the side to move is in check.
    fn is_check(&self) -> bool;

    /// How many times the current position has occurred in the game so far, counting this
    /// occurrence.
    fn repetition_count(&self) -> u32;

    /// A hash of the full position state (placement, side to move, castling, en passant).
    fn fingerprint(&self) -> u64;

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_stalemate()
    }
}

/// A move that has been applied to a position and that will be taken back when the guard
/// goes out of scope, no matter how the scope is left.
pub struct MoveGuard<'a, P: Position> {
    pos: &'a mut P,
    undo: Option<P::Undo>,
}

impl<'a, P: Position> MoveGuard<'a, P> {
    pub fn new(pos: &'a mut P, mov: P::Move) -> MoveGuard<'a, P> {
        let undo = pos.make_move(mov);
        MoveGuard {
            pos,
            undo: Some(undo),
        }
    }
}

impl<'a, P: Position> Deref for MoveGuard<'a, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.pos
    }
}

impl<'a, P: Position> DerefMut for MoveGuard<'a, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.pos
    }
}

impl<'a, P: Position> Drop for MoveGuard<'a, P> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.pos.unmake_move(undo);
        }
    }
}

/// Applies `mov` to `pos`, returning a guard that undoes it on drop.
pub fn apply<P: Position>(pos: &mut P, mov: P::Move) -> MoveGuard<'_, P> {
    MoveGuard::new(pos, mov)
}

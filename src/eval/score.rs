// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

/// Magnitude used when a forced mate has to be expressed as a plain number.
pub const MATE_SCORE: f32 = 10_000_000.0;

/// Score is the output of a board evaluation function. Scores are always relative to a
/// particular player: positive is good for that player.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Score {
    /// A forced win for the player, delivered the given number of plies from now.
    Win(u32),

    /// A forced loss for the player, suffered the given number of plies from now.
    Loss(u32),

    /// Neither a forced win nor a forced loss; the evaluator assigned this heuristic value.
    Evaluated(f32),
}

impl Score {
    pub const DRAW: Score = Score::Evaluated(0.0);

    /// Lower than every score a search can produce below the root.
    pub const MIN: Score = Score::Loss(0);

    /// Higher than every score a search can produce below the root.
    pub const MAX: Score = Score::Win(0);

    /// Rebases a mate score found at the given distance from the search root so that it
    /// counts plies from the root.
    pub fn at_ply(self, ply: u32) -> Score {
        match self {
            Score::Win(n) => Score::Win(n + ply),
            Score::Loss(n) => Score::Loss(n + ply),
            s => s,
        }
    }

    /// Converts a root-relative mate distance into one relative to the node at `ply`, so the
    /// entry stays correct when the same position is reached along a path of another length.
    pub fn to_table(self, ply: u32) -> Score {
        match self {
            Score::Win(n) => Score::Win(n.saturating_sub(ply)),
            Score::Loss(n) => Score::Loss(n.saturating_sub(ply)),
            s => s,
        }
    }

    pub fn from_table(self, ply: u32) -> Score {
        self.at_ply(ply)
    }

    /// Shifts a heuristic score by `delta`. Mate scores are left alone.
    pub fn offset(self, delta: f32) -> Score {
        match self {
            Score::Evaluated(score) => Score::Evaluated(score + delta),
            s => s,
        }
    }

    pub fn is_mate(self) -> bool {
        match self {
            Score::Evaluated(_) => false,
            _ => true,
        }
    }

    /// The score as a single number, with mates pinned near `MATE_SCORE`.
    pub fn centipawns(self) -> f32 {
        match self {
            Score::Win(plies) => MATE_SCORE - plies as f32,
            Score::Loss(plies) => -(MATE_SCORE - plies as f32),
            Score::Evaluated(score) => score,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Score::Win(in_plies) => write!(f, "#{}", in_plies),
            Score::Loss(in_plies) => write!(f, "#-{}", in_plies),
            Score::Evaluated(score) => write!(f, "{}", score),
        }
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Score) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Score) -> Ordering {
        // The Ord implementation totally orders scores based on "badness":
        //   1. A winning score is better than another winning score if it wins in less plies
        //      than the other.
        //   2. A losing score is better than another losing score if it it loses in more plies
        //      than the other.
        //   3. A winning score is better than all non-winning scores.
        //   4. A losing score is worse than all non-losing scores.
        //   5. Two evaluated scores are comparable like any other number.
        match (self, other) {
            // Rules 1 and 2
            (Score::Win(self_win), Score::Win(other_win)) => other_win.cmp(self_win),
            (Score::Loss(self_loss), Score::Loss(other_loss)) => self_loss.cmp(other_loss),

            // Rules 3 and 4
            (Score::Win(_), _) => Ordering::Greater,
            (_, Score::Win(_)) => Ordering::Less,
            (Score::Loss(_), _) => Ordering::Less,
            (_, Score::Loss(_)) => Ordering::Greater,

            // Rule 5
            (Score::Evaluated(self_score), Score::Evaluated(other_score)) => self_score
                .partial_cmp(other_score)
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        match self {
            Score::Win(plies) => Score::Loss(plies),
            Score::Loss(plies) => Score::Win(plies),
            Score::Evaluated(score) => Score::Evaluated(-score),
        }
    }
}

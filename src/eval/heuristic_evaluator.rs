// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chess::Color;

use crate::analysis::Analysis;
use crate::board::GamePosition;
use crate::eval::{BoardEvaluator, Score};
use crate::position::Position;

/// Tuning constants for `HeuristicEvaluator`. Changing them changes how well the engine plays,
/// never whether the search is correct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Values of pawn, knight, bishop, rook and queen, in that order.
    pub piece_values: [f32; 5],
    pub isolated_pawn_penalty: f32,
    pub doubled_pawn_penalty: f32,
    pub king_safety_bonus: f32,

    pub material: f32,
    pub activity: f32,
    pub mobility: f32,
    pub center_control: f32,
    pub pawn_structure: f32,
    pub king_safety: f32,
}

impl Default for EvalWeights {
    fn default() -> EvalWeights {
        EvalWeights {
            piece_values: [100.0, 280.0, 320.0, 500.0, 900.0],
            isolated_pawn_penalty: 30.0,
            doubled_pawn_penalty: 40.0,
            king_safety_bonus: 1000.0,

            material: 4.0,
            activity: 0.1,
            mobility: 0.05,
            center_control: 0.4,
            pawn_structure: 0.2,
            king_safety: 0.4,
        }
    }
}

/// Hand-tuned evaluation: material, piece-square activity, mobility, center control, pawn
/// structure and king safety, blended by `EvalWeights`.
///
/// Terms that are naturally computed from White's point of view are negated when Black is to
/// move, so the final score always favors the side to move. Stalemate is deliberately not
/// recognized here; draws are the search's business.
#[derive(Clone, Debug, Default)]
pub struct HeuristicEvaluator {
    weights: EvalWeights,
}

impl HeuristicEvaluator {
    pub fn new() -> HeuristicEvaluator {
        HeuristicEvaluator::default()
    }

    pub fn with_weights(weights: EvalWeights) -> HeuristicEvaluator {
        HeuristicEvaluator { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }
}

impl BoardEvaluator<GamePosition> for HeuristicEvaluator {
    fn evaluate(&self, pos: &GamePosition) -> Score {
        if pos.is_checkmate() {
            return Score::Loss(0);
        }

        let w = &self.weights;
        let analysis = Analysis::new(pos.board());
        let material = evaluate_metric(|c| analysis.material(c, &w.piece_values));
        let activity = evaluate_metric(|c| analysis.activity(c));
        // Own pieces on the center squares minus the opponent's; a square held by either side
        // does not count for both.
        let center = evaluate_metric(|c| analysis.center_occupancy(c) as f32);
        let pawn_structure = evaluate_metric(|c| {
            let isolated = analysis.isolated_pawns(c).popcnt() as f32;
            let doubled = analysis.doubled_pawns(c).popcnt() as f32;
            -(isolated * w.isolated_pawn_penalty + doubled * w.doubled_pawn_penalty)
        });

        let white_relative = w.material * material
            + w.activity * activity
            + w.center_control * center
            + w.pawn_structure * pawn_structure;
        let side_relative = match pos.board().side_to_move() {
            Color::White => white_relative,
            Color::Black => -white_relative,
        };

        // Both of these already describe the side to move.
        let mobility = analysis.mobility() as f32;
        let king_safety = if pos.is_check() {
            -w.king_safety_bonus
        } else {
            w.king_safety_bonus
        };

        Score::Evaluated(side_relative + w.mobility * mobility + w.king_safety * king_safety)
    }
}

fn evaluate_metric<F>(func: F) -> f32
where
    F: Fn(Color) -> f32,
{
    func(Color::White) - func(Color::Black)
}

#[cfg(test)]
mod tests {
    use super::{EvalWeights, HeuristicEvaluator};
    use crate::board::GamePosition;
    use crate::eval::{BoardEvaluator, Score};

    fn eval(fen: &str) -> Score {
        let pos = GamePosition::from_fen(fen).unwrap();
        HeuristicEvaluator::new().evaluate(&pos)
    }

    fn value(score: Score) -> f32 {
        match score {
            Score::Evaluated(v) => v,
            s => panic!("expected heuristic score, got {}", s),
        }
    }

    #[test]
    fn white_mate_evaluation() {
        assert_eq!(Score::Loss(0), eval("8/8/8/8/8/3k4/3q4/3K4 w - - 0 1"));
    }

    #[test]
    fn black_mate_evaluation() {
        assert_eq!(Score::Loss(0), eval("4k3/4Q3/4K3/8/8/8/8/8 b - - 0 1"));
    }

    #[test]
    fn start_position() {
        // balanced except for 20 legal moves and a king that is not in check
        let score = value(eval("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!((score - 401.0).abs() < 1e-3, "score was {}", score);
    }

    #[test]
    fn mirrored_positions_score_equally() {
        let black = value(eval(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        ));
        let white = value(eval(
            "rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        ));
        assert!((black - white).abs() < 1e-3, "{} != {}", black, white);
    }

    #[test]
    fn extra_queen_favors_its_owner() {
        let white_to_move = value(eval("3qk3/8/8/8/8/8/8/4K3 w - - 0 1"));
        let black_to_move = value(eval("3qk3/8/8/8/8/8/8/4K3 b - - 0 1"));
        assert!(white_to_move < 0.0);
        assert!(black_to_move > 0.0);
    }

    #[test]
    fn check_costs_king_safety() {
        let quiet = value(eval("4k3/8/8/8/8/8/3R4/4K3 b - - 0 1"));
        let checked = value(eval("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1"));
        assert!(checked < quiet);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let pos = GamePosition::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        )
        .unwrap();
        let evaluator = HeuristicEvaluator::with_weights(EvalWeights::default());
        let first = evaluator.evaluate(&pos);
        for _ in 0..10 {
            assert_eq!(first, evaluator.evaluate(&pos));
        }
    }

    fn center_only(fen: &str) -> f32 {
        let weights = EvalWeights {
            material: 0.0,
            activity: 0.0,
            mobility: 0.0,
            center_control: 1.0,
            pawn_structure: 0.0,
            king_safety: 0.0,
            ..EvalWeights::default()
        };
        let pos = GamePosition::from_fen(fen).unwrap();
        value(HeuristicEvaluator::with_weights(weights).evaluate(&pos))
    }

    #[test]
    fn center_control_counts_own_minus_opponent() {
        assert_eq!(1.0, center_only("4k3/8/8/3p4/3PP3/8/8/4K3 w - - 0 1"));
        assert_eq!(-1.0, center_only("4k3/8/8/3p4/3PP3/8/8/4K3 b - - 0 1"));
        // Both sides hold two center squares each.
        assert_eq!(0.0, center_only("4k3/8/8/3pp3/3PP3/8/8/4K3 w - - 0 1"));
    }

    #[test]
    fn stalemate_is_not_special_cased() {
        match eval("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1") {
            Score::Evaluated(_) => {}
            s => panic!("stalemate should be a heuristic score, got {}", s),
        }
    }
}

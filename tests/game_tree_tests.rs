// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search tests over small random game trees, where the exact minimax value can be computed
//! by brute force and compared with what the engine reports.
extern crate minerva;

use std::sync::Arc;
use std::time::Duration;

use minerva::eval::{BoardEvaluator, Score};
use minerva::search::{
    AlphaBeta, Deadline, IterativeDeepeningSearcher, NullDataRecorder, RootDispatcher,
    RootOutcome, SearchLimits, Searcher, TranspositionTable,
};
use minerva::{Position, Retention, SearchConfig, SearchError, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LEVELS: usize = 6;
const WIDTH: usize = 7;

struct Node {
    children: Vec<usize>,
    value: f32,
    mated: bool,
}

/// A layered DAG: every node on level `l` only has children on level `l + 1`, so a node is
/// always reached at the same ply and with the same side to move, but it can be reached by
/// several paths. Nodes on the last level have no moves and score as draws.
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn random(seed: u64) -> Tree {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut nodes = vec![];
        for level in 0..LEVELS {
            let count = if level == 0 { 1 } else { WIDTH };
            let next_level = if level == 0 { 1 } else { 1 + level * WIDTH };
            for _ in 0..count {
                let terminal = level > 0 && level + 1 < LEVELS && rng.gen_bool(0.15);
                let children = if terminal || level + 1 == LEVELS {
                    vec![]
                } else {
                    let mut children: Vec<usize> = (0..WIDTH).map(|i| next_level + i).collect();
                    let keep = rng.gen_range(1..=4);
                    while children.len() > keep {
                        let idx = rng.gen_range(0..children.len());
                        children.remove(idx);
                    }
                    children
                };

                nodes.push(Node {
                    children,
                    value: rng.gen_range(-50..=50) as f32,
                    mated: terminal && rng.gen_bool(0.5),
                });
            }
        }

        Tree { nodes }
    }
}

#[derive(Clone)]
struct TreePosition {
    tree: Arc<Tree>,
    path: Vec<usize>,
}

impl TreePosition {
    fn new(tree: Tree) -> TreePosition {
        TreePosition {
            tree: Arc::new(tree),
            path: vec![0],
        }
    }

    fn node(&self) -> &Node {
        let id = self.path[self.path.len() - 1];
        &self.tree.nodes[id]
    }
}

impl Position for TreePosition {
    type Move = usize;
    type Undo = ();

    fn side_to_move(&self) -> Side {
        if self.path.len() % 2 == 1 {
            Side::First
        } else {
            Side::Second
        }
    }

    fn legal_moves(&self) -> Vec<usize> {
        self.node().children.clone()
    }

    fn make_move(&mut self, mov: usize) {
        self.path.push(mov);
    }

    fn unmake_move(&mut self, _undo: ()) {
        self.path.pop();
    }

    fn is_checkmate(&self) -> bool {
        self.node().mated
    }

    fn is_stalemate(&self) -> bool {
        self.node().children.is_empty() && !self.node().mated
    }

    fn is_check(&self) -> bool {
        self.node().mated
    }

    fn repetition_count(&self) -> u32 {
        1
    }

    fn fingerprint(&self) -> u64 {
        self.path[self.path.len() - 1] as u64
    }
}

struct TreeEvaluator;

/// Evaluates like `TreeEvaluator` but panics on the listed nodes, or on every node when the
/// list is empty.
struct FaultyEvaluator {
    faulty: Vec<usize>,
}

impl BoardEvaluator<TreePosition> for FaultyEvaluator {
    fn evaluate(&self, pos: &TreePosition) -> Score {
        let id = pos.fingerprint() as usize;
        if self.faulty.is_empty() || self.faulty.contains(&id) {
            panic!("evaluator failed at node {}", id);
        }

        TreeEvaluator.evaluate(pos)
    }
}

fn node(children: Vec<usize>, value: f32) -> Node {
    Node {
        children,
        value,
        mated: false,
    }
}

/// Root 0 with three replies 1, 2 and 3, each leading to the same quiet node 4. Values are
/// from the side to move at each node, so the root sees the replies as worth 2, 3 and 4.
fn three_replies() -> Tree {
    Tree {
        nodes: vec![
            node(vec![1, 2, 3], 0.0),
            node(vec![4], -2.0),
            node(vec![4], -3.0),
            node(vec![4], -4.0),
            node(vec![], 0.0),
        ],
    }
}

impl BoardEvaluator<TreePosition> for TreeEvaluator {
    fn evaluate(&self, pos: &TreePosition) -> Score {
        if pos.is_checkmate() {
            Score::Loss(0)
        } else {
            Score::Evaluated(pos.node().value)
        }
    }
}

fn minimax(pos: &mut TreePosition, ply: u32, depth: u32, maximizing: bool) -> Score {
    if pos.is_stalemate() {
        return Score::DRAW;
    }

    if depth == 0 || pos.is_checkmate() {
        let score = TreeEvaluator.evaluate(pos).at_ply(ply);
        return if maximizing { score } else { -score };
    }

    let mut scores = vec![];
    for mov in pos.legal_moves() {
        pos.make_move(mov);
        scores.push(minimax(pos, ply + 1, depth - 1, !maximizing));
        pos.unmake_move(());
    }

    if maximizing {
        scores.into_iter().max().unwrap()
    } else {
        scores.into_iter().min().unwrap()
    }
}

#[test]
fn alpha_beta_matches_brute_force() {
    for seed in 0..40 {
        let mut pos = TreePosition::new(Tree::random(seed));
        for depth in 1..LEVELS as u32 {
            let expected = minimax(&mut pos, 0, depth, true);
            let mut table = TranspositionTable::new();
            let mut search = AlphaBeta::new(&TreeEvaluator, &mut table, Deadline::none());
            let (score, mov) = search
                .search(&mut pos, depth, Score::MIN, Score::MAX, true)
                .unwrap();
            assert_eq!(expected, score, "seed {} depth {}", seed, depth);
            assert!(mov.is_some());
            assert_eq!(vec![0], pos.path);
        }
    }
}

#[test]
fn reused_table_does_not_change_results() {
    for seed in 0..40 {
        let mut pos = TreePosition::new(Tree::random(seed));
        let mut table = TranspositionTable::new();
        for depth in 1..LEVELS as u32 {
            let expected = minimax(&mut pos, 0, depth, true);
            let mut search = AlphaBeta::new(&TreeEvaluator, &mut table, Deadline::none());
            let (score, _) = search
                .search(&mut pos, depth, Score::MIN, Score::MAX, true)
                .unwrap();
            assert_eq!(expected, score, "seed {} depth {}", seed, depth);
        }
    }
}

#[test]
fn narrow_window_bounds_are_consistent() {
    for seed in 0..40 {
        let mut pos = TreePosition::new(Tree::random(seed));
        let depth = 4;
        let exact = minimax(&mut pos, 0, depth, true);
        let alpha = Score::Evaluated(-5.0);
        let beta = Score::Evaluated(5.0);
        let mut table = TranspositionTable::new();
        let mut search = AlphaBeta::new(&TreeEvaluator, &mut table, Deadline::none());
        let (score, _) = search.search(&mut pos, depth, alpha, beta, true).unwrap();
        if exact <= alpha {
            assert!(score <= alpha, "seed {}", seed);
        } else if exact >= beta {
            assert!(score >= beta, "seed {}", seed);
        } else {
            assert_eq!(exact, score, "seed {}", seed);
        }
    }
}

#[test]
fn dispatcher_matches_brute_force() {
    let dispatcher = RootDispatcher::new(3).unwrap();
    for seed in 0..20 {
        let mut pos = TreePosition::new(Tree::random(seed));
        for depth in 1..LEVELS as u32 {
            let expected = minimax(&mut pos, 0, depth, true);
            let mut table = TranspositionTable::new();
            let report = dispatcher
                .search_root(&TreeEvaluator, &pos, depth, None, Deadline::none(), &mut table)
                .unwrap();
            let (_, score) = report.best.unwrap();
            assert_eq!(expected, score, "seed {} depth {}", seed, depth);
            assert_eq!(pos.legal_moves().len(), report.completed());
        }
    }
}

#[test]
fn dispatcher_breaks_ties_by_generation_order() {
    let dispatcher = RootDispatcher::new(4).unwrap();
    for seed in 0..20 {
        let mut pos = TreePosition::new(Tree::random(seed));
        let mut table = TranspositionTable::new();
        let report = dispatcher
            .search_root(&TreeEvaluator, &pos, 3, None, Deadline::none(), &mut table)
            .unwrap();
        let (best_move, best_score) = report.best.unwrap();

        let mut first = None;
        for mov in pos.legal_moves() {
            pos.make_move(mov);
            let score = minimax(&mut pos, 1, 2, false);
            pos.unmake_move(());
            if score == best_score {
                first = Some(mov);
                break;
            }
        }

        assert_eq!(first, Some(best_move), "seed {}", seed);
    }
}

#[test]
fn driver_with_search_retention_reports_deepest_minimax() {
    let config = SearchConfig::default()
        .with_threads(2)
        .with_retention(Retention::SearchScore);
    let searcher = IterativeDeepeningSearcher::new(TreeEvaluator, config).unwrap();
    for seed in 0..20 {
        let mut pos = TreePosition::new(Tree::random(seed));
        let result = searcher
            .decide_move(&pos, SearchLimits::depth(3), &NullDataRecorder)
            .unwrap();
        let expected = minimax(&mut pos, 0, result.depth, true);
        assert_eq!(expected, result.search_score, "seed {}", seed);
        assert!(pos.legal_moves().contains(&result.best_move));
    }
}

#[test]
fn driver_under_time_pressure_matches_unpressured() {
    let config = SearchConfig::default()
        .with_threads(1)
        .with_retention(Retention::SearchScore);
    let relaxed = IterativeDeepeningSearcher::new(TreeEvaluator, config.clone()).unwrap();
    let mut pressured_config = config;
    pressured_config.pressure_fraction = 1.0;
    let pressured = IterativeDeepeningSearcher::new(TreeEvaluator, pressured_config).unwrap();
    for seed in 0..20 {
        let pos = TreePosition::new(Tree::random(seed));
        let expected = relaxed
            .decide_move(&pos, SearchLimits::depth(4), &NullDataRecorder)
            .unwrap();
        let result = pressured
            .decide_move(
                &pos,
                SearchLimits::timed(4, Duration::from_secs(3600)),
                &NullDataRecorder,
            )
            .unwrap();
        assert_eq!(expected.best_move, result.best_move, "seed {}", seed);
        assert_eq!(expected.search_score, result.search_score, "seed {}", seed);
        assert_eq!(expected.depth, result.depth, "seed {}", seed);
    }
}

#[test]
fn failed_unit_leaves_siblings_scored() {
    let pos = TreePosition::new(three_replies());
    let evaluator = FaultyEvaluator { faulty: vec![3] };
    for &threads in &[1, 3] {
        let dispatcher = RootDispatcher::new(threads).unwrap();
        let mut table = TranspositionTable::new();
        let report = dispatcher
            .search_root(&evaluator, &pos, 1, None, Deadline::none(), &mut table)
            .unwrap();
        assert_eq!(
            vec![
                (1, RootOutcome::Scored(Score::Evaluated(2.0))),
                (2, RootOutcome::Scored(Score::Evaluated(3.0))),
                (3, RootOutcome::Failed),
            ],
            report.outcomes,
            "threads {}",
            threads
        );
        assert_eq!(Some((2, Score::Evaluated(3.0))), report.best);
        assert_eq!(1, report.failed());
        assert_eq!(2, report.completed());
    }
}

#[test]
fn driver_skips_failed_root_move() {
    let config = SearchConfig::default()
        .with_threads(2)
        .with_retention(Retention::SearchScore);
    let searcher = IterativeDeepeningSearcher::new(FaultyEvaluator { faulty: vec![3] }, config)
        .unwrap();
    let pos = TreePosition::new(three_replies());
    let result = searcher
        .decide_move(&pos, SearchLimits::depth(1), &NullDataRecorder)
        .unwrap();
    assert_eq!(2, result.best_move);
    assert_eq!(Score::Evaluated(3.0), result.search_score);
}

#[test]
fn every_evaluation_failing_is_no_decision() {
    let pos = TreePosition::new(three_replies());
    for &threads in &[1, 2] {
        let config = SearchConfig::default().with_threads(threads);
        let searcher =
            IterativeDeepeningSearcher::new(FaultyEvaluator { faulty: vec![] }, config).unwrap();
        let result = searcher.decide_move(&pos, SearchLimits::depth(1), &NullDataRecorder);
        assert_eq!(Err(SearchError::NoDecision), result.map(|r| r.best_move));
    }
}

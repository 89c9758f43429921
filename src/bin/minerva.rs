// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::fs::File;
use std::process;
use std::time::Duration;

use clap::{App, Arg, ArgMatches, SubCommand};
use minerva::eval::{BoardEvaluator, HeuristicEvaluator};
use minerva::search::{
    CsvDataRecorder, DataRecorder, IterativeDeepeningSearcher, NullDataRecorder, SearchLimits,
    Searcher,
};
use minerva::{GamePosition, Position, SearchConfig, SearchError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn fen_arg() -> Arg<'static, 'static> {
    Arg::with_name("FEN")
        .help("FEN string for a board position")
        .required(true)
        .index(1)
}

fn search_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("depth")
            .help("Deepest depth to search")
            .value_name("DEPTH")
            .short("-d")
            .long("--depth")
            .default_value("4")
            .takes_value(true),
        Arg::with_name("time")
            .help("Time budget per move, in milliseconds")
            .value_name("MS")
            .short("-t")
            .long("--time")
            .takes_value(true),
        Arg::with_name("threads")
            .help("Number of search workers")
            .value_name("THREADS")
            .short("-j")
            .long("--threads")
            .takes_value(true),
        Arg::with_name("config")
            .help("JSON file with engine configuration")
            .value_name("PATH")
            .short("-c")
            .long("--config")
            .takes_value(true),
    ]
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("decide")
                .about("Search a board position for the best move")
                .arg(fen_arg())
                .args(&search_args())
                .arg(
                    Arg::with_name("record")
                        .help("Write per-depth search statistics to this CSV file")
                        .value_name("PATH")
                        .short("-r")
                        .long("--record")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Statically evaluate a board position")
                .arg(fen_arg()),
        )
        .subcommand(
            SubCommand::with_name("selfplay")
                .about("Play a game against itself from the start position")
                .args(&search_args())
                .arg(
                    Arg::with_name("random-plies")
                        .help("Number of random plies to open the game with")
                        .value_name("N")
                        .long("--random-plies")
                        .default_value("0")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("max-moves")
                        .help("Stop after this many plies")
                        .value_name("N")
                        .long("--max-moves")
                        .default_value("200")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("seed")
                        .help("Seed for the random opening plies")
                        .value_name("SEED")
                        .long("--seed")
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("decide", Some(matches)) => run_decide(matches),
        ("evaluate", Some(matches)) => run_evaluate(matches),
        ("selfplay", Some(matches)) => run_selfplay(matches),
        _ => {
            eprintln!("{}", matches.usage());
            process::exit(1);
        }
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn path_error(path: &str, err: impl std::fmt::Display) -> String {
    format!("{}: {}", path, err)
}

fn parse_position(matches: &ArgMatches) -> GamePosition {
    let fen = matches.value_of("FEN").unwrap_or_default();
    GamePosition::from_fen(fen).unwrap_or_else(|err| fail(err))
}

fn load_config(matches: &ArgMatches) -> SearchConfig {
    let mut config = match matches.value_of("config") {
        Some(path) => {
            let file = File::open(path).unwrap_or_else(|err| fail(path_error(path, err)));
            serde_json::from_reader(file).unwrap_or_else(|err| fail(path_error(path, err)))
        }
        None => SearchConfig::default(),
    };

    if matches.is_present("threads") {
        let threads = value_t_or_exit!(matches, "threads", usize);
        config = config.with_threads(threads);
    }

    config
}

fn limits(matches: &ArgMatches) -> SearchLimits {
    let depth = value_t_or_exit!(matches, "depth", u32);
    if matches.is_present("time") {
        let ms = value_t_or_exit!(matches, "time", u64);
        SearchLimits::timed(depth, Duration::from_millis(ms))
    } else {
        SearchLimits::depth(depth)
    }
}

fn run_decide(matches: &ArgMatches) -> ! {
    let pos = parse_position(matches);
    let config = load_config(matches);
    let limits = limits(matches);
    let searcher =
        IterativeDeepeningSearcher::from_config(config).unwrap_or_else(|err| fail(err));

    println!("{}", pos);
    println!();
    let result = match matches.value_of("record") {
        Some(path) => {
            let file = File::create(path).unwrap_or_else(|err| fail(path_error(path, err)));
            let recorder = CsvDataRecorder::new(file);
            searcher.decide_move(&pos, limits, &recorder)
        }
        None => searcher.decide_move(&pos, limits, &NullDataRecorder),
    };

    match result {
        Ok(result) => {
            println!("best move: {}", result.best_move);
            println!("    score: {}", result.score);
            println!("   search: {}", result.search_score);
            println!("    depth: {}", result.depth);
            println!("    nodes: {}", result.nodes_searched);
            process::exit(0);
        }
        Err(err) => fail(err),
    }
}

fn run_evaluate(matches: &ArgMatches) -> ! {
    let pos = parse_position(matches);
    let eval = HeuristicEvaluator::new();
    println!("{}", pos);
    println!();
    println!("to move: {}", pos.side_to_move());
    println!("  score: {}", eval.evaluate(&pos));
    process::exit(0);
}

fn run_selfplay(matches: &ArgMatches) -> ! {
    let config = load_config(matches);
    let limits = limits(matches);
    let random_plies = value_t_or_exit!(matches, "random-plies", u32);
    let max_moves = value_t_or_exit!(matches, "max-moves", u32);
    let mut rng = if matches.is_present("seed") {
        StdRng::seed_from_u64(value_t_or_exit!(matches, "seed", u64))
    } else {
        StdRng::from_entropy()
    };

    let searcher =
        IterativeDeepeningSearcher::from_config(config).unwrap_or_else(|err| fail(err));
    let recorder: &dyn DataRecorder = &NullDataRecorder;
    let mut pos = GamePosition::new();
    for ply in 0..max_moves {
        let (mov, note) = if ply < random_plies && !pos.is_game_over() {
            match pos.legal_moves().choose(&mut rng) {
                Some(&mov) => (mov, "random".to_owned()),
                None => fail(SearchError::NoLegalMoves),
            }
        } else {
            match searcher.decide_move(&pos, limits, recorder) {
                Ok(result) => (result.best_move, result.score.to_string()),
                Err(SearchError::GameOver(outcome)) => {
                    println!("game over: {}", outcome);
                    println!("{}", pos.as_fen());
                    process::exit(0);
                }
                Err(err) => fail(err),
            }
        };

        println!("{:>4}. {} {} ({})", ply + 1, pos.side_to_move(), mov, note);
        pos.make_move(mov);
    }

    println!("stopped after {} plies", max_moves);
    println!("{}", pos.as_fen());
    process::exit(0);
}

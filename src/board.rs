// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, MoveGen};

use crate::error::SearchError;
use crate::position::{Position, Side};

/// A chess game state: the current board plus the hashes of every position reached so far,
/// which is what repetition detection needs. All chess rules are delegated to the `chess`
/// crate.
#[derive(Clone, Debug)]
pub struct GamePosition {
    board: Board,
    history: Vec<u64>,
}

impl GamePosition {
    pub fn new() -> GamePosition {
        GamePosition::from_board(Board::default())
    }

    pub fn from_board(board: Board) -> GamePosition {
        GamePosition {
            history: vec![board.get_hash()],
            board,
        }
    }

    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<GamePosition, SearchError> {
        let fen = fen.as_ref();
        Board::from_str(fen)
            .map(GamePosition::from_board)
            .map_err(|_| SearchError::InvalidFen(fen.to_owned()))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Parses a move in UCI coordinate notation (`e2e4`, `e7e8q`) against the legal moves of
    /// this position.
    pub fn parse_move(&self, move_str: &str) -> Option<ChessMove> {
        MoveGen::new_legal(&self.board).find(|mov| mov.to_string() == move_str)
    }

    /// Applies a move given in UCI coordinate notation, keeping it on the game history.
    pub fn push_uci(&mut self, move_str: &str) -> Result<(), SearchError> {
        let mov = self
            .parse_move(move_str)
            .ok_or_else(|| SearchError::InvalidMove(move_str.to_owned()))?;
        self.make_move(mov);
        Ok(())
    }

    pub fn as_fen(&self) -> String {
        self.board.to_string()
    }
}

impl Default for GamePosition {
    fn default() -> GamePosition {
        GamePosition::new()
    }
}

impl Position for GamePosition {
    type Move = ChessMove;
    type Undo = Board;

    fn side_to_move(&self) -> Side {
        match self.board.side_to_move() {
            Color::White => Side::First,
            Color::Black => Side::Second,
        }
    }

    fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn make_move(&mut self, mov: ChessMove) -> Board {
        let previous = self.board;
        self.board = previous.make_move_new(mov);
        self.history.push(self.board.get_hash());
        previous
    }

    fn unmake_move(&mut self, undo: Board) {
        self.history.pop();
        self.board = undo;
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    fn is_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    fn repetition_count(&self) -> u32 {
        let current = self.board.get_hash();
        self.history.iter().filter(|&&hash| hash == current).count() as u32
    }

    fn fingerprint(&self) -> u64 {
        self.board.get_hash()
    }
}

impl fmt::Display for GamePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

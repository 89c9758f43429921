// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chess::{get_adjacent_files, get_file, BitBoard, Board, Color, MoveGen, Piece, Square};
use chess::{ALL_PIECES, EMPTY};

use crate::eval::tables;

const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

/// Provider of common board analyses upon a static position. It is suitable for use in board
/// evaluators, where analysis queries can be aggressively cached when evaluating a single,
/// immutable board position.
pub struct Analysis<'a> {
    board: &'a Board,
}

impl<'a> Analysis<'a> {
    pub fn new(board: &'a Board) -> Analysis<'a> {
        Analysis { board }
    }

    fn pieces(&self, color: Color, piece: Piece) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(color)
    }

    /// Sum of `values[piece]` over every piece of the given color. Kings are never counted.
    pub fn material(&self, color: Color, values: &[f32; 5]) -> f32 {
        ALL_PIECES
            .iter()
            .filter(|&&piece| piece != Piece::King)
            .map(|&piece| self.pieces(color, piece).popcnt() as f32 * values[piece.to_index()])
            .sum()
    }

    /// Sum of piece-square bonuses over every piece of the given color.
    pub fn activity(&self, color: Color) -> f32 {
        let mut total = 0;
        for &piece in ALL_PIECES.iter() {
            for square in self.pieces(color, piece) {
                total += tables::square_value(piece, color, square);
            }
        }

        total as f32
    }

    /// Number of legal moves available to the side to move.
    pub fn mobility(&self) -> u32 {
        MoveGen::new_legal(self.board).len() as u32
    }

    /// Number of the four center squares occupied by pieces of the given color.
    pub fn center_occupancy(&self, color: Color) -> u32 {
        let ours = *self.board.color_combined(color);
        CENTER
            .iter()
            .filter(|&&square| ours & BitBoard::from_square(square) != EMPTY)
            .count() as u32
    }

    /// Returns the set of pawns of the given color with no friendly pawn on an adjacent file.
    pub fn isolated_pawns(&self, color: Color) -> BitBoard {
        let pawns = self.pieces(color, Piece::Pawn);
        let mut answer = EMPTY;
        for square in pawns {
            if pawns & get_adjacent_files(square.get_file()) == EMPTY {
                answer |= BitBoard::from_square(square);
            }
        }

        answer
    }

    /// Returns the set of pawns of the given color that have a friendly pawn on the same file
    /// somewhere between them and their own back rank.
    pub fn doubled_pawns(&self, color: Color) -> BitBoard {
        let pawns = self.pieces(color, Piece::Pawn);
        let mut answer = EMPTY;
        for square in pawns {
            let rank = square.get_rank().to_index();
            let mut same_file = pawns & get_file(square.get_file());
            let behind = same_file.any(|other| {
                let other_rank = other.get_rank().to_index();
                match color {
                    Color::White => other_rank < rank,
                    Color::Black => other_rank > rank,
                }
            });

            if behind {
                answer |= BitBoard::from_square(square);
            }
        }

        answer
    }
}

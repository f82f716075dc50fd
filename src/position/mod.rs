//! The chess position, together with everything needed to make and unmake moves on it.
//!
//! Moves are generated pseudo-legally. Applying a move regenerates the opponent's moves,
//! and a move is legal exactly when none of those replies could capture a royal piece.

use std::fmt;
use std::ops::{Deref, DerefMut};

use board_game_traits::{Color, GameResult, Position as PositionTrait};

use crate::position::board::{Board, MailboxBoard};
use crate::position::condition::Condition;
use crate::position::factory::{MoveFactory, Orthodox};
use crate::position::mv::{Effect, Move, MoveSink};
use crate::position::notation::Language;
use crate::position::piece::{Piece, PieceKind};
use crate::position::reserve::{Reserve, Table};
use crate::position::square::{Square, SquareSet};
use crate::position::state::{Memory, State};

pub mod board;
pub mod condition;
pub mod factory;
mod move_gen;
pub mod mv;
pub mod notation;
pub mod piece;
pub mod reserve;
pub mod square;
pub mod state;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

#[derive(Clone, PartialEq, Debug)]
pub struct Position<B: Board = MailboxBoard, F: MoveFactory = Orthodox> {
    board: B,
    reserve: Reserve,
    table: Table,
    state: State,
    memory: Memory,
    side_to_move: Color,
    factory: F,
    conditions: Vec<Condition>,
}

impl<B: Board, F: MoveFactory> Default for Position<B, F> {
    fn default() -> Self {
        Position::from_fen(START_FEN).expect("The start position is a valid FEN")
    }
}

impl<B: Board, F: MoveFactory> Position<B, F> {
    pub fn new(board: B, reserve: Reserve, state: State, side_to_move: Color) -> Self {
        Position {
            board,
            reserve,
            table: Table::default(),
            state,
            memory: Memory::default(),
            side_to_move,
            factory: F::default(),
            conditions: vec![],
        }
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn set_reserve(&mut self, reserve: Reserve) {
        self.reserve = reserve;
    }

    /// Parses the first four fields of a FEN string. Move counters, if any, are ignored.
    /// Every pawn gets one piece of each promotion type in the reserve.
    pub fn from_fen(fen: &str) -> Result<Self, pgn_traits::Error> {
        let words: Vec<&str> = fen.split_whitespace().collect();
        if words.len() < 4 {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse FEN \"{}\", expected at least 4 fields",
                fen
            )));
        }

        let rows: Vec<&str> = words[0].split('/').collect();
        if rows.len() != 8 {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse FEN \"{}\", had {} rows instead of 8",
                fen,
                rows.len()
            )));
        }
        let mut board = B::default();
        let mut pawns = (0, 0);
        for (row, row_str) in rows.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0;
            for c in row_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                    if file > 8 {
                        return Err(pgn_traits::Error::new_parse_error(format!(
                            "Couldn't parse FEN \"{}\", row \"{}\" has too many squares",
                            fen, row_str
                        )));
                    }
                    continue;
                }
                let piece = Piece::from_fen_char(c).ok_or_else(|| {
                    pgn_traits::Error::new_parse_error(format!(
                        "Couldn't parse FEN \"{}\", bad piece '{}'",
                        fen, c
                    ))
                })?;
                if file >= 8 {
                    return Err(pgn_traits::Error::new_parse_error(format!(
                        "Couldn't parse FEN \"{}\", row \"{}\" has too many squares",
                        fen, row_str
                    )));
                }
                match (piece.kind(), piece.colour()) {
                    (PieceKind::Pawn, Color::White) => pawns.0 += 1,
                    (PieceKind::Pawn, Color::Black) => pawns.1 += 1,
                    _ => (),
                }
                board.put(Square::from_file_rank(file, rank), piece);
                file += 1;
            }
            if file != 8 {
                return Err(pgn_traits::Error::new_parse_error(format!(
                    "Couldn't parse FEN \"{}\", row \"{}\" does not have 8 squares",
                    fen, row_str
                )));
            }
        }

        let side_to_move = match words[1] {
            "w" => Color::White,
            "b" => Color::Black,
            s => {
                return Err(pgn_traits::Error::new_parse_error(format!(
                    "Couldn't parse FEN \"{}\", bad side to move \"{}\"",
                    fen, s
                )))
            }
        };

        let mut castlings = SquareSet::empty();
        if words[2] != "-" {
            for c in words[2].chars() {
                let (king, rook) = match c {
                    'K' => ("e1", "h1"),
                    'Q' => ("e1", "a1"),
                    'k' => ("e8", "h8"),
                    'q' => ("e8", "a8"),
                    _ => {
                        return Err(pgn_traits::Error::new_parse_error(format!(
                            "Couldn't parse FEN \"{}\", bad castling right '{}'",
                            fen, c
                        )))
                    }
                };
                castlings.insert(king.parse()?);
                castlings.insert(rook.parse()?);
            }
        }

        let en_passant = match words[3] {
            "-" => None,
            square => Some(square.parse::<Square>().map_err(|err| {
                pgn_traits::Error::new_caused_by(
                    pgn_traits::ErrorKind::ParseError,
                    format!("Couldn't parse FEN \"{}\", bad en passant square", fen),
                    err,
                )
            })?),
        };

        Ok(Position::new(
            board,
            Reserve::with_promotions(pawns.0, pawns.1),
            State::new(castlings, en_passant),
            side_to_move,
        ))
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn reserve(&self) -> &Reserve {
        &self.reserve
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Number of moves currently applied
    pub fn depth(&self) -> usize {
        self.memory.len()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Generates the pseudo-legal moves of the side to move into `moves`, if given.
    /// Returns false if the side to move could capture a royal piece,
    /// which makes the position illegal.
    pub fn is_legal(&self, moves: Option<&mut Vec<Move>>) -> bool {
        let mut sink = MoveSink::new(moves);
        for origin in self.board.origins() {
            if self.board.get(origin).map(Piece::colour) != Some(self.side_to_move) {
                continue;
            }
            let start = sink.len();
            if !self.generate_from(origin, &mut sink) {
                return false;
            }
            if !self.conditions.is_empty() {
                for mv in sink.moves_since(start) {
                    for condition in self.conditions.iter() {
                        condition.decorate(&self.board, &self.reserve, mv);
                    }
                }
            }
        }
        true
    }

    /// The number of the opponent's pieces that could capture a royal piece of the side to move,
    /// if the side to move passed.
    pub fn is_check(&mut self) -> usize {
        self.memory.push(self.state);
        self.state.reset_en_passant();
        self.side_to_move = !self.side_to_move;

        let mut sink = MoveSink::inactive();
        let checks = self
            .board
            .origins()
            .into_iter()
            .filter(|origin| {
                self.board.get(*origin).map(Piece::colour) == Some(self.side_to_move)
                    && !self.generate_from(*origin, &mut sink)
            })
            .count();

        self.side_to_move = !self.side_to_move;
        self.state = self.memory.pop();
        checks
    }

    /// Whether the side to move has no legal move.
    /// `moves` are the side's pseudo-legal moves, if they have been generated already.
    pub fn is_terminal(&mut self, moves: Option<&[Move]>) -> bool {
        let generated;
        let moves = match moves {
            Some(moves) => moves,
            None => {
                let mut pseudo_legal = vec![];
                self.is_legal(Some(&mut pseudo_legal));
                generated = pseudo_legal;
                &generated
            }
        };
        !moves.iter().any(|mv| self.play(mv, None).legal())
    }

    /// All legal moves of the side to move, in generation order.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let mut moves = vec![];
        self.is_legal(Some(&mut moves));
        moves.retain(|mv| self.play(mv, None).legal());
        moves
    }

    /// Applies a move, collecting the opponent's pseudo-legal replies into `replies`.
    /// Returns whether the move was legal. The move must be reverted with `revert`
    /// whether it was legal or not.
    pub fn apply(&mut self, mv: &Move, replies: Option<&mut Vec<Move>>) -> bool {
        let path_is_safe = !mv.is_castling() || self.castling_path_is_safe(mv);

        for effect in mv.effects() {
            self.apply_piece_effect(*effect);
        }
        self.memory.push(self.state);
        self.state.reset_en_passant();
        for effect in mv.effects() {
            match *effect {
                Effect::ClearCastling { square } => self.state.remove_castling(square),
                Effect::GrantCastling { square } => self.state.add_castling(square),
                Effect::SetEnPassant { square } => self.state.set_en_passant(square),
                _ => (),
            }
        }
        self.side_to_move = !self.side_to_move;

        self.is_legal(replies) && path_is_safe
    }

    pub fn revert(&mut self, mv: &Move) {
        self.state = self.memory.pop();
        self.side_to_move = !self.side_to_move;
        for effect in mv.effects().iter().rev() {
            self.revert_piece_effect(*effect);
        }
    }

    /// Applies a move, and reverts it when the returned guard is dropped.
    pub fn play<'a>(
        &'a mut self,
        mv: &'a Move,
        replies: Option<&mut Vec<Move>>,
    ) -> MoveGuard<'a, B, F> {
        let legal = self.apply(mv, replies);
        MoveGuard {
            position: self,
            mv,
            legal,
        }
    }

    /// The king may neither castle out of check, nor pass through an attacked square.
    fn castling_path_is_safe(&mut self, mv: &Move) -> bool {
        let (Some(origin), Some(passed)) = (mv.origin(), mv.stop()) else {
            return false;
        };
        let null = Move::null();
        if !self.play(&null, None).legal() {
            return false;
        }
        let transit = Move::quiet(origin, passed);
        let guard = self.play(&transit, None);
        guard.legal()
    }

    fn take(&mut self, square: Square) -> Piece {
        self.board
            .remove(square)
            .expect("Move effect on an empty square")
    }

    fn apply_piece_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Relocate { from, to } => {
                let piece = self.take(from);
                self.board.put(to, piece);
            }
            Effect::Lift { square } => {
                let piece = self.take(square);
                self.table.push(piece);
            }
            Effect::Drop { square } => {
                let piece = self.table.pop();
                self.board.put(square, piece);
            }
            Effect::Promote { square, section } => {
                let piece = self.reserve.pop(section);
                self.board.put(square, piece);
            }
            Effect::Recolour { square, colour } => {
                let piece = self.take(square);
                self.board.put(square, piece.recoloured(colour));
            }
            Effect::ClearCastling { .. }
            | Effect::GrantCastling { .. }
            | Effect::SetEnPassant { .. } => (),
        }
    }

    fn revert_piece_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Relocate { from, to } => {
                let piece = self.take(to);
                self.board.put(from, piece);
            }
            Effect::Lift { square } => {
                let piece = self.table.pop();
                self.board.put(square, piece);
            }
            Effect::Drop { square } => {
                let piece = self.take(square);
                self.table.push(piece);
            }
            Effect::Promote { square, section } => {
                let piece = self.take(square);
                self.reserve.push(section, piece);
            }
            Effect::Recolour { square, colour } => {
                let piece = self.take(square);
                self.board.put(square, piece.recoloured(!colour));
            }
            Effect::ClearCastling { .. }
            | Effect::GrantCastling { .. }
            | Effect::SetEnPassant { .. } => (),
        }
    }
}

/// A move applied to a position, reverted on drop.
pub struct MoveGuard<'a, B: Board, F: MoveFactory> {
    position: &'a mut Position<B, F>,
    mv: &'a Move,
    legal: bool,
}

impl<'a, B: Board, F: MoveFactory> MoveGuard<'a, B, F> {
    pub fn legal(&self) -> bool {
        self.legal
    }
}

impl<'a, B: Board, F: MoveFactory> Deref for MoveGuard<'a, B, F> {
    type Target = Position<B, F>;

    fn deref(&self) -> &Self::Target {
        self.position
    }
}

impl<'a, B: Board, F: MoveFactory> DerefMut for MoveGuard<'a, B, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.position
    }
}

impl<'a, B: Board, F: MoveFactory> Drop for MoveGuard<'a, B, F> {
    fn drop(&mut self) {
        self.position.revert(self.mv);
    }
}

/// Compatibility with generic game tooling. Legality checks need to apply moves,
/// so `generate_moves` and `game_result` work on a scratch copy.
impl<B: Board, F: MoveFactory> PositionTrait for Position<B, F> {
    type Move = Move;
    type ReverseMove = Move;
    type Settings = ();

    fn start_position_with_settings(_settings: &()) -> Self {
        Self::default()
    }

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    fn generate_moves<E: Extend<Self::Move>>(&self, moves: &mut E) {
        let mut scratch = self.clone();
        moves.extend(scratch.legal_moves());
    }

    fn do_move(&mut self, mv: Self::Move) -> Self::ReverseMove {
        self.apply(&mv, None);
        mv
    }

    fn reverse_move(&mut self, mv: Self::ReverseMove) {
        self.revert(&mv);
    }

    fn game_result(&self) -> Option<GameResult> {
        let mut scratch = self.clone();
        if !scratch.is_terminal(None) {
            return None;
        }
        if scratch.is_check() == 0 {
            return Some(GameResult::Draw);
        }
        match self.side_to_move {
            Color::White => Some(GameResult::BlackWin),
            Color::Black => Some(GameResult::WhiteWin),
        }
    }
}

/// Diagram of the board, with white pieces in upper case.
impl<B: Board, F: MoveFactory> fmt::Display for Position<B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +{}+", "-".repeat(24))?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                match self.board.get(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        let symbol = Language::English.piece_symbol(piece.kind());
                        let symbol = match piece.colour() {
                            Color::White => symbol.to_string(),
                            Color::Black => symbol.to_lowercase(),
                        };
                        write!(f, " {:<2}", symbol)?;
                    }
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +{}+", "-".repeat(24))?;
        write!(f, "    a  b  c  d  e  f  g  h")
    }
}

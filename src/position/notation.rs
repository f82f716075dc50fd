//! Human-readable move text in the languages of the problem description formats.

use std::fmt;
use std::str::FromStr;

use board_game_traits::Color;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::board::Board;
use crate::position::factory::MoveFactory;
use crate::position::mv::{Effect, Move, MoveKind, Rebirth};
use crate::position::piece::PieceKind;
use crate::position::Position;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Language {
    #[default]
    English,
    French,
    German,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::French, Language::German];

    /// Piece letter(s) as used in move text. Pawns have none.
    pub fn piece_code(self, kind: PieceKind) -> &'static str {
        match kind {
            PieceKind::Pawn => "",
            kind => self.piece_symbol(kind),
        }
    }

    /// Piece letter(s) as used in piece lists and diagrams.
    pub fn piece_symbol(self, kind: PieceKind) -> &'static str {
        use PieceKind::*;
        match (self, kind) {
            (Language::English, King) => "K",
            (Language::English, Queen) => "Q",
            (Language::English, Rook) => "R",
            (Language::English, Bishop) => "B",
            (Language::English, Knight) => "N",
            (Language::English, Pawn) => "P",
            (Language::English, Grasshopper) => "G",
            (Language::English, Nightrider) => "NR",
            (Language::French, King) => "R",
            (Language::French, Queen) => "D",
            (Language::French, Rook) => "T",
            (Language::French, Bishop) => "F",
            (Language::French, Knight) => "C",
            (Language::French, Pawn) => "P",
            (Language::French, Grasshopper) => "S",
            (Language::French, Nightrider) => "N",
            (Language::German, King) => "K",
            (Language::German, Queen) => "D",
            (Language::German, Rook) => "T",
            (Language::German, Bishop) => "L",
            (Language::German, Knight) => "S",
            (Language::German, Pawn) => "B",
            (Language::German, Grasshopper) => "G",
            (Language::German, Nightrider) => "N",
            (_, Amazon) => "AM",
        }
    }

    pub fn colour_code(self, colour: Color) -> &'static str {
        match (self, colour) {
            (Language::English, Color::White) => "w",
            (Language::English, Color::Black) => "b",
            (Language::French, Color::White) => "b",
            (Language::French, Color::Black) => "n",
            (Language::German, Color::White) => "w",
            (Language::German, Color::Black) => "s",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Language {
    type Err = pgn_traits::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.short_name().eq_ignore_ascii_case(input))
            .ok_or_else(|| {
                pgn_traits::Error::new_parse_error(format!(
                    "Unknown language \"{}\", expected one of en, fr, de",
                    input
                ))
            })
    }
}

impl<B: Board, F: MoveFactory> Position<B, F> {
    /// Text of a move, written before it is applied.
    pub fn pre_write(&self, mv: &Move, language: Language) -> String {
        let mut output = String::new();
        let (Some(origin), Some(target)) = (mv.origin(), mv.target()) else {
            return output;
        };
        match mv.kind() {
            MoveKind::ShortCastling => return "0-0".to_string(),
            MoveKind::LongCastling => return "0-0-0".to_string(),
            _ => (),
        }
        let mover = self.board.get(origin);
        let promoted = mv.section().and_then(|section| self.reserve.peek(section));

        if let Some(mover) = mover {
            output.push_str(language.piece_code(mover.kind()));
        }
        output.push_str(&origin.to_string());
        output.push(if mv.is_capture() { 'x' } else { '-' });
        output.push_str(&target.to_string());
        if mv.kind() == MoveKind::EnPassant {
            output.push_str(" e.p.");
        }
        if let Some(promoted) = promoted {
            output.push('=');
            output.push_str(language.piece_code(promoted.kind()));
        }

        let reborn = match mv.rebirth() {
            Some(Rebirth::Captured(square)) => {
                let victim_square = mv.stop().filter(|_| mv.kind() == MoveKind::EnPassant);
                self.board
                    .get(victim_square.unwrap_or(target))
                    .map(|victim| (victim, square))
            }
            Some(Rebirth::Capturing(square)) => promoted.or(mover).map(|piece| (piece, square)),
            None => None,
        };
        if let Some((piece, square)) = reborn {
            output.push('(');
            output.push_str(language.piece_code(piece.kind()));
            output.push_str(&square.to_string());
            output.push(')');
        }

        for effect in mv.effects() {
            if let Effect::Recolour { colour, .. } = effect {
                output.push('(');
                output.push_str(language.colour_code(*colour));
                output.push(')');
            }
        }
        output
    }

    /// Check and mate markers, written after a move is applied.
    /// `replies` are the pseudo-legal replies generated when the move was applied.
    pub fn post_write(&mut self, replies: &[Move]) -> String {
        let checks = self.is_check();
        if self.is_terminal(Some(replies)) {
            if checks > 0 {
                let mut output = if checks > 1 {
                    "+".repeat(checks)
                } else {
                    String::new()
                };
                output.push('#');
                output
            } else {
                "=".to_string()
            }
        } else {
            "+".repeat(checks)
        }
    }
}

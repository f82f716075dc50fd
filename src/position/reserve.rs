use board_game_traits::Color;

use crate::position::piece::{Piece, PieceKind};

/// A promotion slot: pieces of one colour, offered in ascending `order`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    pub colour: Color,
    pub order: u8,
}

impl Section {
    pub const fn new(colour: Color, order: u8) -> Self {
        Section { colour, order }
    }
}

/// Off-board spare pieces for promotion ("the box").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reserve {
    sections: Vec<(Section, Vec<Piece>)>,
}

impl Reserve {
    /// `count` queens, rooks, bishops and knights for each colour, in that order.
    pub fn with_promotions(white: usize, black: usize) -> Self {
        let mut reserve = Reserve::default();
        for (colour, count) in [(Color::White, white), (Color::Black, black)] {
            for (i, kind) in PieceKind::PROMOTIONS.into_iter().enumerate() {
                let section = Section::new(colour, i as u8 + 1);
                for _ in 0..count {
                    reserve.push(section, Piece::new(kind, colour));
                }
            }
        }
        reserve
    }

    pub fn push(&mut self, section: Section, piece: Piece) {
        match self.sections.iter_mut().find(|(s, _)| *s == section) {
            Some((_, pieces)) => pieces.push(piece),
            None => {
                self.sections.push((section, vec![piece]));
                self.sections.sort_by_key(|(s, _)| (s.colour == Color::Black, s.order));
            }
        }
    }

    /// Panics if the section is empty.
    /// Only generated moves pop, and they only use non-empty sections.
    pub fn pop(&mut self, section: Section) -> Piece {
        self.sections
            .iter_mut()
            .find(|(s, _)| *s == section)
            .and_then(|(_, pieces)| pieces.pop())
            .expect("Promotion from an empty reserve section")
    }

    pub fn peek(&self, section: Section) -> Option<Piece> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .and_then(|(_, pieces)| pieces.last().copied())
    }

    /// Sections of the given colour that still hold a piece
    pub fn sections(&self, colour: Color) -> impl Iterator<Item = Section> + '_ {
        self.sections
            .iter()
            .filter(move |(section, pieces)| section.colour == colour && !pieces.is_empty())
            .map(|(section, _)| *section)
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|(_, pieces)| pieces.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stack of pieces taken off the board while a move is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pieces: Vec<Piece>,
}

impl Table {
    pub fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    pub fn pop(&mut self) -> Piece {
        self.pieces
            .pop()
            .expect("Tried to take a piece from an empty capture table")
    }

    pub fn peek(&self) -> Option<Piece> {
        self.pieces.last().copied()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

use crate::position::square::{Square, SquareSet};

/// Castling rights and the en passant square.
/// Copied into `Memory` on every move, so each ply owns its snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct State {
    castlings: SquareSet,
    en_passant: Option<Square>,
}

impl State {
    pub fn new(castlings: SquareSet, en_passant: Option<Square>) -> Self {
        State {
            castlings,
            en_passant,
        }
    }

    pub fn castlings(&self) -> SquareSet {
        self.castlings
    }

    pub fn has_castling(&self, square: Square) -> bool {
        self.castlings.contains(square)
    }

    pub fn add_castling(&mut self, square: Square) {
        self.castlings.insert(square);
    }

    pub fn remove_castling(&mut self, square: Square) {
        self.castlings.remove(square);
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn set_en_passant(&mut self, square: Square) {
        self.en_passant = Some(square);
    }

    pub fn reset_en_passant(&mut self) {
        self.en_passant = None;
    }
}

/// History of `State` snapshots, one per applied move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    states: Vec<State>,
}

impl Memory {
    pub fn push(&mut self, state: State) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> State {
        self.states
            .pop()
            .expect("Reverted a move that was never applied")
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

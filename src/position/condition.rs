use std::fmt;

use crate::position::board::Board;
use crate::position::mv::{Effect, Move, MoveKind};
use crate::position::piece::PieceKind;
use crate::position::reserve::Reserve;

/// Fairy conditions that post-process generated moves, independently of the `MoveFactory`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// A capturing piece, except the king, changes colour
    Andernach,
    /// A non-capturing piece, except the king, changes colour
    AntiAndernach,
}

impl Condition {
    pub fn applies_to(self, mv: &Move) -> bool {
        match self {
            Condition::Andernach => mv.is_capture(),
            Condition::AntiAndernach => matches!(
                mv.kind(),
                MoveKind::Quiet | MoveKind::DoubleStep | MoveKind::Promotion
            ),
        }
    }

    /// Adds the condition's effects to a freshly generated move.
    /// `board` and `reserve` must be those of the position the move was generated in.
    pub fn decorate<B: Board>(self, board: &B, reserve: &Reserve, mv: &mut Move) {
        if !self.applies_to(mv) {
            return;
        }
        let (Some(origin), Some(landing)) = (mv.origin(), mv.landing()) else {
            return;
        };
        let Some(mover) = board.get(origin) else {
            return;
        };
        if mover.is_royal() {
            return;
        }
        let arriving = match mv.section() {
            Some(section) => match reserve.peek(section) {
                Some(promoted) => promoted,
                None => return,
            },
            None => mover,
        };
        let colour = !arriving.colour();
        mv.push_effect(Effect::Recolour {
            square: landing,
            colour,
        });
        if arriving.kind() == PieceKind::Rook && PieceKind::Rook.is_home_square(colour, landing) {
            mv.push_effect(Effect::GrantCastling { square: landing });
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Andernach => write!(f, "Andernach"),
            Condition::AntiAndernach => write!(f, "AntiAndernach"),
        }
    }
}

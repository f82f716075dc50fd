//! Piece placement. Two implementations share the `Board` trait: a fast mailbox board that steps
//! through a padded 10x12 index table, and a general board keyed by square.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use arrayvec::ArrayVec;

use crate::position::piece::{Basis, Piece};
use crate::position::square::{Direction, Square};

pub trait Board: Clone + fmt::Debug + PartialEq + Default {
    /// A board-specific encoding of a `Direction`
    type Step: Copy + fmt::Debug + 'static;

    fn get(&self, square: Square) -> Option<Piece>;

    fn put(&mut self, square: Square, piece: Piece);

    fn remove(&mut self, square: Square) -> Option<Piece>;

    /// Occupied squares, in ascending order
    fn origins(&self) -> ArrayVec<Square, 64>;

    /// The square `distance` steps away from `origin`, or `None` if it is off the board.
    fn target(&self, origin: Square, step: Self::Step, distance: i8) -> Option<Square>;

    fn step(direction: Direction) -> Self::Step;

    /// The direction set of a basis, computed once per board implementation.
    fn steps(basis: Basis) -> &'static [Self::Step];

    fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }
}

const MAILBOX_WIDTH: i16 = 10;

const fn mailbox_index(square: Square) -> usize {
    21 + square.file() as usize + square.rank() as usize * MAILBOX_WIDTH as usize
}

/// Maps a padded mailbox index back to its square. Border cells are `None`.
static MAILBOX: [Option<Square>; 120] = {
    let mut table = [None; 120];
    let mut i = 0;
    while i < 64 {
        let square = Square::from_u8(i);
        table[mailbox_index(square)] = Some(square);
        i += 1;
    }
    table
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MailboxStep {
    offset: i16,
}

impl From<Direction> for MailboxStep {
    fn from(direction: Direction) -> Self {
        MailboxStep {
            offset: direction.file as i16 + direction.rank as i16 * MAILBOX_WIDTH,
        }
    }
}

static MAILBOX_STEPS: [OnceLock<Vec<MailboxStep>>; 4] =
    [OnceLock::new(), OnceLock::new(), OnceLock::new(), OnceLock::new()];

/// Board for the orthodox piece set. A single orthodox step from a real square
/// always lands inside the padded table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailboxBoard {
    cells: [Option<Piece>; 64],
}

impl Default for MailboxBoard {
    fn default() -> Self {
        MailboxBoard { cells: [None; 64] }
    }
}

impl Board for MailboxBoard {
    type Step = MailboxStep;

    fn get(&self, square: Square) -> Option<Piece> {
        self.cells[square.into_inner() as usize]
    }

    fn put(&mut self, square: Square, piece: Piece) {
        self.cells[square.into_inner() as usize] = Some(piece);
    }

    fn remove(&mut self, square: Square) -> Option<Piece> {
        self.cells[square.into_inner() as usize].take()
    }

    fn origins(&self) -> ArrayVec<Square, 64> {
        Square::all()
            .filter(|square| self.cells[square.into_inner() as usize].is_some())
            .collect()
    }

    fn target(&self, origin: Square, step: MailboxStep, distance: i8) -> Option<Square> {
        let index = mailbox_index(origin) as i16 + step.offset * distance as i16;
        usize::try_from(index)
            .ok()
            .and_then(|index| MAILBOX.get(index))
            .copied()
            .flatten()
    }

    fn step(direction: Direction) -> MailboxStep {
        MailboxStep::from(direction)
    }

    fn steps(basis: Basis) -> &'static [MailboxStep] {
        MAILBOX_STEPS[basis.index()].get_or_init(|| {
            Direction::permutations(basis.bases())
                .into_iter()
                .map(MailboxStep::from)
                .collect()
        })
    }
}

static GRID_STEPS: [OnceLock<Vec<Direction>>; 4] =
    [OnceLock::new(), OnceLock::new(), OnceLock::new(), OnceLock::new()];

/// General board, addressed by coordinate pairs. Used whenever fairy pieces are on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridBoard {
    pieces: BTreeMap<Square, Piece>,
}

impl Board for GridBoard {
    type Step = Direction;

    fn get(&self, square: Square) -> Option<Piece> {
        self.pieces.get(&square).copied()
    }

    fn put(&mut self, square: Square, piece: Piece) {
        self.pieces.insert(square, piece);
    }

    fn remove(&mut self, square: Square) -> Option<Piece> {
        self.pieces.remove(&square)
    }

    fn origins(&self) -> ArrayVec<Square, 64> {
        self.pieces.keys().copied().collect()
    }

    fn target(&self, origin: Square, step: Direction, distance: i8) -> Option<Square> {
        origin.offset(step, distance)
    }

    fn step(direction: Direction) -> Direction {
        direction
    }

    fn steps(basis: Basis) -> &'static [Direction] {
        GRID_STEPS[basis.index()].get_or_init(|| Direction::permutations(basis.bases()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets<B: Board>(board: &B, origin: &str, basis: Basis) -> Vec<Square> {
        let origin: Square = origin.parse().unwrap();
        let mut targets: Vec<Square> = B::steps(basis)
            .iter()
            .filter_map(|step| board.target(origin, *step, 1))
            .collect();
        targets.sort();
        targets
    }

    #[test]
    fn mailbox_matches_grid_test() {
        for square in Square::all() {
            let name = square.to_string();
            for basis in Basis::ALL {
                assert_eq!(
                    targets(&MailboxBoard::default(), &name, basis),
                    targets(&GridBoard::default(), &name, basis),
                    "{:?} from {}",
                    basis,
                    name
                );
            }
        }
    }

    #[test]
    fn corner_knight_test() {
        assert_eq!(targets(&MailboxBoard::default(), "a1", Basis::Knight).len(), 2);
        assert_eq!(targets(&MailboxBoard::default(), "h8", Basis::Queen).len(), 3);
    }

    #[test]
    fn long_ride_stays_on_board_test() {
        let board = MailboxBoard::default();
        let step = MailboxBoard::step(Direction::new(0, 1));
        let a1: Square = "a1".parse().unwrap();
        assert_eq!(board.target(a1, step, 7), Some("a8".parse().unwrap()));
        assert_eq!(board.target(a1, step, 8), None);
    }
}

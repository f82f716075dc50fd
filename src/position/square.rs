use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cell of the 8x8 board. Squares are ordered file by file, so `a1 < a2 < ... < a8 < b1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square {
    inner: u8,
}

impl Square {
    pub const fn from_u8(inner: u8) -> Self {
        assert!(inner < 64);
        Square { inner }
    }

    /// Zero-based file (a = 0) and rank (1 = 0).
    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8);
        Square {
            inner: file * 8 + rank,
        }
    }

    pub const fn into_inner(self) -> u8 {
        self.inner
    }

    pub const fn file(self) -> u8 {
        self.inner / 8
    }

    pub const fn rank(self) -> u8 {
        self.inner % 8
    }

    /// `a1` is dark
    pub const fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }

    /// Coordinate step with bounds checking.
    pub fn offset(self, direction: Direction, distance: i8) -> Option<Self> {
        let file = self.file() as i8 + direction.file * distance;
        let rank = self.rank() as i8 + direction.rank * distance;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_file_rank(file as u8, rank as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

impl FromStr for Square {
    type Err = pgn_traits::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let bytes = input.as_bytes();
        if bytes.len() != 2 {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse square \"{}\"",
                input
            )));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Couldn't parse square \"{}\"",
                input
            )));
        }
        Ok(Square::from_file_rank(file - b'a', rank - b'1'))
    }
}

/// A (file, rank) step between squares. Ordered by file offset, then rank offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Direction {
    pub file: i8,
    pub rank: i8,
}

impl Direction {
    pub const fn new(file: i8, rank: i8) -> Self {
        Direction { file, rank }
    }

    /// Every sign and axis permutation of the bases, deduplicated and sorted.
    pub fn permutations(bases: &[Direction]) -> Vec<Direction> {
        let mut directions = Vec::with_capacity(bases.len() * 8);
        for base in bases {
            for file in [-base.file, base.file] {
                for rank in [-base.rank, base.rank] {
                    directions.push(Direction::new(file, rank));
                    directions.push(Direction::new(rank, file));
                }
            }
        }
        directions.sort();
        directions.dedup();
        directions
    }
}

/// A set of squares, stored as a 64-bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const fn empty() -> Self {
        SquareSet(0)
    }

    pub fn contains(self, square: Square) -> bool {
        self.0 & (1 << square.into_inner()) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1 << square.into_inner();
    }

    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1 << square.into_inner());
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Square> {
        Square::all().filter(move |square| self.contains(*square))
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::empty();
        for square in iter {
            set.insert(square);
        }
        set
    }
}

use board_game_traits::Color;

use crate::position::square::{Direction, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
    Grasshopper,
    Nightrider,
    Amazon,
}

const ORTHOGONAL_BASES: [Direction; 1] = [Direction::new(0, 1)];
const DIAGONAL_BASES: [Direction; 1] = [Direction::new(1, 1)];
const QUEEN_BASES: [Direction; 2] = [Direction::new(0, 1), Direction::new(1, 1)];
const KNIGHT_BASES: [Direction; 1] = [Direction::new(1, 2)];

/// Small sets of base steps.
/// A piece's full direction set is every sign and axis permutation of its basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Basis {
    Orthogonal,
    Diagonal,
    Queen,
    Knight,
}

impl Basis {
    pub const ALL: [Basis; 4] = [
        Basis::Orthogonal,
        Basis::Diagonal,
        Basis::Queen,
        Basis::Knight,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn bases(self) -> &'static [Direction] {
        match self {
            Basis::Orthogonal => &ORTHOGONAL_BASES,
            Basis::Diagonal => &DIAGONAL_BASES,
            Basis::Queen => &QUEEN_BASES,
            Basis::Knight => &KNIGHT_BASES,
        }
    }
}

/// Movement category of a non-pawn piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gait {
    /// Single step in every direction of the basis
    Leap(Basis),
    /// Slides until blocked
    Ride(Basis),
    /// Jumps over the first occupied square, landing directly behind it
    Hop(Basis),
}

impl PieceKind {
    pub const ALL: [PieceKind; 9] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
        PieceKind::Grasshopper,
        PieceKind::Nightrider,
        PieceKind::Amazon,
    ];

    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn gaits(self) -> &'static [Gait] {
        use Basis::*;
        use Gait::*;
        match self {
            PieceKind::King => &[Leap(Queen)],
            PieceKind::Queen => &[Ride(Queen)],
            PieceKind::Rook => &[Ride(Orthogonal)],
            PieceKind::Bishop => &[Ride(Diagonal)],
            PieceKind::Knight => &[Leap(Knight)],
            PieceKind::Pawn => &[],
            PieceKind::Grasshopper => &[Hop(Queen)],
            PieceKind::Nightrider => &[Ride(Knight)],
            PieceKind::Amazon => &[Ride(Queen), Leap(Knight)],
        }
    }

    pub fn is_royal(self) -> bool {
        self == PieceKind::King
    }

    pub fn is_castling(self) -> bool {
        matches!(self, PieceKind::King | PieceKind::Rook)
    }

    pub fn is_fairy(self) -> bool {
        matches!(
            self,
            PieceKind::Grasshopper | PieceKind::Nightrider | PieceKind::Amazon
        )
    }

    /// Whether `square` is a starting square of this piece type for the given colour.
    pub fn is_home_square(self, colour: Color, square: Square) -> bool {
        let files: &[u8] = match self {
            PieceKind::King => &[4],
            PieceKind::Queen => &[3],
            PieceKind::Rook => &[0, 7],
            PieceKind::Bishop => &[2, 5],
            PieceKind::Knight => &[1, 6],
            PieceKind::Pawn => return square.rank() == pawn_rank(colour),
            _ => return square.rank() == back_rank(!colour),
        };
        square.rank() == back_rank(colour) && files.contains(&square.file())
    }

    /// The square a piece of this type and colour is reborn on after a capture on `capture`.
    /// Rooks, bishops and knights pick the home square with the same square colour as `capture`.
    pub fn rebirth_square(self, colour: Color, capture: Square) -> Square {
        let rank = back_rank(colour);
        let pair = |queen_side: u8, king_side: u8| {
            let queen_side_square = Square::from_file_rank(queen_side, rank);
            let file = if queen_side_square.is_light() == capture.is_light() {
                queen_side
            } else {
                king_side
            };
            Square::from_file_rank(file, rank)
        };
        match self {
            PieceKind::King => Square::from_file_rank(4, rank),
            PieceKind::Queen => Square::from_file_rank(3, rank),
            PieceKind::Rook => pair(0, 7),
            PieceKind::Bishop => pair(2, 5),
            PieceKind::Knight => pair(1, 6),
            PieceKind::Pawn => Square::from_file_rank(capture.file(), pawn_rank(colour)),
            PieceKind::Grasshopper | PieceKind::Nightrider | PieceKind::Amazon => {
                Square::from_file_rank(capture.file(), back_rank(!colour))
            }
        }
    }
}

pub const fn back_rank(colour: Color) -> u8 {
    match colour {
        Color::White => 0,
        Color::Black => 7,
    }
}

pub const fn pawn_rank(colour: Color) -> u8 {
    match colour {
        Color::White => 1,
        Color::Black => 6,
    }
}

/// Rank offset of a pawn step
pub const fn forward(colour: Color) -> i8 {
    match colour {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// The six king and rook starting squares, where castling rights can live.
pub fn is_castling_square(square: Square) -> bool {
    [Color::White, Color::Black].into_iter().any(|colour| {
        PieceKind::King.is_home_square(colour, square)
            || PieceKind::Rook.is_home_square(colour, square)
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    colour: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, colour: Color) -> Self {
        Piece { kind, colour }
    }

    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    pub const fn colour(self) -> Color {
        self.colour
    }

    pub fn recoloured(self, colour: Color) -> Self {
        Piece { colour, ..self }
    }

    pub fn is_royal(self) -> bool {
        self.kind.is_royal()
    }

    pub fn is_castling(self) -> bool {
        self.kind.is_castling()
    }

    pub fn rebirth_square(self, capture: Square) -> Square {
        self.kind.rebirth_square(self.colour, capture)
    }

    /// Forsyth letter, upper case for white. Fairy pieces have none.
    pub fn to_fen_char(self) -> Option<char> {
        let c = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
            _ => return None,
        };
        Some(match self.colour {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        })
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        let colour = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, colour))
    }
}

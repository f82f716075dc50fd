//! Pseudo-legal move generation, one piece at a time.

use board_game_traits::Color;

use crate::position::board::Board;
use crate::position::factory::MoveFactory;
use crate::position::mv::{Move, MoveSink};
use crate::position::piece::{back_rank, forward, pawn_rank, Basis, Gait, Piece, PieceKind};
use crate::position::square::{Direction, Square};
use crate::position::Position;

impl<B: Board, F: MoveFactory> Position<B, F> {
    /// Generates the moves of the piece on `origin` into `sink`.
    /// Returns false as soon as the piece could capture a royal piece.
    pub(crate) fn generate_from(&self, origin: Square, sink: &mut MoveSink) -> bool {
        let Some(piece) = self.board.get(origin) else {
            return true;
        };
        if piece.kind() == PieceKind::Pawn {
            return self.generate_pawn(origin, piece.colour(), sink);
        }
        for gait in piece.kind().gaits() {
            let legal = match *gait {
                Gait::Leap(basis) => self.generate_leaps(origin, piece.colour(), basis, sink),
                Gait::Ride(basis) => self.generate_rides(origin, piece.colour(), basis, sink),
                Gait::Hop(basis) => self.generate_hops(origin, piece.colour(), basis, sink),
            };
            if !legal {
                return false;
            }
        }
        if piece.kind() == PieceKind::King && sink.is_active() {
            self.generate_castlings(origin, piece.colour(), sink);
        }
        true
    }

    /// Handles a single landing square. Returns `None` to continue a ride past it,
    /// `Some(legal)` when the line ends there.
    fn land(
        &self,
        origin: Square,
        target: Square,
        colour: Color,
        sink: &mut MoveSink,
    ) -> Option<bool> {
        match self.board.get(target) {
            None => {
                sink.push_with(|| Move::quiet(origin, target));
                None
            }
            Some(occupant) if occupant.colour() != colour => {
                Some(self.factory.capture(&self.board, origin, target, sink))
            }
            Some(_) => Some(true),
        }
    }

    fn generate_leaps(
        &self,
        origin: Square,
        colour: Color,
        basis: Basis,
        sink: &mut MoveSink,
    ) -> bool {
        for step in B::steps(basis) {
            if let Some(target) = self.board.target(origin, *step, 1) {
                if self.land(origin, target, colour, sink) == Some(false) {
                    return false;
                }
            }
        }
        true
    }

    fn generate_rides(
        &self,
        origin: Square,
        colour: Color,
        basis: Basis,
        sink: &mut MoveSink,
    ) -> bool {
        for step in B::steps(basis) {
            let mut distance = 1;
            while let Some(target) = self.board.target(origin, *step, distance) {
                match self.land(origin, target, colour, sink) {
                    None => distance += 1,
                    Some(true) => break,
                    Some(false) => return false,
                }
            }
        }
        true
    }

    fn generate_hops(
        &self,
        origin: Square,
        colour: Color,
        basis: Basis,
        sink: &mut MoveSink,
    ) -> bool {
        for step in B::steps(basis) {
            let mut distance = 1;
            while let Some(hurdle) = self.board.target(origin, *step, distance) {
                if self.board.is_empty(hurdle) {
                    distance += 1;
                    continue;
                }
                if let Some(target) = self.board.target(origin, *step, distance + 1) {
                    if self.land(origin, target, colour, sink) == Some(false) {
                        return false;
                    }
                }
                break;
            }
        }
        true
    }

    fn generate_pawn(&self, origin: Square, colour: Color, sink: &mut MoveSink) -> bool {
        let ahead = forward(colour);
        let far_rank = back_rank(!colour);

        for file in [-1, 1] {
            let Some(target) = origin.offset(Direction::new(file, ahead), 1) else {
                continue;
            };
            match self.board.get(target) {
                Some(victim) if victim.colour() != colour => {
                    let legal = if target.rank() == far_rank {
                        self.generate_promotion_captures(origin, target, colour, victim, sink)
                    } else {
                        self.factory.capture(&self.board, origin, target, sink)
                    };
                    if !legal {
                        return false;
                    }
                }
                None if self.state.en_passant() == Some(target) => {
                    let Some(stop) = target.offset(Direction::new(0, -ahead), 1) else {
                        continue;
                    };
                    let passed = self.board.get(stop);
                    if passed.is_some_and(|piece| piece.colour() != colour)
                        && !self
                            .factory
                            .en_passant(&self.board, origin, target, stop, sink)
                    {
                        return false;
                    }
                }
                _ => (),
            }
        }

        if !sink.is_active() {
            return true;
        }
        let Some(target) = origin.offset(Direction::new(0, ahead), 1) else {
            return true;
        };
        if !self.board.is_empty(target) {
            return true;
        }
        if target.rank() == far_rank {
            for section in self.reserve.sections(colour) {
                sink.push_with(|| Move::promotion(origin, target, section));
            }
        } else {
            sink.push_with(|| Move::quiet(origin, target));
            if origin.rank() == pawn_rank(colour) {
                if let Some(double) = origin.offset(Direction::new(0, ahead), 2) {
                    if self.board.is_empty(double) {
                        sink.push_with(|| Move::double_step(origin, double, target));
                    }
                }
            }
        }
        true
    }

    fn generate_promotion_captures(
        &self,
        origin: Square,
        target: Square,
        colour: Color,
        victim: Piece,
        sink: &mut MoveSink,
    ) -> bool {
        // Checks by a pawn must be seen even when the reserve has run dry
        if victim.is_royal() {
            return false;
        }
        for section in self.reserve.sections(colour) {
            if !self
                .factory
                .promotion_capture(&self.board, &self.reserve, origin, target, section, sink)
            {
                return false;
            }
        }
        true
    }

    /// Castling toward each side. Safety of the king's path is checked when the move is applied.
    fn generate_castlings(&self, origin: Square, colour: Color, sink: &mut MoveSink) {
        if !PieceKind::King.is_home_square(colour, origin) || !self.state.has_castling(origin) {
            return;
        }
        for file in [-1, 1] {
            let direction = Direction::new(file, 0);
            let mut distance = 1;
            let partner = loop {
                match origin.offset(direction, distance) {
                    Some(square) if self.board.is_empty(square) => distance += 1,
                    other => break other,
                }
            };
            let Some(partner) = partner else {
                continue;
            };
            if self.board.get(partner) != Some(Piece::new(PieceKind::Rook, colour))
                || !PieceKind::Rook.is_home_square(colour, partner)
                || !self.state.has_castling(partner)
            {
                continue;
            }
            if let (Some(target), Some(target2)) =
                (origin.offset(direction, 2), origin.offset(direction, 1))
            {
                sink.push_with(|| Move::castling(origin, target, partner, target2));
            }
        }
    }
}

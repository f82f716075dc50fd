//! Capture construction strategies. Every capture a piece generator finds goes through a
//! `MoveFactory`, which is where the Circe family of conditions changes the rules.

use std::fmt;

use crate::position::board::Board;
use crate::position::mv::{Move, MoveSink};
use crate::position::reserve::{Reserve, Section};
use crate::position::square::Square;

/// Builds capturing moves. Each method returns `false` if the capture would take a royal piece,
/// which means the position being generated from is illegal.
pub trait MoveFactory: Clone + fmt::Debug + Default + PartialEq {
    /// Name of the condition, empty for orthodox rules
    const NAME: &'static str;

    fn capture<B: Board>(&self, board: &B, origin: Square, target: Square, sink: &mut MoveSink)
        -> bool;

    /// Pawn capture onto the empty `target`, taking the pawn on `stop`.
    fn en_passant<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        stop: Square,
        sink: &mut MoveSink,
    ) -> bool;

    fn promotion_capture<B: Board>(
        &self,
        board: &B,
        reserve: &Reserve,
        origin: Square,
        target: Square,
        section: Section,
        sink: &mut MoveSink,
    ) -> bool;
}

fn captures_royal<B: Board>(board: &B, square: Square) -> bool {
    board.get(square).is_some_and(|piece| piece.is_royal())
}

/// A rebirth can only happen on an empty square, or on the square the mover just left.
fn rebirth_is_free<B: Board>(board: &B, origin: Square, rebirth: Square) -> bool {
    rebirth == origin || board.is_empty(rebirth)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Orthodox;

impl MoveFactory for Orthodox {
    const NAME: &'static str = "";

    fn capture<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, target) {
            return false;
        }
        sink.push_with(|| Move::capture(origin, target));
        true
    }

    fn en_passant<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        stop: Square,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, stop) {
            return false;
        }
        sink.push_with(|| Move::en_passant(origin, target, stop));
        true
    }

    fn promotion_capture<B: Board>(
        &self,
        board: &B,
        _reserve: &Reserve,
        origin: Square,
        target: Square,
        section: Section,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, target) {
            return false;
        }
        sink.push_with(|| Move::promotion_capture(origin, target, section));
        true
    }
}

/// The captured piece is reborn on its home square, if that square is free.
/// Otherwise the capture is played as in orthodox chess.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Circe;

impl Circe {
    fn reborn<B: Board>(board: &B, origin: Square, victim_square: Square, mv: Move) -> Move {
        match board.get(victim_square) {
            Some(victim) => {
                let rebirth = victim.rebirth_square(victim_square);
                if rebirth_is_free(board, origin, rebirth) {
                    mv.with_captured_rebirth(rebirth, victim.is_castling())
                } else {
                    mv
                }
            }
            None => mv,
        }
    }
}

impl MoveFactory for Circe {
    const NAME: &'static str = "Circe";

    fn capture<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, target) {
            return false;
        }
        sink.push_with(|| Circe::reborn(board, origin, target, Move::capture(origin, target)));
        true
    }

    fn en_passant<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        stop: Square,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, stop) {
            return false;
        }
        sink.push_with(|| {
            Circe::reborn(board, origin, stop, Move::en_passant(origin, target, stop))
        });
        true
    }

    fn promotion_capture<B: Board>(
        &self,
        board: &B,
        _reserve: &Reserve,
        origin: Square,
        target: Square,
        section: Section,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, target) {
            return false;
        }
        sink.push_with(|| {
            Circe::reborn(
                board,
                origin,
                target,
                Move::promotion_capture(origin, target, section),
            )
        });
        true
    }
}

/// The capturing piece is reborn on its own home square. A capture whose rebirth square is
/// occupied is not a legal move at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AntiCirce;

impl MoveFactory for AntiCirce {
    const NAME: &'static str = "AntiCirce";

    fn capture<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, target) {
            return false;
        }
        if sink.is_active() {
            if let Some(mover) = board.get(origin) {
                let rebirth = mover.rebirth_square(target);
                if rebirth_is_free(board, origin, rebirth) {
                    sink.push_with(|| {
                        Move::capture(origin, target)
                            .with_capturing_rebirth(rebirth, mover.is_castling())
                    });
                }
            }
        }
        true
    }

    fn en_passant<B: Board>(
        &self,
        board: &B,
        origin: Square,
        target: Square,
        stop: Square,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, stop) {
            return false;
        }
        if sink.is_active() {
            if let Some(mover) = board.get(origin) {
                let rebirth = mover.rebirth_square(target);
                // The passed pawn leaves `stop` before the rebirth
                let free = rebirth_is_free(board, origin, rebirth) || rebirth == stop;
                if free && rebirth != target {
                    sink.push_with(|| {
                        Move::en_passant(origin, target, stop)
                            .with_capturing_rebirth(rebirth, false)
                    });
                }
            }
        }
        true
    }

    fn promotion_capture<B: Board>(
        &self,
        board: &B,
        reserve: &Reserve,
        origin: Square,
        target: Square,
        section: Section,
        sink: &mut MoveSink,
    ) -> bool {
        if captures_royal(board, target) {
            return false;
        }
        if sink.is_active() {
            if let Some(promoted) = reserve.peek(section) {
                let rebirth = promoted.rebirth_square(target);
                if rebirth_is_free(board, origin, rebirth) {
                    sink.push_with(|| {
                        Move::promotion_capture(origin, target, section)
                            .with_capturing_rebirth(rebirth, promoted.is_castling())
                    });
                }
            }
        }
        true
    }
}

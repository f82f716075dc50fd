use arrayvec::ArrayVec;
use board_game_traits::Color;

use crate::position::piece::is_castling_square;
use crate::position::reserve::Section;
use crate::position::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Null,
    Quiet,
    Capture,
    DoubleStep,
    EnPassant,
    Promotion,
    PromotionCapture,
    ShortCastling,
    LongCastling,
}

/// A reversible step of a move.
///
/// Piece effects are applied in list order and reverted in reverse order.
/// State effects are applied after the state snapshot is pushed, and are undone by popping it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Moves the piece on `from` to `to`
    Relocate { from: Square, to: Square },
    /// Takes the piece on `square` off the board, onto the capture table
    Lift { square: Square },
    /// Puts the top piece of the capture table on `square`
    Drop { square: Square },
    /// Puts the top piece of a reserve section on `square`
    Promote { square: Square, section: Section },
    /// Gives the piece on `square` a new colour
    Recolour { square: Square, colour: Color },
    ClearCastling { square: Square },
    GrantCastling { square: Square },
    SetEnPassant { square: Square },
}

impl Effect {
    pub fn is_state_effect(self) -> bool {
        matches!(
            self,
            Effect::ClearCastling { .. }
                | Effect::GrantCastling { .. }
                | Effect::SetEnPassant { .. }
        )
    }
}

/// Which piece is reborn by a Circe-family capture, and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rebirth {
    /// Circe: the captured piece
    Captured(Square),
    /// Anti-Circe: the capturing piece
    Capturing(Square),
}

pub const MAX_EFFECTS: usize = 12;

/// Descriptor of one ply, plus the effects that carry it out.
/// A move is only meaningful in the position it was generated in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    kind: MoveKind,
    route: Option<(Square, Square)>,
    stop: Option<Square>,
    section: Option<Section>,
    rebirth: Option<Rebirth>,
    effects: ArrayVec<Effect, MAX_EFFECTS>,
}

impl Move {
    fn new(kind: MoveKind, origin: Square, target: Square) -> Self {
        Move {
            kind,
            route: Some((origin, target)),
            stop: None,
            section: None,
            rebirth: None,
            effects: ArrayVec::new(),
        }
    }

    /// Passes the turn. Used for set play, threats and tempo tries.
    pub fn null() -> Self {
        Move {
            kind: MoveKind::Null,
            route: None,
            stop: None,
            section: None,
            rebirth: None,
            effects: ArrayVec::new(),
        }
    }

    pub fn quiet(origin: Square, target: Square) -> Self {
        let mut mv = Move::new(MoveKind::Quiet, origin, target);
        mv.push_effect(Effect::Relocate {
            from: origin,
            to: target,
        });
        mv.clear_castlings(&[origin, target]);
        mv
    }

    pub fn capture(origin: Square, target: Square) -> Self {
        let mut mv = Move::new(MoveKind::Capture, origin, target);
        mv.push_effect(Effect::Lift { square: target });
        mv.push_effect(Effect::Relocate {
            from: origin,
            to: target,
        });
        mv.clear_castlings(&[origin, target]);
        mv
    }

    /// Pawn double step over `stop`, which becomes the en passant square.
    pub fn double_step(origin: Square, target: Square, stop: Square) -> Self {
        let mut mv = Move::new(MoveKind::DoubleStep, origin, target);
        mv.stop = Some(stop);
        mv.push_effect(Effect::Relocate {
            from: origin,
            to: target,
        });
        mv.push_effect(Effect::SetEnPassant { square: stop });
        mv
    }

    /// En passant capture of the pawn on `stop`.
    pub fn en_passant(origin: Square, target: Square, stop: Square) -> Self {
        let mut mv = Move::new(MoveKind::EnPassant, origin, target);
        mv.stop = Some(stop);
        mv.push_effect(Effect::Lift { square: stop });
        mv.push_effect(Effect::Relocate {
            from: origin,
            to: target,
        });
        mv
    }

    pub fn promotion(origin: Square, target: Square, section: Section) -> Self {
        let mut mv = Move::new(MoveKind::Promotion, origin, target);
        mv.section = Some(section);
        mv.push_effect(Effect::Lift { square: origin });
        mv.push_effect(Effect::Promote {
            square: target,
            section,
        });
        mv.clear_castlings(&[target]);
        mv
    }

    pub fn promotion_capture(origin: Square, target: Square, section: Section) -> Self {
        let mut mv = Move::new(MoveKind::PromotionCapture, origin, target);
        mv.section = Some(section);
        // The captured piece goes on the table last, so a Circe rebirth finds it on top
        mv.push_effect(Effect::Lift { square: origin });
        mv.push_effect(Effect::Lift { square: target });
        mv.push_effect(Effect::Promote {
            square: target,
            section,
        });
        mv.clear_castlings(&[target]);
        mv
    }

    /// King from `origin` to `target`, rook from `origin2` to `target2`.
    pub fn castling(origin: Square, target: Square, origin2: Square, target2: Square) -> Self {
        let kind = if target.file() > origin.file() {
            MoveKind::ShortCastling
        } else {
            MoveKind::LongCastling
        };
        let mut mv = Move::new(kind, origin, target);
        mv.stop = Some(target2);
        mv.push_effect(Effect::Relocate {
            from: origin,
            to: target,
        });
        mv.push_effect(Effect::Relocate {
            from: origin2,
            to: target2,
        });
        for square in [origin, target, origin2, target2] {
            mv.push_effect(Effect::ClearCastling { square });
        }
        mv
    }

    /// Circe: the captured piece, on top of the table after the capture, goes to `rebirth`.
    pub fn with_captured_rebirth(mut self, rebirth: Square, grant_castling: bool) -> Self {
        self.rebirth = Some(Rebirth::Captured(rebirth));
        self.push_effect(Effect::Drop { square: rebirth });
        if grant_castling {
            self.push_effect(Effect::GrantCastling { square: rebirth });
        }
        self
    }

    /// Anti-Circe: the capturing piece lands on `rebirth` instead of the capture square.
    pub fn with_capturing_rebirth(mut self, rebirth: Square, grant_castling: bool) -> Self {
        let target = self.target();
        self.rebirth = Some(Rebirth::Capturing(rebirth));
        for effect in self.effects.iter_mut() {
            match effect {
                Effect::Relocate { to, .. } if Some(*to) == target => *to = rebirth,
                Effect::Promote { square, .. } => *square = rebirth,
                _ => (),
            }
        }
        self.clear_castlings(&[rebirth]);
        if grant_castling {
            self.push_effect(Effect::GrantCastling { square: rebirth });
        }
        self
    }

    pub(crate) fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn clear_castlings(&mut self, squares: &[Square]) {
        for &square in squares {
            if is_castling_square(square) {
                self.push_effect(Effect::ClearCastling { square });
            }
        }
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn origin(&self) -> Option<Square> {
        self.route.map(|(origin, _)| origin)
    }

    pub fn target(&self) -> Option<Square> {
        self.route.map(|(_, target)| target)
    }

    /// Square of the pawn taken en passant, the skipped square of a double step,
    /// or the rook's target when castling.
    pub fn stop(&self) -> Option<Square> {
        self.stop
    }

    pub fn section(&self) -> Option<Section> {
        self.section
    }

    pub fn rebirth(&self) -> Option<Rebirth> {
        self.rebirth
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture
        )
    }

    pub fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastling | MoveKind::LongCastling)
    }

    /// Where the moving unit ends up. For Anti-Circe captures this is the rebirth square.
    pub fn landing(&self) -> Option<Square> {
        self.effects.iter().rev().find_map(|effect| match *effect {
            Effect::Relocate { to, .. } => Some(to),
            Effect::Promote { square, .. } => Some(square),
            _ => None,
        })
    }
}

/// Destination of generated moves. An inactive sink only lets generators report royal captures.
pub struct MoveSink<'a> {
    moves: Option<&'a mut Vec<Move>>,
}

impl<'a> MoveSink<'a> {
    pub fn new(moves: Option<&'a mut Vec<Move>>) -> Self {
        MoveSink { moves }
    }

    pub fn inactive() -> Self {
        MoveSink { moves: None }
    }

    pub fn is_active(&self) -> bool {
        self.moves.is_some()
    }

    /// Builds and stores the move, if the sink is collecting.
    pub fn push_with(&mut self, mv: impl FnOnce() -> Move) {
        if let Some(moves) = self.moves.as_deref_mut() {
            moves.push(mv());
        }
    }

    pub fn len(&self) -> usize {
        self.moves.as_ref().map_or(0, |moves| moves.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves stored since the sink held `start` moves
    pub fn moves_since(&mut self, start: usize) -> &mut [Move] {
        match self.moves.as_deref_mut() {
            Some(moves) => &mut moves[start..],
            None => &mut [],
        }
    }
}

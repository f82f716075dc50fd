use crate::position::board::Board;
use crate::position::factory::MoveFactory;
use crate::position::mv::Move;
use crate::position::Position;
use crate::problem::battle::{merge_defence, BattleSearch};
use crate::problem::{evaluate_terminal_node, Aim, NO_SOLUTION};

/// The attacker moves first and forces the defender to deliver the aim against the attacker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selfmate;

impl BattleSearch for Selfmate {
    const TERMINAL_DEPTH: i32 = 0;
    const PREFIX: &'static str = "s";

    fn search_max<B: Board, F: MoveFactory>(
        position: &mut Position<B, F>,
        aim: Aim,
        depth: i32,
        moves: &[Move],
    ) -> i32 {
        let mut max = 0;
        if depth == 0 {
            if moves.iter().any(|mv| position.play(mv, None).legal()) {
                max = NO_SOLUTION;
            }
        } else {
            for mv in moves {
                let mut replies = vec![];
                let mut guard = position.play(mv, Some(&mut replies));
                if guard.legal() {
                    let score = Self::search_min(&mut *guard, aim, depth, &replies, 0);
                    max = if max == 0 { score } else { max.max(score) };
                }
                drop(guard);
                if max == depth {
                    break;
                }
            }
        }
        if max == 0 {
            if evaluate_terminal_node(position, aim) {
                depth + 1
            } else {
                NO_SOLUTION
            }
        } else {
            max
        }
    }

    fn search_min<B: Board, F: MoveFactory>(
        position: &mut Position<B, F>,
        aim: Aim,
        depth: i32,
        moves: &[Move],
        refutations: i32,
    ) -> i32 {
        let mut min = 0;
        for mv in moves {
            let mut replies = vec![];
            let mut guard = position.play(mv, Some(&mut replies));
            if guard.legal() {
                let score = Self::search_max(&mut *guard, aim, depth - 1, &replies);
                min = merge_defence(min, score);
            }
            drop(guard);
            if min < -refutations {
                return NO_SOLUTION;
            }
        }
        if min == 0 {
            NO_SOLUTION
        } else {
            min
        }
    }
}

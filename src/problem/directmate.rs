use crate::position::board::Board;
use crate::position::factory::MoveFactory;
use crate::position::mv::Move;
use crate::position::Position;
use crate::problem::battle::{merge_defence, BattleSearch};
use crate::problem::{evaluate_terminal_node, Aim, NO_SOLUTION};

/// The attacker moves first and forces the aim against any defence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directmate;

impl BattleSearch for Directmate {
    const TERMINAL_DEPTH: i32 = 1;
    const PREFIX: &'static str = "";

    fn search_max<B: Board, F: MoveFactory>(
        position: &mut Position<B, F>,
        aim: Aim,
        depth: i32,
        moves: &[Move],
    ) -> i32 {
        let mut max = NO_SOLUTION;
        for mv in moves {
            let mut replies = vec![];
            let mut guard = position.play(mv, Some(&mut replies));
            if guard.legal() {
                max = max.max(Self::search_min(&mut *guard, aim, depth, &replies, 0));
            }
            drop(guard);
            if max == depth {
                break;
            }
        }
        max
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
            if depth == 1 {
                if position.play(mv, None).legal() {
                    min -= 1;
                }
            } else {
                let mut replies = vec![];
                let mut guard = position.play(mv, Some(&mut replies));
                if guard.legal() {
                    let score = Self::search_max(&mut *guard, aim, depth - 1, &replies);
                    min = merge_defence(min, score);
                }
            }
            if min < -refutations {
                return NO_SOLUTION;
            }
        }
        if min == 0 {
            if evaluate_terminal_node(position, aim) {
                depth
            } else {
                NO_SOLUTION
            }
        } else {
            min
        }
    }
}

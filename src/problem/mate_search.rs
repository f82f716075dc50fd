use crate::position::board::{Board, MailboxBoard};
use crate::position::factory::{MoveFactory, Orthodox};
use crate::position::mv::Move;
use crate::position::Position;
use crate::problem::{
    evaluate_terminal_node, rules_name, AnalysisOptions, Aim, DisplayOptions, Problem,
};
use crate::solution::{IllegalPosition, Point, Solution};

/// Finds, for every first move, the shortest forced mate of at most `n_moves` moves.
#[derive(Clone, Debug)]
pub struct MateSearch<B: Board = MailboxBoard, F: MoveFactory = Orthodox> {
    position: Position<B, F>,
    n_moves: i32,
}

impl<B: Board, F: MoveFactory> MateSearch<B, F> {
    pub fn new(position: Position<B, F>, n_moves: i32) -> Self {
        MateSearch { position, n_moves }
    }
}

impl<B: Board, F: MoveFactory> Problem for MateSearch<B, F> {
    fn solve(&mut self, _analysis: &AnalysisOptions, display: &DisplayOptions) -> Solution {
        let mut moves = vec![];
        if !self.position.is_legal(Some(&mut moves)) {
            return Solution::Illegal(IllegalPosition::Position);
        }
        let mut points = vec![];
        for mv in moves.iter() {
            let text = self.position.pre_write(mv, display.language());
            let mut replies = vec![];
            let mut guard = self.position.play(mv, Some(&mut replies));
            if !guard.legal() {
                continue;
            }
            let text = text + &guard.post_write(&replies);
            if let Some(depth) =
                (1..=self.n_moves).find(|depth| search_min(&mut *guard, *depth, &replies) > 0)
            {
                points.push(Point {
                    score: format!("+M{}", depth),
                    mv: text,
                });
            }
        }
        Solution::Points(points)
    }

    fn describe(&self) -> String {
        format!("dm {} {}", self.n_moves, rules_name(&self.position))
            .trim_end()
            .to_string()
    }

    fn diagram(&self) -> String {
        self.position.to_string()
    }
}

/// Positive if the side that just moved can still force mate in `depth` moves.
fn search_max<B: Board, F: MoveFactory>(
    position: &mut Position<B, F>,
    depth: i32,
    moves: &[Move],
) -> i32 {
    let mut max = -1;
    for mv in moves {
        let mut replies = vec![];
        let mut guard = position.play(mv, Some(&mut replies));
        if guard.legal() {
            max = search_min(&mut *guard, depth, &replies);
        }
        drop(guard);
        if max > 0 {
            break;
        }
    }
    max
}

fn search_min<B: Board, F: MoveFactory>(
    position: &mut Position<B, F>,
    depth: i32,
    moves: &[Move],
) -> i32 {
    let mut min = 0;
    if depth == 1 {
        if moves.iter().any(|mv| position.play(mv, None).legal()) {
            min = -1;
        }
    } else {
        for mv in moves {
            let mut replies = vec![];
            let mut guard = position.play(mv, Some(&mut replies));
            if guard.legal() {
                min = search_max(&mut *guard, depth - 1, &replies);
            }
            drop(guard);
            if min < 0 {
                break;
            }
        }
    }
    if min == 0 {
        if evaluate_terminal_node(position, Aim::Mate) {
            1
        } else {
            -1
        }
    } else {
        min
    }
}

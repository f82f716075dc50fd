use crate::position::board::{Board, MailboxBoard};
use crate::position::factory::{MoveFactory, Orthodox};
use crate::position::mv::Move;
use crate::position::Position;
use crate::problem::{rules_name, AnalysisOptions, DisplayOptions, Problem};
use crate::solution::{IllegalPosition, Solution};

/// Counts the leaf nodes of the legal move tree, `n_moves` full moves deep.
#[derive(Clone, Debug)]
pub struct Perft<B: Board = MailboxBoard, F: MoveFactory = Orthodox> {
    position: Position<B, F>,
    n_moves: u32,
    half_move: bool,
}

impl<B: Board, F: MoveFactory> Perft<B, F> {
    pub fn new(position: Position<B, F>, n_moves: u32, half_move: bool) -> Self {
        Perft {
            position,
            n_moves,
            half_move,
        }
    }

    fn plies(&self) -> u32 {
        self.n_moves * 2 + u32::from(self.half_move)
    }
}

impl<B: Board, F: MoveFactory> Problem for Perft<B, F> {
    fn solve(&mut self, _analysis: &AnalysisOptions, _display: &DisplayOptions) -> Solution {
        let mut moves = vec![];
        if !self.position.is_legal(Some(&mut moves)) {
            return Solution::Illegal(IllegalPosition::Position);
        }
        let plies = self.plies();
        Solution::Nodes(perft(&mut self.position, plies, &moves))
    }

    fn describe(&self) -> String {
        format!("perft {} {}", self.plies(), rules_name(&self.position))
            .trim_end()
            .to_string()
    }

    fn diagram(&self) -> String {
        self.position.to_string()
    }
}

/// Number of legal move sequences of length `depth`, starting with one of `moves`.
pub fn perft<B: Board, F: MoveFactory>(
    position: &mut Position<B, F>,
    depth: u32,
    moves: &[Move],
) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in moves {
        let mut replies = vec![];
        let mut guard = position.play(mv, Some(&mut replies));
        if guard.legal() {
            nodes += perft(&mut *guard, depth - 1, &replies);
        }
    }
    nodes
}

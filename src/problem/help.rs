//! Helpmates and helpstalemates, where both sides cooperate to reach the aim.

use log::info;

use crate::position::board::{Board, MailboxBoard};
use crate::position::factory::{MoveFactory, Orthodox};
use crate::position::mv::Move;
use crate::position::notation::Language;
use crate::position::Position;
use crate::problem::{
    evaluate_terminal_node, rules_name, AnalysisOptions, Aim, DisplayOptions, Problem,
};
use crate::solution::{Branch, IllegalPosition, Play, Solution};

/// Black moves first and White delivers the aim on the last move.
/// With `half_move`, White instead makes the first move, one half-move ahead of a full cycle.
#[derive(Clone, Debug)]
pub struct HelpProblem<B: Board = MailboxBoard, F: MoveFactory = Orthodox> {
    position: Position<B, F>,
    aim: Aim,
    n_moves: i32,
    half_move: bool,
}

impl<B: Board, F: MoveFactory> HelpProblem<B, F> {
    pub fn new(position: Position<B, F>, aim: Aim, n_moves: i32, half_move: bool) -> Self {
        HelpProblem {
            position,
            aim,
            n_moves,
            half_move,
        }
    }
}

impl<B: Board, F: MoveFactory> Problem for HelpProblem<B, F> {
    fn solve(&mut self, analysis: &AnalysisOptions, display: &DisplayOptions) -> Solution {
        let mut moves = vec![];
        let actual_play = self.position.is_legal(Some(&mut moves));
        if !actual_play && !analysis.set_play() {
            return Solution::Illegal(IllegalPosition::Position);
        }

        let mut analyser = HelpAnalysis {
            aim: self.aim,
            language: display.language(),
            tempo_tries: analysis.tempo_tries(),
            diagnostics: vec![],
        };
        let mut branches = vec![];
        if self.half_move {
            analyser.analyse_max(
                &mut self.position,
                self.n_moves + 1,
                &moves,
                &mut branches,
                analysis.set_play(),
                actual_play,
                display.progress_log(),
            );
        } else {
            analyser.analyse_min(
                &mut self.position,
                self.n_moves,
                &moves,
                &mut branches,
                analysis.set_play(),
                actual_play,
                display.progress_log(),
            );
        }

        let mut diagnostics = analyser.diagnostics;
        if !actual_play {
            diagnostics.push(IllegalPosition::ActualPlay);
        }
        Solution::Tree {
            branches,
            diagnostics,
        }
    }

    fn describe(&self) -> String {
        let half = if self.half_move { ".5" } else { "" };
        format!(
            "h{}{}{} {}",
            self.aim,
            self.n_moves,
            half,
            rules_name(&self.position)
        )
        .trim_end()
        .to_string()
    }

    fn diagram(&self) -> String {
        self.position.to_string()
    }
}

struct HelpAnalysis {
    aim: Aim,
    language: Language,
    tempo_tries: bool,
    diagnostics: Vec<IllegalPosition>,
}

impl HelpAnalysis {
    /// Second mover's turn. Returns the number of moves (or passes) that lead to the aim.
    #[allow(clippy::too_many_arguments)]
    fn analyse_max<B: Board, F: MoveFactory>(
        &mut self,
        position: &mut Position<B, F>,
        depth: i32,
        moves: &[Move],
        branches: &mut Vec<Branch>,
        set_play: bool,
        actual_play: bool,
        log_moves: bool,
    ) -> usize {
        let mut max = 0;
        if set_play || self.tempo_tries {
            let null = Move::null();
            let mut replies = vec![];
            let mut guard = position.play(&null, Some(&mut replies));
            if guard.legal() {
                let mut children = vec![];
                let reached = self.analyse_min(
                    &mut *guard,
                    depth - 1,
                    &replies,
                    &mut children,
                    false,
                    true,
                    false,
                );
                if reached != 0 {
                    max += 1;
                    let play = if set_play { Play::Set } else { Play::Tempo2nd };
                    branches.push(Branch::new(play, None, children));
                }
                if log_moves {
                    info!("depth={} move=null branches={}", depth, branches.len());
                }
            } else if set_play {
                self.diagnostics.push(IllegalPosition::SetPlay);
            }
        }

        if actual_play {
            for mv in moves {
                let text = position.pre_write(mv, self.language);
                let mut replies = vec![];
                let mut guard = position.play(mv, Some(&mut replies));
                if !guard.legal() {
                    continue;
                }
                let mut children = vec![];
                let reached = self.analyse_min(
                    &mut *guard,
                    depth - 1,
                    &replies,
                    &mut children,
                    false,
                    true,
                    false,
                );
                if reached != 0 {
                    max += 1;
                    let text = text.clone() + &guard.post_write(&replies);
                    branches.push(Branch::new(Play::Help2nd, Some(text), children));
                }
                if log_moves {
                    info!("depth={} move={} branches={}", depth, text, branches.len());
                }
            }
        }
        max
    }

    /// First mover's turn. Returns the number of moves (or passes) that lead to the aim,
    /// or whether the aim is reached if there is no legal move.
    #[allow(clippy::too_many_arguments)]
    fn analyse_min<B: Board, F: MoveFactory>(
        &mut self,
        position: &mut Position<B, F>,
        depth: i32,
        moves: &[Move],
        branches: &mut Vec<Branch>,
        set_play: bool,
        actual_play: bool,
        log_moves: bool,
    ) -> usize {
        let mut min = 0;
        let mut legal_moves = 0;
        if depth == 0 {
            if moves.iter().any(|mv| position.play(mv, None).legal()) {
                legal_moves += 1;
            }
        } else {
            if set_play || self.tempo_tries {
                let null = Move::null();
                let mut replies = vec![];
                let mut guard = position.play(&null, Some(&mut replies));
                if guard.legal() {
                    let mut children = vec![];
                    let reached = self.analyse_max(
                        &mut *guard,
                        depth,
                        &replies,
                        &mut children,
                        false,
                        true,
                        false,
                    );
                    if reached != 0 {
                        min += 1;
                        let play = if set_play { Play::Set } else { Play::Tempo1st };
                        branches.push(Branch::new(play, None, children));
                    }
                    if log_moves {
                        info!("depth={} move=null branches={}", depth, branches.len());
                    }
                } else if set_play {
                    self.diagnostics.push(IllegalPosition::SetPlay);
                }
            }

            if actual_play {
                for mv in moves {
                    let text = position.pre_write(mv, self.language);
                    let mut replies = vec![];
                    let mut guard = position.play(mv, Some(&mut replies));
                    if !guard.legal() {
                        continue;
                    }
                    legal_moves += 1;
                    let mut children = vec![];
                    let reached = self.analyse_max(
                        &mut *guard,
                        depth,
                        &replies,
                        &mut children,
                        false,
                        true,
                        false,
                    );
                    if reached != 0 {
                        min += 1;
                        let text = text.clone() + &guard.post_write(&replies);
                        branches.push(Branch::new(Play::Help1st, Some(text), children));
                    }
                    if log_moves {
                        info!("depth={} move={} branches={}", depth, text, branches.len());
                    }
                }
            }
        }

        if legal_moves == 0 {
            min = usize::from(evaluate_terminal_node(position, self.aim));
        }
        min
    }
}

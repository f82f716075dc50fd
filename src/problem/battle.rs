//! Classification of play for problems where the two sides oppose each other.
//!
//! The attacker ("max" side) tries to reach the aim within a number of moves, and the defender
//! ("min" side) tries to prevent it. The raw searches live in `BattleSearch` implementations,
//! and return the number of moves the aim is reached in, or a negative score counting the
//! defences that refute it.

use std::cmp::Ordering;
use std::marker::PhantomData;

use log::{debug, info};

use crate::position::board::{Board, MailboxBoard};
use crate::position::factory::{MoveFactory, Orthodox};
use crate::position::mv::Move;
use crate::position::notation::Language;
use crate::position::Position;
use crate::problem::{rules_name, AnalysisOptions, Aim, DisplayOptions, Problem};
use crate::solution::{Branch, IllegalPosition, Play, Solution};

pub trait BattleSearch {
    /// Depth at which the defender's replies end the play
    const TERMINAL_DEPTH: i32;

    /// Stipulation prefix, such as `s` for selfmates
    const PREFIX: &'static str;

    /// Best score the side to move can reach in `depth` moves
    fn search_max<B: Board, F: MoveFactory>(
        position: &mut Position<B, F>,
        aim: Aim,
        depth: i32,
        moves: &[Move],
    ) -> i32;

    /// Score of the side to move's best defence. The search gives up once more than
    /// `refutations` defences succeed.
    fn search_min<B: Board, F: MoveFactory>(
        position: &mut Position<B, F>,
        aim: Aim,
        depth: i32,
        moves: &[Move],
        refutations: i32,
    ) -> i32;
}

/// Folds the score of one more defence into the defender's running score.
///
/// Positive scores are the number of moves the attacker needs, the defender keeps the largest
/// delay by taking the smallest. Once any defence succeeds, the running score counts
/// successful defences as negative numbers.
pub(crate) fn merge_defence(min: i32, score: i32) -> i32 {
    match (min.cmp(&0), score < 0) {
        (Ordering::Equal | Ordering::Greater, true) => -1,
        (Ordering::Equal, false) => score,
        (Ordering::Greater, false) => min.min(score),
        (Ordering::Less, true) => min - 1,
        (Ordering::Less, false) => min,
    }
}

/// A direct- or selfmate-type problem, solved by the search `S`.
#[derive(Clone, Debug)]
pub struct BattleProblem<S, B: Board = MailboxBoard, F: MoveFactory = Orthodox> {
    position: Position<B, F>,
    aim: Aim,
    n_moves: i32,
    search: PhantomData<S>,
}

impl<S: BattleSearch, B: Board, F: MoveFactory> BattleProblem<S, B, F> {
    pub fn new(position: Position<B, F>, aim: Aim, n_moves: i32) -> Self {
        BattleProblem {
            position,
            aim,
            n_moves,
            search: PhantomData,
        }
    }

    pub fn position(&self) -> &Position<B, F> {
        &self.position
    }
}

impl<S: BattleSearch, B: Board, F: MoveFactory> Problem for BattleProblem<S, B, F> {
    fn solve(&mut self, analysis: &AnalysisOptions, display: &DisplayOptions) -> Solution {
        let mut moves = vec![];
        let actual_play = self.position.is_legal(Some(&mut moves));
        if !actual_play && !analysis.set_play() {
            return Solution::Illegal(IllegalPosition::Position);
        }

        let mut analyser = BattleAnalysis::<S>::new(self.aim, analysis, display.language());
        let mut branches = vec![];
        analyser.analyse_max(
            &mut self.position,
            self.n_moves,
            &moves,
            &mut branches,
            analysis.set_play(),
            i32::try_from(analysis.refutations()).unwrap_or(i32::MAX),
            actual_play,
            actual_play,
            display.progress_log(),
        );

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
        format!(
            "{}{}{} {}",
            S::PREFIX,
            self.aim,
            self.n_moves,
            rules_name(&self.position)
        )
        .trim_end()
        .to_string()
    }

    fn diagram(&self) -> String {
        self.position.to_string()
    }
}

/// Options that stay fixed through one analysis, and the findings it collects.
struct BattleAnalysis<S> {
    aim: Aim,
    language: Language,
    variations: bool,
    threats: bool,
    short_variations: bool,
    diagnostics: Vec<IllegalPosition>,
    search: PhantomData<S>,
}

impl<S: BattleSearch> BattleAnalysis<S> {
    fn new(aim: Aim, options: &AnalysisOptions, language: Language) -> Self {
        BattleAnalysis {
            aim,
            language,
            variations: options.variations(),
            threats: options.threats(),
            short_variations: options.short_variations(),
            diagnostics: vec![],
            search: PhantomData,
        }
    }

    /// Classifies the attacker's moves into keys (or continuations) and tries.
    #[allow(clippy::too_many_arguments)]
    fn analyse_max<B: Board, F: MoveFactory>(
        &mut self,
        position: &mut Position<B, F>,
        depth: i32,
        moves: &[Move],
        branches: &mut Vec<Branch>,
        set_play: bool,
        tries: i32,
        actual_play: bool,
        mark_keys: bool,
        log_moves: bool,
    ) {
        if set_play && depth != S::TERMINAL_DEPTH {
            let null = Move::null();
            let mut replies = vec![];
            let mut guard = position.play(&null, Some(&mut replies));
            if guard.legal() {
                let score = S::search_min(&mut *guard, self.aim, depth, &replies, 0);
                let set_depth = if score > 0 { depth - score + 1 } else { depth };
                let mut variations = vec![];
                self.analyse_min(&mut *guard, set_depth, &replies, &mut variations, true);
                branches.push(Branch::new(Play::Set, None, variations));
                if log_moves {
                    if score >= 0 {
                        info!("depth={} move=null score={}", depth, score);
                    } else {
                        info!("depth={} move=null score<0", depth);
                    }
                }
            } else {
                self.diagnostics.push(IllegalPosition::SetPlay);
            }
        }

        if !actual_play {
            return;
        }
        for mv in moves {
            let text = position.pre_write(mv, self.language);
            let mut replies = vec![];
            let mut guard = position.play(mv, Some(&mut replies));
            if !guard.legal() {
                continue;
            }
            let text = text + &guard.post_write(&replies);
            let score = S::search_min(&mut *guard, self.aim, depth, &replies, tries);
            if score > 0 {
                let mut variations = vec![];
                if self.variations && depth != S::TERMINAL_DEPTH {
                    self.analyse_min(
                        &mut *guard,
                        depth - score + 1,
                        &replies,
                        &mut variations,
                        false,
                    );
                }
                let play = if mark_keys {
                    Play::Key
                } else {
                    Play::Continuation
                };
                branches.push(Branch::new(play, Some(text.clone()), variations));
            } else if score >= -tries {
                let mut variations = vec![];
                self.analyse_min(&mut *guard, depth, &replies, &mut variations, false);
                branches.push(Branch::new(Play::Try, Some(text.clone()), variations));
            }
            if log_moves {
                if score >= -tries {
                    info!("depth={} move={} score={}", depth, text, score);
                } else {
                    info!("depth={} move={} score<{}", depth, text, -tries);
                }
            }
        }
    }

    /// Classifies the defender's moves into variations and refutations,
    /// and finds the threat or zugzwang of the position.
    fn analyse_min<B: Board, F: MoveFactory>(
        &mut self,
        position: &mut Position<B, F>,
        depth: i32,
        moves: &[Move],
        branches: &mut Vec<Branch>,
        set_play: bool,
    ) {
        if depth == S::TERMINAL_DEPTH {
            for mv in moves {
                let text = position.pre_write(mv, self.language);
                let mut replies = vec![];
                let mut guard = position.play(mv, Some(&mut replies));
                if guard.legal() {
                    let text = text + &guard.post_write(&replies);
                    branches.push(Branch::leaf(Play::Refutation, text));
                }
            }
            return;
        }

        let mut threats = None;
        if depth > 1 && self.variations && self.threats && !set_play {
            let null = Move::null();
            let mut replies = vec![];
            let mut guard = position.play(&null, Some(&mut replies));
            if guard.legal() {
                let score = S::search_max(&mut *guard, self.aim, depth - 1, &replies);
                if score > 0 {
                    let mut threat = vec![];
                    self.analyse_max(
                        &mut *guard,
                        depth - score,
                        &replies,
                        &mut threat,
                        false,
                        0,
                        true,
                        false,
                        false,
                    );
                    branches.push(Branch::new(Play::Threat, None, threat.clone()));
                    threats = Some(threat);
                } else {
                    branches.push(Branch::new(Play::Zugzwang, None, vec![]));
                }
            }
        }

        for mv in moves {
            let text = position.pre_write(mv, self.language);
            let mut replies = vec![];
            let mut guard = position.play(mv, Some(&mut replies));
            if !guard.legal() {
                continue;
            }
            let text = text + &guard.post_write(&replies);
            let score = S::search_max(&mut *guard, self.aim, depth - 1, &replies);
            debug!("depth={} move={} score={}", depth, text, score);
            if score > 0 {
                if (self.variations || set_play) && (score == 1 || self.short_variations) {
                    let mut continuations = vec![];
                    self.analyse_max(
                        &mut *guard,
                        depth - score,
                        &replies,
                        &mut continuations,
                        false,
                        0,
                        true,
                        false,
                        false,
                    );
                    // Defences that only allow the threat are not variations
                    let shows_threat = threats.as_ref().is_some_and(|threats: &Vec<Branch>| {
                        continuations
                            .iter()
                            .any(|continuation| threats.contains(continuation))
                    });
                    if !shows_threat {
                        branches.push(Branch::new(Play::Variation, Some(text), continuations));
                    }
                }
            } else if !set_play {
                branches.push(Branch::leaf(Play::Refutation, text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::NO_SOLUTION;

    #[test]
    fn merge_defence_test() {
        assert_eq!(merge_defence(0, 3), 3);
        assert_eq!(merge_defence(3, 2), 2);
        assert_eq!(merge_defence(2, 3), 2);
        assert_eq!(merge_defence(0, NO_SOLUTION), -1);
        assert_eq!(merge_defence(2, NO_SOLUTION), -1);
        assert_eq!(merge_defence(-1, NO_SOLUTION), -2);
        assert_eq!(merge_defence(-1, 2), -1);
    }
}

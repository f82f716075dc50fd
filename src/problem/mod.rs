//! Stipulations, and the exhaustive searches that solve them.

use std::fmt;

use crate::position::board::Board;
use crate::position::factory::MoveFactory;
use crate::position::notation::Language;
use crate::position::Position;
use crate::solution::Solution;

pub mod battle;
pub mod directmate;
pub mod help;
pub mod mate_search;
pub mod perft;
pub mod selfmate;

pub use battle::BattleProblem;
pub use directmate::Directmate;
pub use help::HelpProblem;
pub use mate_search::MateSearch;
pub use perft::Perft;
pub use selfmate::Selfmate;

/// Score of a line that does not reach the aim
pub const NO_SOLUTION: i32 = i32::MIN;

/// What the final position of a solution must be
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aim {
    Mate,
    Stalemate,
}

impl fmt::Display for Aim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aim::Mate => write!(f, "#"),
            Aim::Stalemate => write!(f, "="),
        }
    }
}

/// Whether a position without legal moves fulfils the aim.
pub fn evaluate_terminal_node<B: Board, F: MoveFactory>(
    position: &mut Position<B, F>,
    aim: Aim,
) -> bool {
    if position.is_check() == 0 {
        aim == Aim::Stalemate
    } else {
        aim == Aim::Mate
    }
}

/// What to search for, beyond the solution itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    set_play: bool,
    refutations: u32,
    variations: bool,
    threats: bool,
    short_variations: bool,
    tempo_tries: bool,
}

impl AnalysisOptions {
    pub fn add_set_play(mut self, set_play: bool) -> Self {
        self.set_play = set_play;
        self
    }

    /// Report first moves that fail to at most this many defences, as tries
    pub fn add_refutations(mut self, refutations: u32) -> Self {
        self.refutations = refutations;
        self
    }

    pub fn add_variations(mut self, variations: bool) -> Self {
        self.variations = variations;
        self
    }

    pub fn add_threats(mut self, threats: bool) -> Self {
        self.threats = threats;
        self
    }

    /// Include variations that end before the full move count
    pub fn add_short_variations(mut self, short_variations: bool) -> Self {
        self.short_variations = short_variations;
        self
    }

    pub fn add_tempo_tries(mut self, tempo_tries: bool) -> Self {
        self.tempo_tries = tempo_tries;
        self
    }

    pub fn set_play(&self) -> bool {
        self.set_play
    }

    pub fn refutations(&self) -> u32 {
        self.refutations
    }

    pub fn variations(&self) -> bool {
        self.variations
    }

    pub fn threats(&self) -> bool {
        self.threats
    }

    pub fn short_variations(&self) -> bool {
        self.short_variations
    }

    pub fn tempo_tries(&self) -> bool {
        self.tempo_tries
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    language: Language,
    internal_board: bool,
    progress_log: bool,
}

impl DisplayOptions {
    pub fn add_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Print the board diagram before solving
    pub fn add_internal_board(mut self, internal_board: bool) -> Self {
        self.internal_board = internal_board;
        self
    }

    /// Log every analysed top-level move
    pub fn add_progress_log(mut self, progress_log: bool) -> Self {
        self.progress_log = progress_log;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn internal_board(&self) -> bool {
        self.internal_board
    }

    pub fn progress_log(&self) -> bool {
        self.progress_log
    }
}

pub trait Problem {
    fn solve(&mut self, analysis: &AnalysisOptions, display: &DisplayOptions) -> Solution;

    /// One-line summary, such as `#2 Circe`
    fn describe(&self) -> String;

    /// Board diagram of the starting position
    fn diagram(&self) -> String;
}

/// A problem, ready to be solved with the options it was stated with.
pub struct Task {
    pub problem: Box<dyn Problem>,
    pub analysis: AnalysisOptions,
    pub display: DisplayOptions,
}

impl Task {
    pub fn solve(&mut self) -> Solution {
        self.problem.solve(&self.analysis, &self.display)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("problem", &self.problem.describe())
            .field("analysis", &self.analysis)
            .field("display", &self.display)
            .finish()
    }
}

/// Short name of a position's rules, for problem descriptions.
pub(crate) fn rules_name<B: Board, F: MoveFactory>(position: &Position<B, F>) -> String {
    let mut names = vec![];
    if !F::NAME.is_empty() {
        names.push(F::NAME.to_string());
    }
    names.extend(position.conditions().iter().map(|condition| condition.to_string()));
    names.join(" ")
}

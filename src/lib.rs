//! A solver for orthodox and fairy chess problems: directmates, selfmates and helpmates,
//! plus mate searches and perft counts.
//! Supports Circe, Anti-Circe, Andernach and Anti-Andernach rules.

extern crate arrayvec;
extern crate board_game_traits;
extern crate pgn_traits;

pub mod popeye;
pub mod position;
pub mod problem;
pub mod solution;
#[cfg(test)]
mod tests;

pub use popeye::parse_tasks;
pub use position::Position;
pub use problem::{AnalysisOptions, DisplayOptions, Problem, Task};
pub use solution::Solution;

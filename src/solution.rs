//! Solution trees produced by the problem solvers, and their text rendering.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of a move in a solution tree. The declaration order is the output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Play {
    /// Play before the first move, entered with a null move
    Set,
    Tempo1st,
    Help1st,
    Tempo2nd,
    Help2nd,
    Zugzwang,
    Threat,
    Key,
    Continuation,
    Try,
    Variation,
    Refutation,
}

/// A node of a solution tree
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Branch {
    pub play: Play,
    /// Move text. Null move nodes have none.
    pub mv: Option<String>,
    pub branches: Vec<Branch>,
}

impl Branch {
    pub fn new(play: Play, mv: Option<String>, branches: Vec<Branch>) -> Self {
        Branch { play, mv, branches }
    }

    pub fn leaf(play: Play, mv: String) -> Self {
        Branch {
            play,
            mv: Some(mv),
            branches: vec![],
        }
    }
}

/// A first move found by a mate search, with the depth it mates in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub score: String,
    pub mv: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IllegalPosition {
    Position,
    ActualPlay,
    SetPlay,
}

impl fmt::Display for IllegalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalPosition::Position => write!(f, "Illegal position."),
            IllegalPosition::ActualPlay => write!(f, "Illegal position in actual play."),
            IllegalPosition::SetPlay => write!(f, "Illegal position in set play."),
        }
    }
}

/// The outcome of solving one problem.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Solution {
    /// Classified play, plus any illegal-position findings made along the way
    Tree {
        branches: Vec<Branch>,
        diagnostics: Vec<IllegalPosition>,
    },
    /// Node count of a perft run
    Nodes(u64),
    Points(Vec<Point>),
    Illegal(IllegalPosition),
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Tree {
                branches,
                diagnostics,
            } => {
                write!(f, "{}", format(&group(branches)))?;
                for diagnostic in diagnostics {
                    write!(f, "\n{}", diagnostic)?;
                }
                Ok(())
            }
            Solution::Nodes(nodes) => write!(f, "{}", nodes),
            Solution::Points(points) => write!(f, "{}", format_points(points)),
            Solution::Illegal(illegal) => write!(f, "{}", illegal),
        }
    }
}

/// Merges sibling branches that have the same play and identical subtrees,
/// joining their moves with commas. The result is sorted by play.
pub fn group(branches: &[Branch]) -> Vec<Branch> {
    let mut groups: Vec<(Play, &[Branch], Vec<&str>, bool)> = vec![];
    for branch in branches {
        let existing = groups.iter().position(|(play, children, _, _)| {
            *play == branch.play && *children == &branch.branches[..]
        });
        let index = match existing {
            Some(index) => index,
            None => {
                groups.push((branch.play, &branch.branches[..], vec![], false));
                groups.len() - 1
            }
        };
        let (_, _, moves, has_move) = &mut groups[index];
        if let Some(mv) = &branch.mv {
            moves.push(mv.as_str());
            *has_move = true;
        }
    }

    let mut grouped: Vec<Branch> = groups
        .into_iter()
        .map(|(play, children, moves, has_move)| {
            Branch::new(play, has_move.then(|| moves.join(",")), group(children))
        })
        .collect();
    // Stable, so groups of the same play keep their first-occurrence order
    grouped.sort_by_key(|branch| branch.play);
    grouped
}

/// Renders grouped branches as numbered move text, one line per variation.
pub fn format(branches: &[Branch]) -> String {
    let mut output = String::new();
    write_branches(branches, 1, false, true, false, &mut output);
    output
}

fn write_branches(
    branches: &[Branch],
    move_number: usize,
    newline: bool,
    tab: bool,
    space: bool,
    output: &mut String,
) {
    let mut branches = branches.iter();
    if let Some(first) = branches.next() {
        write_branch(first, move_number, newline, tab, space, output);
        for branch in branches {
            write_branch(branch, move_number, true, true, false, output);
        }
    }
}

fn write_branch(
    branch: &Branch,
    move_number: usize,
    newline: bool,
    tab: bool,
    space: bool,
    output: &mut String,
) {
    if branch.play == Play::Set {
        write_branches(&branch.branches, move_number, newline, tab, space, output);
        return;
    }
    if newline {
        output.push('\n');
    }
    if tab {
        output.push_str(&"\t".repeat(move_number - 1));
    } else if space {
        output.push(' ');
    }
    let mv = branch.mv.as_deref().unwrap_or_default();
    match branch.play {
        Play::Zugzwang => {
            output.push_str("(zz");
            write_branches(&branch.branches, move_number + 1, true, true, false, output);
            output.push(')');
        }
        Play::Threat => {
            output.push('(');
            write_branches(&branch.branches, move_number + 1, false, false, false, output);
            output.push(')');
        }
        Play::Variation | Play::Refutation | Play::Help2nd | Play::Tempo2nd => {
            if tab {
                output.push_str(&format!("{}...", move_number));
            }
            if branch.play == Play::Tempo2nd {
                output.push_str("??");
            } else {
                output.push_str(mv);
                if branch.play == Play::Refutation {
                    output.push('!');
                }
            }
            write_branches(&branch.branches, move_number + 1, false, false, true, output);
        }
        _ => {
            output.push_str(&format!("{}.", move_number));
            match branch.play {
                Play::Tempo1st => output.push_str("??"),
                Play::Try => {
                    output.push_str(mv);
                    output.push('?');
                }
                Play::Key => {
                    output.push_str(mv);
                    output.push('!');
                }
                _ => output.push_str(mv),
            }
            write_branches(&branch.branches, move_number, false, false, true, output);
        }
    }
}

/// One `score<TAB>move` line per point, ordered by score text, then move text.
pub fn format_points(points: &[Point]) -> String {
    let mut points: Vec<&Point> = points.iter().collect();
    points.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.mv.cmp(&b.mv)));
    points
        .iter()
        .map(|point| format!("{}\t{}", point.score, point.mv))
        .collect::<Vec<_>>()
        .join("\n")
}

use board_game_traits::Color;

use crate::position::board::MailboxBoard;
use crate::position::factory::Circe;
use crate::position::piece::{Piece, PieceKind};
use crate::position::reserve::{Reserve, Section};
use crate::position::Position;
use crate::problem::{
    Aim, AnalysisOptions, BattleProblem, Directmate, DisplayOptions, HelpProblem, MateSearch,
    Perft, Problem, Selfmate, Task,
};
use crate::solution::{format, group, Branch, IllegalPosition, Play, Point, Solution};

const ROOK_MATE: &str = "k7/8/1K6/8/8/8/8/7R w - -";
/// Black can only move the a-pawn. The rook needs a free rank to reach the h-file.
const THREAT_TWO: &str = "7k/p4Kp1/6P1/8/8/8/8/RB6 w - -";
/// Black can only play c3-c2, which opens the third rank for the rook.
const ZUGZWANG_TWO: &str = "7k/5Kp1/6P1/8/P7/R1p5/8/8 w - -";

fn solve(problem: &mut dyn Problem, analysis: AnalysisOptions) -> Solution {
    problem.solve(&analysis, &DisplayOptions::default())
}

fn tree_branches(solution: Solution) -> Vec<Branch> {
    match solution {
        Solution::Tree {
            branches,
            diagnostics,
        } => {
            assert!(diagnostics.is_empty(), "{:?}", diagnostics);
            branches
        }
        solution => panic!("Expected a solution tree, got {:?}", solution),
    }
}

fn find_branch<'a>(branches: &'a [Branch], play: Play, mv: &str) -> &'a Branch {
    branches
        .iter()
        .find(|branch| branch.play == play && branch.mv.as_deref() == Some(mv))
        .unwrap_or_else(|| panic!("No {:?} {} in {:?}", play, mv, branches))
}

/// Whether the tree holds a line of play with the given moves, from the root down.
fn has_line(branches: &[Branch], line: &[&str]) -> bool {
    match line.split_first() {
        None => true,
        Some((first, rest)) => branches
            .iter()
            .any(|branch| branch.mv.as_deref() == Some(*first) && has_line(&branch.branches, rest)),
    }
}

#[test]
fn directmate_in_one_test() {
    let position = <Position>::from_fen(ROOK_MATE).unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 1);
    let solution = solve(&mut problem, AnalysisOptions::default());
    assert_eq!(
        tree_branches(solution.clone()),
        vec![Branch::leaf(Play::Key, "Rh1-h8#".to_string())]
    );
    assert_eq!(solution.to_string(), "1.Rh1-h8#!");
}

#[test]
fn directmate_tries_test() {
    let position = <Position>::from_fen(ROOK_MATE).unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 1);
    let branches = tree_branches(solve(
        &mut problem,
        AnalysisOptions::default().add_refutations(1),
    ));
    let tries: Vec<&Branch> = branches
        .iter()
        .filter(|branch| branch.play == Play::Try)
        .collect();
    assert!(!tries.is_empty());
    for try_branch in tries {
        assert_eq!(try_branch.branches.len(), 1, "{:?}", try_branch);
        assert_eq!(try_branch.branches[0].play, Play::Refutation);
    }
    assert_eq!(
        branches
            .iter()
            .filter(|branch| branch.play == Play::Key)
            .count(),
        1
    );
}

#[test]
fn directmate_without_solution_test() {
    let position = <Position>::from_fen("k7/8/8/8/8/8/8/K6R w - -").unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 1);
    let solution = solve(&mut problem, AnalysisOptions::default());
    assert!(tree_branches(solution.clone()).is_empty());
    assert_eq!(solution.to_string(), "");
}

#[test]
fn illegal_position_test() {
    let position = <Position>::from_fen("4k3/8/8/8/8/8/8/4K2r b - -").unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 1);
    assert_eq!(
        solve(&mut problem, AnalysisOptions::default()),
        Solution::Illegal(IllegalPosition::Position)
    );
}

#[test]
fn selfmate_in_one_test() {
    let mut position = <Position>::from_fen("k7/8/P7/8/3N4/8/1p4PP/7K w - -").unwrap();
    let mut reserve = Reserve::default();
    reserve.push(
        Section::new(Color::Black, 1),
        Piece::new(PieceKind::Queen, Color::Black),
    );
    position.set_reserve(reserve);
    let mut problem = BattleProblem::<Selfmate>::new(position, Aim::Mate, 1);
    assert_eq!(problem.describe(), "s#1");

    let branches = tree_branches(solve(
        &mut problem,
        AnalysisOptions::default().add_variations(true),
    ));
    assert_eq!(
        branches,
        vec![Branch::new(
            Play::Key,
            Some("Nd4-c6".to_string()),
            vec![Branch::leaf(Play::Variation, "b2-b1=Q#".to_string())]
        )]
    );
}

#[test]
fn helpmate_in_one_test() {
    let position = <Position>::from_fen("k7/8/1K6/8/8/8/8/7R b - -").unwrap();
    let mut problem = HelpProblem::new(position, Aim::Mate, 1, false);
    assert_eq!(problem.describe(), "h#1");
    let solution = solve(&mut problem, AnalysisOptions::default());
    assert_eq!(solution.to_string(), "1.Ka8-b8 Rh1-h8#");
}

#[test]
fn help_half_move_test() {
    let position = <Position>::from_fen(ROOK_MATE).unwrap();
    let mut problem = HelpProblem::new(position, Aim::Mate, 0, true);
    assert_eq!(problem.describe(), "h#0.5");
    let solution = solve(&mut problem, AnalysisOptions::default());
    assert_eq!(solution.to_string(), "1...Rh1-h8#");
}

#[test]
fn mate_search_test() {
    let position = <Position>::from_fen(ROOK_MATE).unwrap();
    let mut problem = MateSearch::new(position, 1);
    assert_eq!(problem.describe(), "dm 1");
    let solution = solve(&mut problem, AnalysisOptions::default());
    assert_eq!(
        solution,
        Solution::Points(vec![Point {
            score: "+M1".to_string(),
            mv: "Rh1-h8#".to_string()
        }])
    );
    assert_eq!(solution.to_string(), "+M1\tRh1-h8#");
}

#[test]
fn mate_search_finds_shortest_mate_test() {
    let position = <Position>::from_fen(ROOK_MATE).unwrap();
    let mut problem = MateSearch::new(position, 2);
    let Solution::Points(points) = solve(&mut problem, AnalysisOptions::default()) else {
        panic!("Expected points");
    };
    assert!(points.contains(&Point {
        score: "+M1".to_string(),
        mv: "Rh1-h8#".to_string()
    }));
    assert!(points.iter().filter(|point| point.score == "+M1").count() == 1);
    assert!(points.iter().any(|point| point.score == "+M2"));
}

#[test]
fn perft_problem_test() {
    let mut problem = Perft::new(<Position>::default(), 1, true);
    assert_eq!(problem.describe(), "perft 3");
    assert_eq!(
        solve(&mut problem, AnalysisOptions::default()),
        Solution::Nodes(8902)
    );
}

#[test]
fn describe_rules_test() {
    let position = Position::<MailboxBoard, Circe>::from_fen(ROOK_MATE).unwrap();
    let problem =
        BattleProblem::<Directmate, MailboxBoard, Circe>::new(position, Aim::Stalemate, 2);
    assert_eq!(problem.describe(), "=2 Circe");
}

#[test]
fn task_test() {
    let position = <Position>::from_fen(ROOK_MATE).unwrap();
    let mut task = Task {
        problem: Box::new(BattleProblem::<Directmate>::new(position, Aim::Mate, 1)),
        analysis: AnalysisOptions::default(),
        display: DisplayOptions::default().add_internal_board(true),
    };
    assert!(task.display.internal_board());
    assert_eq!(task.solve().to_string(), "1.Rh1-h8#!");
    assert!(format!("{:?}", task).contains("#1"));
}

#[test]
fn directmate_threat_test() {
    let position = <Position>::from_fen(THREAT_TWO).unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 2);
    let branches = tree_branches(solve(
        &mut problem,
        AnalysisOptions::default()
            .add_variations(true)
            .add_threats(true),
    ));

    // Both pawn defences only allow the threat, so no variation is listed
    let key = find_branch(&branches, Play::Key, "Ra1-a2");
    assert_eq!(
        key.branches,
        vec![Branch::new(
            Play::Threat,
            None,
            vec![Branch::leaf(Play::Continuation, "Ra2-h2#".to_string())]
        )]
    );
    assert_eq!(format(&group(&[key.clone()])), "1.Ra1-a2! (2.Ra2-h2#)");

    let key = find_branch(&branches, Play::Key, "Bb1-c2");
    assert_eq!(format(&group(&[key.clone()])), "1.Bb1-c2! (2.Ra1-h1#)");

    // Blocking or taking the pawn stalemates Black
    for mv in ["Ra1-a6", "Ra1xa7"] {
        assert!(
            branches.iter().all(|branch| branch.mv.as_deref() != Some(mv)),
            "{:?}",
            branches
        );
    }
}

#[test]
fn directmate_zugzwang_test() {
    let position = <Position>::from_fen(ZUGZWANG_TWO).unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 2);
    let branches = tree_branches(solve(
        &mut problem,
        AnalysisOptions::default()
            .add_variations(true)
            .add_threats(true),
    ));

    let key = find_branch(&branches, Play::Key, "a4-a5");
    assert_eq!(
        key.branches,
        vec![
            Branch::new(Play::Zugzwang, None, vec![]),
            Branch::new(
                Play::Variation,
                Some("c3-c2".to_string()),
                vec![Branch::leaf(Play::Continuation, "Ra3-h3#".to_string())]
            ),
        ]
    );
    assert_eq!(
        format(&group(&[key.clone()])),
        "1.a4-a5! (zz)\n1...c3-c2 2.Ra3-h3#"
    );

    let key = find_branch(&branches, Play::Key, "Ra3-b3");
    assert_eq!(key.branches[0].play, Play::Threat);
}

#[test]
fn directmate_try_refutation_test() {
    let position = <Position>::from_fen(ZUGZWANG_TWO).unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 2);
    let branches = tree_branches(solve(
        &mut problem,
        AnalysisOptions::default().add_refutations(1),
    ));

    // c3-c2 blocks the second rank
    let try_branch = find_branch(&branches, Play::Try, "Ra3-a2");
    assert_eq!(
        try_branch.branches,
        vec![Branch::leaf(Play::Refutation, "c3-c2".to_string())]
    );
    assert_eq!(format(&group(&[try_branch.clone()])), "1.Ra3-a2? c3-c2!");
    assert!(branches
        .iter()
        .any(|branch| branch.play == Play::Key && branch.mv.as_deref() == Some("a4-a5")));
}

#[test]
fn directmate_set_play_test() {
    let position = <Position>::from_fen(ZUGZWANG_TWO).unwrap();
    let mut problem = BattleProblem::<Directmate>::new(position, Aim::Mate, 2);
    let solution = solve(&mut problem, AnalysisOptions::default().add_set_play(true));
    let branches = tree_branches(solution.clone());
    assert_eq!(
        branches[0],
        Branch::new(
            Play::Set,
            None,
            vec![Branch::new(
                Play::Variation,
                Some("c3-c2".to_string()),
                vec![Branch::leaf(Play::Continuation, "Ra3-h3#".to_string())]
            )]
        )
    );
    assert!(solution
        .to_string()
        .starts_with("1...c3-c2 2.Ra3-h3#\n1."));
}

#[test]
fn helpmate_in_two_test() {
    let position = <Position>::from_fen("1k6/8/1K6/8/8/8/8/R7 b - -").unwrap();
    let mut problem = HelpProblem::new(position, Aim::Mate, 2, false);
    assert_eq!(problem.describe(), "h#2");
    let branches = tree_branches(solve(&mut problem, AnalysisOptions::default()));
    assert!(branches.iter().all(|branch| branch.play == Play::Help1st));
    assert!(has_line(
        &branches,
        &["Kb8-c8", "Ra1-d1", "Kc8-b8", "Rd1-d8#"]
    ));
    // a8 is covered by the rook, d8 once it stands on d1
    assert!(!has_line(&branches, &["Kb8-a8"]));
    assert!(!has_line(&branches, &["Kb8-c8", "Ra1-d1", "Kc8-d8"]));
}

#[test]
fn helpmate_set_play_test() {
    let position = <Position>::from_fen("k7/8/1K6/8/8/8/8/7R b - -").unwrap();
    let mut problem = HelpProblem::new(position, Aim::Mate, 1, false);
    let solution = solve(&mut problem, AnalysisOptions::default().add_set_play(true));
    assert_eq!(
        tree_branches(solution.clone())[0],
        Branch::new(
            Play::Set,
            None,
            vec![Branch::leaf(Play::Help2nd, "Rh1-h8#".to_string())]
        )
    );
    assert_eq!(solution.to_string(), "1...Rh1-h8#\n1.Ka8-b8 Rh1-h8#");
}

#[test]
fn helpmate_tempo_tries_test() {
    let position = <Position>::from_fen("k7/8/1K6/8/8/8/8/7R b - -").unwrap();
    let mut problem = HelpProblem::new(position, Aim::Mate, 1, false);
    let solution = solve(&mut problem, AnalysisOptions::default().add_tempo_tries(true));
    assert_eq!(
        tree_branches(solution.clone())[0],
        Branch::new(
            Play::Tempo1st,
            None,
            vec![Branch::leaf(Play::Help2nd, "Rh1-h8#".to_string())]
        )
    );
    assert_eq!(solution.to_string(), "1.?? Rh1-h8#\n1.Ka8-b8 Rh1-h8#");
}

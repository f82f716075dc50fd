use crate::solution::{format, format_points, group, Branch, IllegalPosition, Play, Point, Solution};

fn leaf(play: Play, mv: &str) -> Branch {
    Branch::leaf(play, mv.to_string())
}

#[test]
fn group_equal_keys_test() {
    let branches = vec![leaf(Play::Key, "Qa1"), leaf(Play::Key, "Qb1")];
    assert_eq!(group(&branches), vec![leaf(Play::Key, "Qa1,Qb1")]);
    assert_eq!(format(&group(&branches)), "1.Qa1,Qb1!");
}

#[test]
fn group_keeps_different_subtrees_apart_test() {
    let branches = vec![
        Branch::new(
            Play::Key,
            Some("Qa1".to_string()),
            vec![leaf(Play::Variation, "Kb2")],
        ),
        leaf(Play::Key, "Qb1"),
        Branch::new(
            Play::Key,
            Some("Qc1".to_string()),
            vec![leaf(Play::Variation, "Kb2")],
        ),
    ];
    let grouped = group(&branches);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].mv.as_deref(), Some("Qa1,Qc1"));
    assert_eq!(grouped[1].mv.as_deref(), Some("Qb1"));
}

#[test]
fn group_sorts_by_play_test() {
    let branches = vec![
        Branch::new(Play::Try, Some("Qh1".to_string()), vec![leaf(Play::Refutation, "Ka2")]),
        leaf(Play::Key, "Qa1"),
    ];
    let grouped = group(&branches);
    assert_eq!(grouped[0].play, Play::Key);
    assert_eq!(grouped[1].play, Play::Try);
    assert_eq!(format(&grouped), "1.Qa1!\n1.Qh1? Ka2!");
}

#[test]
fn threat_and_variation_test() {
    let branches = vec![Branch::new(
        Play::Key,
        Some("Qa1".to_string()),
        vec![
            Branch::new(
                Play::Variation,
                Some("Kb2".to_string()),
                vec![leaf(Play::Continuation, "Qb1#")],
            ),
            Branch::new(Play::Threat, None, vec![leaf(Play::Continuation, "Qh8#")]),
        ],
    )];
    assert_eq!(
        format(&group(&branches)),
        "1.Qa1! (2.Qh8#)\n1...Kb2 2.Qb1#"
    );
}

#[test]
fn zugzwang_test() {
    let branches = vec![Branch::new(
        Play::Key,
        Some("Qa1".to_string()),
        vec![
            Branch::new(Play::Zugzwang, None, vec![]),
            Branch::new(
                Play::Variation,
                Some("Kb2".to_string()),
                vec![leaf(Play::Continuation, "Qb1#")],
            ),
        ],
    )];
    assert_eq!(format(&group(&branches)), "1.Qa1! (zz)\n1...Kb2 2.Qb1#");
}

#[test]
fn set_play_test() {
    let branches = vec![
        Branch::new(
            Play::Set,
            None,
            vec![Branch::new(
                Play::Variation,
                Some("Kb2".to_string()),
                vec![leaf(Play::Continuation, "Qb1#")],
            )],
        ),
        leaf(Play::Key, "Qa1"),
    ];
    assert_eq!(format(&group(&branches)), "1...Kb2 2.Qb1#\n1.Qa1!");
}

#[test]
fn help_tempo_test() {
    let branches = vec![Branch::new(
        Play::Tempo1st,
        None,
        vec![leaf(Play::Help2nd, "Rh1-h8#")],
    )];
    assert_eq!(format(&group(&branches)), "1.?? Rh1-h8#");
}

#[test]
fn nested_move_numbers_test() {
    let branches = vec![Branch::new(
        Play::Help1st,
        Some("Ka8-b8".to_string()),
        vec![Branch::new(
            Play::Help2nd,
            Some("Rh1-h7".to_string()),
            vec![Branch::new(
                Play::Help1st,
                Some("Kb8-a8".to_string()),
                vec![leaf(Play::Help2nd, "Rh7-h8#")],
            )],
        )],
    )];
    assert_eq!(
        format(&group(&branches)),
        "1.Ka8-b8 Rh1-h7 2.Kb8-a8 Rh7-h8#"
    );
}

#[test]
fn points_test() {
    let points = vec![
        Point {
            score: "+M2".to_string(),
            mv: "Kb6-c7".to_string(),
        },
        Point {
            score: "+M1".to_string(),
            mv: "Rh1-h8#".to_string(),
        },
        Point {
            score: "+M2".to_string(),
            mv: "Kb6-a6".to_string(),
        },
    ];
    assert_eq!(
        format_points(&points),
        "+M1\tRh1-h8#\n+M2\tKb6-a6\n+M2\tKb6-c7"
    );
}

#[test]
fn diagnostics_follow_tree_test() {
    let solution = Solution::Tree {
        branches: vec![leaf(Play::Key, "Qa1")],
        diagnostics: vec![IllegalPosition::SetPlay],
    };
    assert_eq!(
        solution.to_string(),
        "1.Qa1!\nIllegal position in set play."
    );
    assert_eq!(Solution::Nodes(8902).to_string(), "8902");
}

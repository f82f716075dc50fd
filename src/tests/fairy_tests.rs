use board_game_traits::Color;

use crate::position::board::{Board, GridBoard, MailboxBoard};
use crate::position::condition::Condition;
use crate::position::factory::{AntiCirce, Circe, MoveFactory, Orthodox};
use crate::position::mv::Move;
use crate::position::notation::Language;
use crate::position::piece::{Piece, PieceKind};
use crate::position::reserve::Reserve;
use crate::position::state::State;
use crate::position::Position;

use super::{assert_has_move, assert_lacks_move, move_texts, sq};

fn find_move<B: Board, F: MoveFactory>(position: &mut Position<B, F>, text: &str) -> Move {
    let moves = position.legal_moves();
    moves
        .into_iter()
        .find(|mv| position.pre_write(mv, Language::English) == text)
        .unwrap_or_else(|| panic!("No move {} on board\n{}", text, position))
}

fn grid_position<F: MoveFactory>(pieces: &[(&str, PieceKind, Color)]) -> Position<GridBoard, F> {
    let mut board = GridBoard::default();
    for (square, kind, colour) in pieces {
        board.put(sq(square), Piece::new(*kind, *colour));
    }
    Position::new(board, Reserve::default(), State::default(), Color::White)
}

#[test]
fn circe_rebirth_test() {
    let mut position =
        Position::<MailboxBoard, Circe>::from_fen("4k3/8/8/3n4/8/8/8/3RK3 w - -").unwrap();
    let original = position.clone();
    let capture = find_move(&mut position, "Rd1xd5(Ng8)");
    {
        let guard = position.play(&capture, None);
        assert!(guard.legal());
        assert_eq!(
            guard.board().get(sq("g8")),
            Some(Piece::new(PieceKind::Knight, Color::Black))
        );
        assert_eq!(
            guard.board().get(sq("d5")),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(guard.table().is_empty());
    }
    assert_eq!(position, original);
}

#[test]
fn circe_occupied_rebirth_square_test() {
    let mut position =
        Position::<MailboxBoard, Circe>::from_fen("4k1B1/8/8/3n4/8/8/8/3RK3 w - -").unwrap();
    assert_has_move(&mut position, "Rd1xd5");
    assert_lacks_move(&mut position, "Rd1xd5(Ng8)");
}

#[test]
fn circe_pawn_rebirth_test() {
    let mut position =
        Position::<MailboxBoard, Circe>::from_fen("4k3/8/8/3p4/8/8/8/3RK3 w - -").unwrap();
    assert_has_move(&mut position, "Rd1xd5(d7)");
}

#[test]
fn circe_rook_rebirth_grants_castling_test() {
    let mut position =
        Position::<MailboxBoard, Circe>::from_fen("4k3/8/8/7r/8/8/8/4K2R w - -").unwrap();
    assert!(!position.state().has_castling(sq("a8")));
    let capture = find_move(&mut position, "Rh1xh5(Ra8)");
    let guard = position.play(&capture, None);
    assert!(guard.state().has_castling(sq("a8")));
}

#[test]
fn circe_fairy_rebirth_test() {
    let mut position = grid_position::<Circe>(&[
        ("h2", PieceKind::King, Color::White),
        ("a5", PieceKind::Rook, Color::White),
        ("h8", PieceKind::King, Color::Black),
        ("d5", PieceKind::Nightrider, Color::Black),
    ]);
    assert_has_move(&mut position, "Ra5xd5(NRd1)");
}

#[test]
fn anti_circe_rebirth_test() {
    let mut position =
        Position::<MailboxBoard, AntiCirce>::from_fen("4k3/8/8/3n4/8/8/8/3RK3 w - -").unwrap();
    let capture = find_move(&mut position, "Rd1xd5(Rh1)");
    let guard = position.play(&capture, None);
    assert!(guard.legal());
    assert!(guard.board().is_empty(sq("d5")));
    assert_eq!(
        guard.board().get(sq("h1")),
        Some(Piece::new(PieceKind::Rook, Color::White))
    );
    assert!(guard.state().has_castling(sq("h1")));
}

#[test]
fn anti_circe_rebirth_clears_castling_test() {
    let mut board = GridBoard::default();
    for (square, kind, colour) in [
        ("c1", PieceKind::King, Color::White),
        ("h2", PieceKind::Grasshopper, Color::White),
        ("h3", PieceKind::Pawn, Color::White),
        ("h4", PieceKind::Knight, Color::Black),
        ("e8", PieceKind::King, Color::Black),
        ("a8", PieceKind::Rook, Color::Black),
    ] {
        board.put(sq(square), Piece::new(kind, colour));
    }
    let castlings = ["e8", "a8", "h8"].into_iter().map(sq).collect();
    let mut position = Position::<GridBoard, AntiCirce>::new(
        board,
        Reserve::default(),
        State::new(castlings, None),
        Color::White,
    );
    let capture = find_move(&mut position, "Gh2xh4(Gh8)");
    let guard = position.play(&capture, None);
    assert!(guard.legal());
    assert_eq!(
        guard.board().get(sq("h8")),
        Some(Piece::new(PieceKind::Grasshopper, Color::White))
    );
    // A grasshopper on h8 cannot castle, so the right there is gone
    assert!(!guard.state().has_castling(sq("h8")));
    assert!(guard.state().has_castling(sq("e8")));
    assert!(guard.state().has_castling(sq("a8")));
}

#[test]
fn anti_circe_occupied_rebirth_square_test() {
    let mut position =
        Position::<MailboxBoard, AntiCirce>::from_fen("4k3/8/8/3n4/8/8/8/3RK2B w - -").unwrap();
    let texts = move_texts(&mut position);
    assert!(
        texts.iter().all(|mv| !mv.starts_with("Rd1xd5")),
        "{:?}",
        texts
    );
}

#[test]
fn anti_circe_royal_capture_test() {
    // The rebirth square of the capturing rook is taken, but the king is attacked all the same
    let position =
        Position::<MailboxBoard, AntiCirce>::from_fen("4k2n/8/8/8/8/8/8/4K2r b - -").unwrap();
    assert!(!position.is_legal(None));
}

#[test]
fn andernach_test() {
    let mut position = Position::<MailboxBoard>::from_fen("4k3/8/8/3n4/8/8/8/3RK3 w - -")
        .unwrap()
        .with_conditions(vec![Condition::Andernach]);
    assert_has_move(&mut position, "Rd1-d2");
    let capture = find_move(&mut position, "Rd1xd5(b)");
    let guard = position.play(&capture, None);
    assert_eq!(
        guard.board().get(sq("d5")),
        Some(Piece::new(PieceKind::Rook, Color::Black))
    );
}

#[test]
fn anti_andernach_test() {
    let mut position = Position::<MailboxBoard>::from_fen("4k3/8/8/3n4/8/8/8/3RK3 w - -")
        .unwrap()
        .with_conditions(vec![Condition::AntiAndernach]);
    assert_has_move(&mut position, "Rd1-d2(b)");
    assert_has_move(&mut position, "Rd1xd5");
    assert_has_move(&mut position, "Ke1-f2");
    assert_lacks_move(&mut position, "Ke1-f2(b)");
}

#[test]
fn grasshopper_test() {
    let mut position = grid_position::<Orthodox>(&[
        ("e2", PieceKind::King, Color::White),
        ("a1", PieceKind::Grasshopper, Color::White),
        ("e8", PieceKind::King, Color::Black),
        ("a4", PieceKind::Pawn, Color::Black),
    ]);
    let hops: Vec<String> = move_texts(&mut position)
        .into_iter()
        .filter(|mv| mv.starts_with('G'))
        .collect();
    assert_eq!(hops, vec!["Ga1-a5"]);
}

#[test]
fn nightrider_test() {
    let mut position = grid_position::<Orthodox>(&[
        ("e1", PieceKind::King, Color::White),
        ("a1", PieceKind::Nightrider, Color::White),
        ("e8", PieceKind::King, Color::Black),
    ]);
    let mut rides: Vec<String> = move_texts(&mut position)
        .into_iter()
        .filter(|mv| mv.starts_with("NR"))
        .collect();
    rides.sort();
    assert_eq!(
        rides,
        vec!["NRa1-b3", "NRa1-c2", "NRa1-c5", "NRa1-d7", "NRa1-e3", "NRa1-g4"]
    );
}

#[test]
fn amazon_test() {
    let mut position = grid_position::<Orthodox>(&[
        ("a1", PieceKind::King, Color::White),
        ("d4", PieceKind::Amazon, Color::White),
        ("h7", PieceKind::King, Color::Black),
    ]);
    assert_has_move(&mut position, "AMd4-e6");
    assert_has_move(&mut position, "AMd4-d8");
    assert_has_move(&mut position, "AMd4-h8");
}

#[cfg(test)]
mod fairy_tests;
#[cfg(test)]
mod problem_tests;
#[cfg(test)]
mod solution_tests;

#[cfg(test)]
use crate::position::board::Board;
#[cfg(test)]
use crate::position::factory::MoveFactory;
#[cfg(test)]
use crate::position::notation::Language;
#[cfg(test)]
use crate::position::square::Square;
#[cfg(test)]
use crate::position::Position;

#[cfg(test)]
fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

/// English text of every legal move, without check markers.
#[cfg(test)]
fn move_texts<B: Board, F: MoveFactory>(position: &mut Position<B, F>) -> Vec<String> {
    let moves = position.legal_moves();
    moves
        .iter()
        .map(|mv| position.pre_write(mv, Language::English))
        .collect()
}

#[cfg(test)]
fn assert_has_move<B: Board, F: MoveFactory>(position: &mut Position<B, F>, text: &str) {
    let texts = move_texts(position);
    assert!(
        texts.iter().any(|mv| mv == text),
        "Move {} was not among legal moves {:?} on board\n{}",
        text,
        texts,
        position
    );
}

#[cfg(test)]
fn assert_lacks_move<B: Board, F: MoveFactory>(position: &mut Position<B, F>, text: &str) {
    let texts = move_texts(position);
    assert!(
        texts.iter().all(|mv| mv != text),
        "Move {} was unexpectedly legal on board\n{}",
        text,
        position
    );
}

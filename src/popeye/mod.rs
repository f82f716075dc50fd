//! Problem descriptions, in the Popeye input language or as EPD lines,
//! converted into solvable tasks.
//!
//! A description is parsed into an intermediate model first. The model is then validated and
//! converted into a [`Task`], which picks the board representation and the rules for the position.

use std::collections::BTreeMap;

use board_game_traits::Color;
use log::debug;

use crate::position::board::{Board, GridBoard, MailboxBoard};
use crate::position::condition::Condition;
use crate::position::factory::{AntiCirce, Circe, MoveFactory, Orthodox};
use crate::position::notation::Language;
use crate::position::piece::{Piece, PieceKind};
use crate::position::reserve::Reserve;
use crate::position::square::{Square, SquareSet};
use crate::position::state::State;
use crate::position::Position;
use crate::problem::{
    Aim, AnalysisOptions, BattleProblem, Directmate, DisplayOptions, HelpProblem, MateSearch,
    Perft, Problem, Selfmate, Task,
};

mod epd;
mod keywords;

use keywords::{Command, Directive, Keyword, Opt, Rule};

/// Parses every problem in `input`. Input that starts with a begin-problem keyword is read as
/// Popeye descriptions, anything else as EPD lines.
pub fn parse_tasks(input: &str) -> Result<Vec<Task>, pgn_traits::Error> {
    let mut tokens = Tokens::new(input);
    let language = tokens.peek().and_then(|token| {
        Language::ALL
            .into_iter()
            .find(|language| Directive::parse(*language, token) == Some(Directive::BeginProblem))
    });
    let descriptions = match language {
        Some(language) => {
            tokens.next();
            parse_popeye(&mut tokens, language)?
        }
        None => epd::parse_epd(input)?,
    };
    debug!("Parsed {} problem description(s)", descriptions.len());

    descriptions
        .iter()
        .map(|description| {
            let stipulation = description.validate()?;
            description.verify(stipulation)?;
            description.to_task(stipulation)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Genre {
    Direct,
    Help,
    SelfPlay,
    MateSearch,
    Perft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Stipulation {
    genre: Genre,
    aim: Aim,
    /// Full moves, or plies for perft
    n_moves: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Options {
    try_play: bool,
    defence: u32,
    set_play: bool,
    null_moves: bool,
    white_to_play: bool,
    variation: bool,
    move_numbers: bool,
    no_threat: bool,
    en_passant: Vec<Square>,
    no_board: bool,
    no_short_variations: bool,
    half_duplex: bool,
    no_castling: Vec<Square>,
}

impl Options {
    fn apply(&mut self, option: Opt, tokens: &mut Tokens) -> Result<(), pgn_traits::Error> {
        match option {
            Opt::Try => self.try_play = true,
            Opt::Defence => self.defence = tokens.expect(parse_count)?,
            Opt::SetPlay => self.set_play = true,
            Opt::NullMoves => self.null_moves = true,
            Opt::WhiteToPlay => self.white_to_play = true,
            Opt::Variation => self.variation = true,
            Opt::MoveNumbers => self.move_numbers = true,
            Opt::NoThreat => self.no_threat = true,
            Opt::EnPassant => {
                let squares = tokens
                    .expect(|token| parse_squares(token).filter(|squares| squares.len() <= 2))?;
                self.en_passant.extend(squares);
            }
            Opt::NoBoard => self.no_board = true,
            Opt::NoShortVariations => self.no_short_variations = true,
            Opt::HalfDuplex => self.half_duplex = true,
            Opt::NoCastling => self.no_castling.extend(tokens.expect(parse_squares)?),
        }
        Ok(())
    }
}

/// One problem as written, before any semantic checks.
#[derive(Clone, Debug, PartialEq)]
struct Description {
    language: Language,
    rules: Vec<Rule>,
    options: Options,
    stipulation: Option<Stipulation>,
    /// In input order. A later piece on the same square replaces an earlier one.
    pieces: Vec<(Square, Piece)>,
}

impl Description {
    fn new(language: Language) -> Self {
        Description {
            language,
            rules: vec![],
            options: Options::default(),
            stipulation: None,
            pieces: vec![],
        }
    }

    fn placement(&self) -> BTreeMap<Square, Piece> {
        self.pieces.iter().copied().collect()
    }

    fn validate(&self) -> Result<Stipulation, pgn_traits::Error> {
        let stipulation = self.stipulation.ok_or_else(|| {
            pgn_traits::Error::new_parse_error(
                "Task conversion failure (missing stipulation).".to_string(),
            )
        })?;
        let placement = self.placement();
        for colour in [Color::White, Color::Black] {
            let kings = placement
                .values()
                .filter(|piece| **piece == Piece::new(PieceKind::King, colour))
                .count();
            let problem = match kings {
                0 => "missing",
                1 => continue,
                _ => "too many",
            };
            let plural = if kings == 0 { "king" } else { "kings" };
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Task conversion failure ({} {} {}).",
                problem,
                colour_name(colour),
                plural
            )));
        }
        Ok(stipulation)
    }

    /// Rejects options that the solver cannot honour.
    fn verify(&self, stipulation: Stipulation) -> Result<(), pgn_traits::Error> {
        let rejected = |option: String| -> Result<(), pgn_traits::Error> {
            Err(pgn_traits::Error::new_parse_error(format!(
                "Task creation failure (not accepted option: {}).",
                option
            )))
        };
        if let Some(square) = self
            .options
            .no_castling
            .iter()
            .find(|square| ![0, 4, 7].contains(&square.file()) || ![0, 7].contains(&square.rank()))
        {
            return rejected(format!("nocastling {}", square));
        }

        let mut en_passant = self.options.en_passant.clone();
        if !en_passant.is_empty() && self.options.set_play {
            return rejected("enpassant w/ setplay".to_string());
        }
        en_passant.sort();
        en_passant.dedup();
        if en_passant.len() > 1 {
            return rejected("multiple enpassant".to_string());
        }
        if let Some(square) = en_passant.first() {
            if !self.en_passant_is_consistent(*square, stipulation) {
                return rejected(format!("enpassant {}", square));
            }
        }

        if self.rules.contains(&Rule::NoCapture) {
            return Err(pgn_traits::Error::new_parse_error(
                "Task creation failure (not accepted condition: nocapture).".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a pawn can just have double-stepped across `square`.
    fn en_passant_is_consistent(&self, square: Square, stipulation: Stipulation) -> bool {
        let (mover, origin_rank, stop_rank) = match square.rank() {
            2 => (Color::White, 1, 3),
            5 => (Color::Black, 6, 4),
            _ => return false,
        };
        let placement = self.placement();
        let file = square.file();
        !placement.contains_key(&square)
            && !placement.contains_key(&Square::from_file_rank(file, origin_rank))
            && placement.get(&Square::from_file_rank(file, stop_rank))
                == Some(&Piece::new(PieceKind::Pawn, mover))
            && self.side_to_move(stipulation) == !mover
    }

    fn side_to_move(&self, stipulation: Stipulation) -> Color {
        let black = match stipulation.genre {
            Genre::Help => self.options.half_duplex == self.options.white_to_play,
            _ => self.options.half_duplex,
        };
        if black {
            Color::Black
        } else {
            Color::White
        }
    }

    /// The most moves `colour` can make in the solution, which bounds its promotions.
    fn max_moves(&self, colour: Color, stipulation: Stipulation) -> usize {
        let n = stipulation.n_moves as usize;
        let first_mover = (colour == Color::White) == self.options.half_duplex;
        let shorter = match stipulation.genre {
            Genre::Direct | Genre::MateSearch => first_mover,
            Genre::Help => self.options.white_to_play && first_mover,
            Genre::SelfPlay => false,
            Genre::Perft => return (n + 1) / 2,
        };
        if shorter {
            n
        } else {
            n + 1
        }
    }

    fn reserve(&self, stipulation: Stipulation) -> Reserve {
        let placement = self.placement();
        let promotions = |colour| {
            let pawns = placement
                .values()
                .filter(|piece| **piece == Piece::new(PieceKind::Pawn, colour))
                .count();
            pawns.min(self.max_moves(colour, stipulation))
        };
        Reserve::with_promotions(promotions(Color::White), promotions(Color::Black))
    }

    fn state(&self) -> State {
        let castlings: SquareSet = ["e1", "a1", "h1", "e8", "a8", "h8"]
            .into_iter()
            .filter_map(|name| name.parse::<Square>().ok())
            .filter(|square| !self.options.no_castling.contains(square))
            .collect();
        State::new(castlings, self.options.en_passant.first().copied())
    }

    fn analysis_options(&self, stipulation: Stipulation) -> AnalysisOptions {
        let options = &self.options;
        match stipulation.genre {
            Genre::Direct | Genre::SelfPlay => AnalysisOptions::default()
                .add_set_play(options.set_play)
                .add_refutations(options.defence.max(u32::from(options.try_play)))
                .add_variations(options.variation)
                .add_threats(options.variation && !options.no_threat)
                .add_short_variations(options.variation && !options.no_short_variations),
            Genre::Help => AnalysisOptions::default()
                .add_set_play(options.set_play)
                .add_tempo_tries(options.null_moves || options.try_play),
            Genre::MateSearch | Genre::Perft => AnalysisOptions::default(),
        }
    }

    fn to_task(&self, stipulation: Stipulation) -> Result<Task, pgn_traits::Error> {
        let fairy_pieces = self.pieces.iter().any(|(_, piece)| piece.kind().is_fairy());
        let circe = self.rules.contains(&Rule::Circe);
        let anti_circe = self.rules.contains(&Rule::AntiCirce);
        let problem = match (fairy_pieces, circe, anti_circe) {
            (_, true, true) => {
                return Err(pgn_traits::Error::new_parse_error(
                    "Task creation failure (not accepted condition: circe w/ anticirce)."
                        .to_string(),
                ))
            }
            (false, false, false) => self.problem::<MailboxBoard, Orthodox>(stipulation),
            (false, true, false) => self.problem::<MailboxBoard, Circe>(stipulation),
            (false, false, true) => self.problem::<MailboxBoard, AntiCirce>(stipulation),
            (true, false, false) => self.problem::<GridBoard, Orthodox>(stipulation),
            (true, true, false) => self.problem::<GridBoard, Circe>(stipulation),
            (true, false, true) => self.problem::<GridBoard, AntiCirce>(stipulation),
        };
        debug!("Created {}", problem.describe());

        let display = DisplayOptions::default()
            .add_language(self.language)
            .add_internal_board(!self.options.no_board)
            .add_progress_log(self.options.move_numbers);
        Ok(Task {
            problem,
            analysis: self.analysis_options(stipulation),
            display,
        })
    }

    fn problem<B: Board + 'static, F: MoveFactory + 'static>(
        &self,
        stipulation: Stipulation,
    ) -> Box<dyn Problem> {
        let mut board = B::default();
        for (square, piece) in self.placement() {
            board.put(square, piece);
        }
        let conditions = self
            .rules
            .iter()
            .filter_map(|rule| match rule {
                Rule::Andernach => Some(Condition::Andernach),
                Rule::AntiAndernach => Some(Condition::AntiAndernach),
                _ => None,
            })
            .collect();
        let position = Position::<B, F>::new(
            board,
            self.reserve(stipulation),
            self.state(),
            self.side_to_move(stipulation),
        )
        .with_conditions(conditions);

        let aim = stipulation.aim;
        let n_moves = stipulation.n_moves as i32;
        match stipulation.genre {
            Genre::Direct => Box::new(BattleProblem::<Directmate, B, F>::new(
                position, aim, n_moves,
            )),
            Genre::SelfPlay => Box::new(BattleProblem::<Selfmate, B, F>::new(
                position, aim, n_moves,
            )),
            Genre::Help if self.options.white_to_play => {
                Box::new(HelpProblem::new(position, aim, n_moves - 1, true))
            }
            Genre::Help => Box::new(HelpProblem::new(position, aim, n_moves, false)),
            Genre::MateSearch => Box::new(MateSearch::new(position, n_moves)),
            Genre::Perft => Box::new(Perft::new(
                position,
                stipulation.n_moves / 2,
                stipulation.n_moves % 2 == 1,
            )),
        }
    }
}

fn colour_name(colour: Color) -> &'static str {
    match colour {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn parse_popeye(
    tokens: &mut Tokens,
    language: Language,
) -> Result<Vec<Description>, pgn_traits::Error> {
    let mut descriptions = vec![];
    loop {
        let mut description = Description::new(language);
        while let Some(command) = tokens.next_if(|token| Command::parse(language, token)) {
            match command {
                Command::Remark => tokens.skip_line(),
                Command::Condition => {
                    description
                        .rules
                        .push(tokens.expect(|token| Rule::parse(language, token))?);
                    while let Some(rule) = tokens.next_if(|token| Rule::parse(language, token)) {
                        description.rules.push(rule);
                    }
                }
                Command::Option => {
                    let mut option = tokens.expect(|token| Opt::parse(language, token))?;
                    loop {
                        description.options.apply(option, tokens)?;
                        match tokens.next_if(|token| Opt::parse(language, token)) {
                            Some(next) => option = next,
                            None => break,
                        }
                    }
                }
                Command::Stipulation => {
                    description.stipulation = Some(tokens.expect(parse_stipulation)?);
                }
                Command::Pieces => {
                    let mut colour = tokens.expect(|token| Color::parse(language, token))?;
                    loop {
                        let (kind, squares) =
                            tokens.expect(|token| parse_piece_group(language, token))?;
                        description.add_pieces(kind, colour, squares);
                        while let Some((kind, squares)) =
                            tokens.next_if(|token| parse_piece_group(language, token))
                        {
                            description.add_pieces(kind, colour, squares);
                        }
                        match tokens.next_if(|token| Color::parse(language, token)) {
                            Some(next) => colour = next,
                            None => break,
                        }
                    }
                }
            }
        }

        let directive = tokens.expect(|token| {
            Directive::parse(language, token)
                .filter(|directive| *directive != Directive::BeginProblem)
        })?;
        descriptions.push(description);
        if directive == Directive::EndProblem {
            return Ok(descriptions);
        }
    }
}

impl Description {
    fn add_pieces(&mut self, kind: PieceKind, colour: Color, squares: Vec<Square>) {
        self.pieces.extend(
            squares
                .into_iter()
                .map(|square| (square, Piece::new(kind, colour))),
        );
    }
}

/// A positive decimal number without leading zeros.
fn parse_count(token: &str) -> Option<u32> {
    if token.starts_with('0') || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// One or more squares written back to back, such as `e1h1a1`.
fn parse_squares(token: &str) -> Option<Vec<Square>> {
    if token.is_empty() || !token.is_ascii() || token.len() % 2 != 0 {
        return None;
    }
    (0..token.len())
        .step_by(2)
        .map(|i| token[i..i + 2].parse().ok())
        .collect()
}

/// A piece code followed by its squares, such as `Ke1` or `Pa2b2`.
fn parse_piece_group(language: Language, token: &str) -> Option<(PieceKind, Vec<Square>)> {
    PieceKind::ALL.into_iter().find_map(|kind| {
        let code = language.piece_symbol(kind);
        let prefix = token.get(..code.len())?;
        if !prefix.eq_ignore_ascii_case(code) {
            return None;
        }
        parse_squares(&token[code.len()..]).map(|squares| (kind, squares))
    })
}

/// `#2`, `h=3`, `s#4` and the like.
fn parse_stipulation(token: &str) -> Option<Stipulation> {
    let (genre, rest) = match token.chars().next()?.to_ascii_lowercase() {
        'h' => (Genre::Help, &token[1..]),
        's' => (Genre::SelfPlay, &token[1..]),
        _ => (Genre::Direct, token),
    };
    let aim = match rest.chars().next()? {
        '#' => Aim::Mate,
        '=' => Aim::Stalemate,
        _ => return None,
    };
    let n_moves = parse_count(&rest[1..])?;
    Some(Stipulation {
        genre,
        aim,
        n_moves,
    })
}

/// Whitespace-separated tokens, remembering the last one taken for error messages.
struct Tokens<'a> {
    input: &'a str,
    last: Option<&'a str>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Tokens { input, last: None }
    }

    fn skip_whitespaces(&mut self) {
        self.input = self.input.trim_start_matches(char::is_whitespace);
    }

    fn peek(&self) -> Option<&'a str> {
        self.input.split_whitespace().next()
    }

    fn next(&mut self) -> Option<&'a str> {
        self.skip_whitespaces();
        let end = self
            .input
            .find(char::is_whitespace)
            .unwrap_or(self.input.len());
        if end == 0 {
            return None;
        }
        let (token, rest) = self.input.split_at(end);
        self.input = rest;
        self.last = Some(token);
        Some(token)
    }

    /// Drops the rest of the current line.
    fn skip_line(&mut self) {
        self.input = match self.input.find('\n') {
            Some(i) => &self.input[i + 1..],
            None => "",
        };
    }

    /// Takes the next token if `parse` accepts it.
    fn next_if<T>(&mut self, parse: impl FnOnce(&'a str) -> Option<T>) -> Option<T> {
        let value = parse(self.peek()?)?;
        self.next();
        Some(value)
    }

    fn expect<T>(
        &mut self,
        parse: impl FnOnce(&'a str) -> Option<T>,
    ) -> Result<T, pgn_traits::Error> {
        self.next_if(parse).ok_or_else(|| self.failure())
    }

    fn failure(&self) -> pgn_traits::Error {
        let reason = match self.last {
            Some(token) => format!("last valid token: \"{}\"", token),
            None => "unsupported format".to_string(),
        };
        pgn_traits::Error::new_parse_error(format!("Parse failure ({}).", reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stipulation_test() {
        assert_eq!(
            parse_stipulation("h#3"),
            Some(Stipulation {
                genre: Genre::Help,
                aim: Aim::Mate,
                n_moves: 3
            })
        );
        assert_eq!(
            parse_stipulation("S=12").map(|stipulation| stipulation.genre),
            Some(Genre::SelfPlay)
        );
        assert_eq!(parse_stipulation("#0"), None);
        assert_eq!(parse_stipulation("#"), None);
        assert_eq!(parse_stipulation("x#2"), None);
    }

    #[test]
    fn parse_piece_group_test() {
        let (kind, squares) = parse_piece_group(Language::English, "NRa1h8").unwrap();
        assert_eq!(kind, PieceKind::Nightrider);
        assert_eq!(squares.len(), 2);
        assert_eq!(
            parse_piece_group(Language::English, "Nb1").map(|(kind, _)| kind),
            Some(PieceKind::Knight)
        );
        assert_eq!(
            parse_piece_group(Language::German, "Le4").map(|(kind, _)| kind),
            Some(PieceKind::Bishop)
        );
        assert_eq!(parse_piece_group(Language::English, "Ke"), None);
        assert_eq!(parse_piece_group(Language::English, "K"), None);
    }

    #[test]
    fn tokens_test() {
        let mut tokens = Tokens::new("  Remark anything goes\n  Stipulation #2 ");
        assert_eq!(tokens.next(), Some("Remark"));
        tokens.skip_line();
        assert_eq!(tokens.peek(), Some("Stipulation"));
        assert_eq!(tokens.next(), Some("Stipulation"));
        assert_eq!(tokens.next(), Some("#2"));
        assert_eq!(tokens.next(), None);
        assert_eq!(
            tokens.failure().to_string(),
            pgn_traits::Error::new_parse_error(
                "Parse failure (last valid token: \"#2\").".to_string()
            )
            .to_string()
        );
    }
}

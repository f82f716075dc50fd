//! Keyword tables of the problem description language, in each input language.

use board_game_traits::Color;

use crate::position::notation::Language;

/// A family of keywords that are recognized case-insensitively, one spelling per language.
pub(crate) trait Keyword: Copy + 'static {
    const ALL: &'static [Self];

    fn name(self, language: Language) -> &'static str;

    fn parse(language: Language, token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|keyword| keyword.name(language).eq_ignore_ascii_case(token))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Directive {
    BeginProblem,
    EndProblem,
    NextProblem,
}

impl Keyword for Directive {
    const ALL: &'static [Self] = &[
        Directive::BeginProblem,
        Directive::EndProblem,
        Directive::NextProblem,
    ];

    fn name(self, language: Language) -> &'static str {
        use Language::*;
        match (self, language) {
            (Directive::BeginProblem, English) => "BeginProblem",
            (Directive::BeginProblem, French) => "DebutProbleme",
            (Directive::BeginProblem, German) => "AnfangProblem",
            (Directive::EndProblem, English) => "EndProblem",
            (Directive::EndProblem, French) => "FinProbleme",
            (Directive::EndProblem, German) => "EndeProblem",
            (Directive::NextProblem, English) => "NextProblem",
            (Directive::NextProblem, French) => "ASuivre",
            (Directive::NextProblem, German) => "WeiteresProblem",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Remark,
    Condition,
    Option,
    Stipulation,
    Pieces,
}

impl Keyword for Command {
    const ALL: &'static [Self] = &[
        Command::Remark,
        Command::Condition,
        Command::Option,
        Command::Stipulation,
        Command::Pieces,
    ];

    fn name(self, language: Language) -> &'static str {
        use Language::*;
        match (self, language) {
            (Command::Remark, English) => "Remark",
            (Command::Remark, French) => "Remarque",
            (Command::Remark, German) => "Bemerkung",
            (Command::Condition, German) => "Bedingung",
            (Command::Condition, _) => "Condition",
            (Command::Option, _) => "Option",
            (Command::Stipulation, English) => "Stipulation",
            (Command::Stipulation, French) => "Enonce",
            (Command::Stipulation, German) => "Forderung",
            (Command::Pieces, German) => "Steine",
            (Command::Pieces, _) => "Pieces",
        }
    }
}

/// Fairy conditions. `NoCapture` is recognized so that it can be rejected with a clear message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rule {
    Circe,
    AntiCirce,
    Andernach,
    AntiAndernach,
    NoCapture,
}

impl Keyword for Rule {
    const ALL: &'static [Self] = &[
        Rule::Circe,
        Rule::AntiCirce,
        Rule::Andernach,
        Rule::AntiAndernach,
        Rule::NoCapture,
    ];

    fn name(self, language: Language) -> &'static str {
        use Language::*;
        match (self, language) {
            (Rule::Circe, _) => "Circe",
            (Rule::AntiCirce, _) => "AntiCirce",
            (Rule::Andernach, English) => "AndernachChess",
            (Rule::Andernach, French) => "EchecsAndernach",
            (Rule::Andernach, German) => "AndernachSchach",
            (Rule::AntiAndernach, English) => "AntiAndernachChess",
            (Rule::AntiAndernach, French) => "EchecsAntiAndernach",
            (Rule::AntiAndernach, German) => "AntiAndernachSchach",
            (Rule::NoCapture, English) => "NoCapture",
            (Rule::NoCapture, French) => "SansPrises",
            (Rule::NoCapture, German) => "Ohneschlag",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Opt {
    Try,
    Defence,
    SetPlay,
    NullMoves,
    WhiteToPlay,
    Variation,
    MoveNumbers,
    NoThreat,
    EnPassant,
    NoBoard,
    NoShortVariations,
    HalfDuplex,
    NoCastling,
}

impl Keyword for Opt {
    const ALL: &'static [Self] = &[
        Opt::Try,
        Opt::Defence,
        Opt::SetPlay,
        Opt::NullMoves,
        Opt::WhiteToPlay,
        Opt::Variation,
        Opt::MoveNumbers,
        Opt::NoThreat,
        Opt::EnPassant,
        Opt::NoBoard,
        Opt::NoShortVariations,
        Opt::HalfDuplex,
        Opt::NoCastling,
    ];

    fn name(self, language: Language) -> &'static str {
        use Language::*;
        match (self, language) {
            (Opt::Try, English) => "Try",
            (Opt::Try, French) => "Essais",
            (Opt::Try, German) => "Verfuehrung",
            (Opt::Defence, English) => "Defence",
            (Opt::Defence, French) => "Defense",
            (Opt::Defence, German) => "Widerlegung",
            (Opt::SetPlay, English) => "SetPlay",
            (Opt::SetPlay, French) => "Apparent",
            (Opt::SetPlay, German) => "Satzspiel",
            (Opt::NullMoves, English) => "NullMoves",
            (Opt::NullMoves, French) => "CoupsVides",
            (Opt::NullMoves, German) => "NullZuege",
            (Opt::WhiteToPlay, English) => "WhiteToPlay",
            (Opt::WhiteToPlay, French) => "ApparentSeul",
            (Opt::WhiteToPlay, German) => "WeissBeginnt",
            (Opt::Variation, English) => "Variation",
            (Opt::Variation, French) => "Variantes",
            (Opt::Variation, German) => "Varianten",
            (Opt::MoveNumbers, English) => "MoveNumbers",
            (Opt::MoveNumbers, French) => "Trace",
            (Opt::MoveNumbers, German) => "Zugnummern",
            (Opt::NoThreat, English) => "NoThreat",
            (Opt::NoThreat, French) => "SansMenace",
            (Opt::NoThreat, German) => "OhneDrohung",
            (Opt::EnPassant, _) => "EnPassant",
            (Opt::NoBoard, English) => "NoBoard",
            (Opt::NoBoard, French) => "SansEchiquier",
            (Opt::NoBoard, German) => "OhneBrett",
            (Opt::NoShortVariations, English) => "NoShortVariations",
            (Opt::NoShortVariations, French) => "SansVariantesCourtes",
            (Opt::NoShortVariations, German) => "OhneKurzVarianten",
            (Opt::HalfDuplex, English) => "HalfDuplex",
            (Opt::HalfDuplex, French) => "DemiDuplex",
            (Opt::HalfDuplex, German) => "HalbDuplex",
            (Opt::NoCastling, English) => "NoCastling",
            (Opt::NoCastling, French) => "SansRoquer",
            (Opt::NoCastling, German) => "KeineRochade",
        }
    }
}

impl Keyword for Color {
    const ALL: &'static [Self] = &[Color::White, Color::Black];

    fn name(self, language: Language) -> &'static str {
        use Language::*;
        match (self, language) {
            (Color::White, English) => "White",
            (Color::White, French) => "Blanc",
            (Color::White, German) => "Weiss",
            (Color::Black, English) => "Black",
            (Color::Black, French) => "Noir",
            (Color::Black, German) => "Schwarz",
        }
    }
}

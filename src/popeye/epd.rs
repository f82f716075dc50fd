//! Extended Position Description lines: a Forsyth placement, side to move, castling rights and
//! en passant square, followed by `dm <n>;` (mate search) or `acd <n>;` (perft) operations.

use crate::position::notation::Language;
use crate::position::piece::Piece;
use crate::position::square::Square;
use crate::problem::Aim;

use super::{parse_count, Description, Genre, Stipulation};

pub(super) fn parse_epd(input: &str) -> Result<Vec<Description>, pgn_traits::Error> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            parse_line(line).ok_or_else(|| {
                pgn_traits::Error::new_parse_error(format!(
                    "Parse failure (invalid line: \"{}\").",
                    line
                ))
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<Description> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 5 {
        return None;
    }
    let mut description = Description::new(Language::English);
    parse_placement(words[0], &mut description)?;

    match words[1] {
        "w" => (),
        "b" => description.options.half_duplex = true,
        _ => return None,
    }

    let castling = words[2];
    if castling == "-" {
        for name in ["h1", "a1", "e1", "h8", "a8", "e8"] {
            description.options.no_castling.push(name.parse().ok()?);
        }
    } else {
        if !is_castling_field(castling) {
            return None;
        }
        for (king_side, queen_side, rank) in [('K', 'Q', '1'), ('k', 'q', '8')] {
            let has_king_side = castling.contains(king_side);
            let has_queen_side = castling.contains(queen_side);
            for (file, has_right) in [
                ('h', has_king_side),
                ('a', has_queen_side),
                ('e', has_king_side || has_queen_side),
            ] {
                if !has_right {
                    description
                        .options
                        .no_castling
                        .push(format!("{}{}", file, rank).parse().ok()?);
                }
            }
        }
    }

    match words[3] {
        "-" => (),
        en_passant => {
            let square: Square = en_passant.parse().ok()?;
            let lowercase = en_passant.bytes().all(|byte| !byte.is_ascii_uppercase());
            if ![2, 5].contains(&square.rank()) || !lowercase {
                return None;
            }
            description.options.en_passant.push(square);
        }
    }

    let operations = words[4..].join(" ");
    description.stipulation = operations
        .split(';')
        .find_map(|operation| parse_operation(operation.trim()));
    if description.stipulation.is_none() {
        return None;
    }
    Some(description)
}

/// `K?Q?k?q?`, not empty.
fn is_castling_field(field: &str) -> bool {
    let mut rest = "KQkq";
    for c in field.chars() {
        match rest.find(c) {
            Some(i) => rest = &rest[i + 1..],
            None => return false,
        }
    }
    !field.is_empty()
}

fn parse_operation(operation: &str) -> Option<Stipulation> {
    let mut words = operation.split_whitespace();
    let genre = match words.next()? {
        "dm" => Genre::MateSearch,
        "acd" => Genre::Perft,
        _ => return None,
    };
    let n_moves = parse_count(words.next()?)?;
    if words.next().is_some() {
        return None;
    }
    Some(Stipulation {
        genre,
        aim: Aim::Mate,
        n_moves,
    })
}

fn parse_placement(placement: &str, description: &mut Description) -> Option<()> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return None;
    }
    for (row, row_str) in rows.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0;
        let mut after_digit = false;
        for c in row_str.chars() {
            if let Some(skip) = c.to_digit(10).filter(|skip| (1..=8).contains(skip)) {
                if after_digit {
                    return None;
                }
                file += skip as u8;
                after_digit = true;
            } else {
                let piece = Piece::from_fen_char(c)?;
                if file >= 8 {
                    return None;
                }
                description
                    .pieces
                    .push((Square::from_file_rank(file, rank), piece));
                file += 1;
                after_digit = false;
            }
        }
        if file != 8 {
            return None;
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_field_test() {
        assert!(is_castling_field("KQkq"));
        assert!(is_castling_field("Kq"));
        assert!(!is_castling_field("QK"));
        assert!(!is_castling_field("KK"));
        assert!(!is_castling_field(""));
    }

    #[test]
    fn parse_line_test() {
        let description =
            parse_line("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Kq - acd 3;").unwrap();
        assert!(description.options.half_duplex);
        assert_eq!(description.pieces.len(), 32);
        let no_castling: Vec<String> = description
            .options
            .no_castling
            .iter()
            .map(|square| square.to_string())
            .collect();
        assert_eq!(no_castling, vec!["a1", "h8"]);
        assert_eq!(
            description.stipulation,
            Some(Stipulation {
                genre: Genre::Perft,
                aim: Aim::Mate,
                n_moves: 3
            })
        );
    }

    #[test]
    fn invalid_lines_test() {
        assert!(parse_line("8/8/8/8/8/8/8 w - - dm 2;").is_none());
        assert!(parse_line("4k3/8/8/8/8/8/8/4K3 x - - dm 2;").is_none());
        assert!(parse_line("4k3/8/8/8/8/8/8/4K3 w - - id \"x\";").is_none());
        assert!(parse_line("4k3/8/8/8/8/8/8/44K w - - dm 2;").is_none());
        assert!(parse_line("4k3/8/8/8/8/8/8/4K3 w - e4 dm 2;").is_none());
    }
}

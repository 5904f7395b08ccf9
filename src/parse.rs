//! Flat-string and 2D-array puzzle encodings
//!
//! A grid is encoded as one character per cell in row-major order: `.` or
//! `0` for an empty cell, `1`-`9` for values 1 to 9 and `A`-`P` for values
//! 10 to 25. The array encoding is a list of rows of integers with 0 for
//! empty.

use crate::collections::Square;
use crate::error::Error;
use crate::puzzle::{Value, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Character for each cell value, in value order
pub const CELL_VALUES: &str = "123456789ABCDEFGHIJKLMNOP";

const EMPTY_CHAR: char = '.';

/// Converts one cell character to its value; `.` and `0` are empty
pub fn char_to_value(c: char) -> Result<Option<Value>, Error> {
    if c == '.' || c == '0' {
        return Ok(None);
    }
    match CELL_VALUES.find(c) {
        Some(i) => Ok(Some(i as Value + 1)),
        None => Err(Error::MalformedGrid(format!("invalid cell character {:?}", c))),
    }
}

/// Converts a cell value back to its character representation
pub fn value_to_char(value: Option<Value>) -> char {
    match value {
        None => EMPTY_CHAR,
        Some(v) => CELL_VALUES.as_bytes()[(v - 1) as usize] as char,
    }
}

/// Parses a flat puzzle string into rows of optional cell values
///
/// Trailing whitespace is stripped. The remaining length must be a square
/// number and the implied grid size must be within the supported range.
pub fn parse_grid(s: &str) -> Result<Vec<Vec<Option<Value>>>, Error> {
    let s = s.trim_end();
    let len = s.chars().count();
    let size = (len as f64).sqrt() as usize;
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(Error::size_out_of_range(size));
    }
    if size * size != len {
        return Err(Error::MalformedGrid(format!(
            "puzzle string is not a {size}x{size} square (len={len})",
            size = size,
            len = len,
        )));
    }

    let mut rows = vec![Vec::with_capacity(size); size];
    for (i, c) in s.chars().enumerate() {
        let value = char_to_value(c)?;
        if let Some(v) = value {
            if v > size as Value {
                return Err(Error::OutOfRange {
                    value: v,
                    min: 1,
                    max: size as Value,
                });
            }
        }
        rows[i / size].push(value);
    }
    Ok(rows)
}

/// Converts the array encoding (0 = empty) to rows of optional cell values
///
/// Every row must have the same length as the number of rows.
pub fn grid_from_array(rows: &[Vec<Value>]) -> Result<Vec<Vec<Option<Value>>>, Error> {
    let size = rows.len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != size {
            return Err(Error::MalformedGrid(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                size
            )));
        }
    }
    Ok(rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v == 0 { None } else { Some(v) })
                .collect()
        })
        .collect())
}

/// Serializes a grid to the flat string encoding, row-major
pub fn write_grid(cells: &Square<Option<Value>>) -> String {
    cells.iter().map(|&v| value_to_char(v)).collect()
}

/// Counts the starting clues in a flat puzzle string
pub fn count_clues(s: &str) -> usize {
    s.trim_end()
        .chars()
        .filter(|&c| c != '.' && c != '0')
        .count()
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use crate::collections::Square;

    use super::*;

    #[test]
    fn char_round_trip() {
        for (i, c) in CELL_VALUES.chars().enumerate() {
            let value = i as Value + 1;
            assert_eq!(Ok(Some(value)), char_to_value(c).map_err(|_| ()));
            assert_eq!(c, value_to_char(Some(value)));
        }
        assert_eq!(Ok(None), char_to_value('.').map_err(|_| ()));
        assert_eq!(Ok(None), char_to_value('0').map_err(|_| ()));
        assert_eq!('.', value_to_char(None));
    }

    #[test]
    fn invalid_character() {
        assert!(matches!(char_to_value('x'), Err(Error::MalformedGrid(_))));
    }

    #[test]
    fn parse_4x4() {
        let rows = parse_grid("12..34..........").unwrap();
        assert_eq!(4, rows.len());
        assert_eq!(vec![Some(1), Some(2), None, None], rows[0]);
        assert_eq!(vec![Some(3), Some(4), None, None], rows[1]);
    }

    #[test]
    fn parse_strips_trailing_whitespace() {
        assert!(parse_grid("1.\n.2\n").is_err());
        let rows = parse_grid("1..2\n").unwrap();
        assert_eq!(2, rows.len());
    }

    #[test]
    fn parse_rejects_non_square() {
        assert!(matches!(parse_grid("12345"), Err(Error::MalformedGrid(_))));
    }

    #[test]
    fn parse_rejects_size_zero() {
        assert!(matches!(parse_grid(""), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn parse_rejects_value_beyond_size() {
        // a 4 does not fit in a 2x2 grid
        assert!(matches!(parse_grid("4..."), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn string_round_trip() {
        let s = "12..34..........";
        let rows = parse_grid(s).unwrap();
        let cells = Square::try_from(rows.concat()).unwrap();
        assert_eq!(s, write_grid(&cells));
    }

    #[test]
    fn array_rejects_ragged_rows() {
        let rows = vec![vec![1, 2], vec![3]];
        assert!(matches!(
            grid_from_array(&rows),
            Err(Error::MalformedGrid(_))
        ));
    }

    #[test]
    fn clue_count() {
        assert_eq!(0, count_clues("...."));
        assert_eq!(2, count_clues("1.2."));
        assert_eq!(2, count_clues("1020"));
    }
}

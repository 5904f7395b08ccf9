use log::debug;
use vec_map::VecMap;

use crate::puzzle::{CellId, Puzzle, Value};

use super::{PropagationSolver, SolveStrategy};

/// Direct inference rules applied to exhaustion before any search
///
/// Three rules run in a fixed-point loop: naked singles, hidden singles
/// and line-box reduction ("two out of three"). If they stall short of a
/// solution the solver falls back to [`PropagationSolver`], unless the
/// fallback is disabled.
#[derive(Debug)]
pub struct DeductiveSolver {
    use_search: bool,
    fallback: PropagationSolver,
}

impl Default for DeductiveSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone)]
enum Axis {
    Row,
    Col,
}

impl DeductiveSolver {
    pub fn new() -> Self {
        Self {
            use_search: true,
            fallback: PropagationSolver::new(),
        }
    }

    /// A solver that reports failure instead of falling back to search
    pub fn without_search() -> Self {
        Self {
            use_search: false,
            fallback: PropagationSolver::new(),
        }
    }
}

impl SolveStrategy for DeductiveSolver {
    fn solve(&mut self, puzzle: &mut Puzzle) -> bool {
        if puzzle.is_solved() {
            return true;
        }
        loop {
            let committed =
                naked_singles(puzzle) + hidden_singles(puzzle) + line_box_reduction(puzzle);
            debug!("deduction pass committed {} cells", committed);
            if committed == 0 {
                break;
            }
        }
        if puzzle.is_solved() {
            true
        } else if self.use_search {
            debug!("deduction stalled, falling back to search");
            self.fallback.solve(puzzle)
        } else {
            false
        }
    }
}

/// Commits every empty cell whose allowed set has exactly one member
///
/// Repeats until a full pass commits nothing; returns the total count.
fn naked_singles(puzzle: &mut Puzzle) -> usize {
    let mut total = 0;
    loop {
        let mut committed = 0;
        for id in 0..puzzle.cell_count() {
            if puzzle.value(id).is_some() {
                continue;
            }
            if let Some(value) = puzzle.allowed_values_cell(id).single_value() {
                if puzzle.set_cell(id, value).is_ok() {
                    committed += 1;
                }
            }
        }
        if committed == 0 {
            return total;
        }
        total += committed;
    }
}

/// For each region and missing value, commits the value when exactly one
/// empty cell of the region can hold it
fn hidden_singles(puzzle: &mut Puzzle) -> usize {
    let mut total = 0;
    loop {
        let mut committed = 0;
        for index in 0..puzzle.width() {
            let row = line_cells(puzzle, Axis::Row, index);
            committed += hidden_singles_in(puzzle, row);
            let col = line_cells(puzzle, Axis::Col, index);
            committed += hidden_singles_in(puzzle, col);
        }
        if puzzle.box_size().is_some() {
            for index in 0..puzzle.width() {
                let cells = puzzle.box_cells(index);
                committed += hidden_singles_in(puzzle, cells);
            }
        }
        if committed == 0 {
            return total;
        }
        total += committed;
    }
}

fn hidden_singles_in(puzzle: &mut Puzzle, region: Vec<CellId>) -> usize {
    let mut missing = puzzle.complete_set();
    for &id in &region {
        if let Some(value) = puzzle.value(id) {
            missing.remove(value);
        }
    }
    let missing: Vec<Value> = missing.iter().collect();
    let mut committed = 0;
    for value in missing {
        let mut candidates = region
            .iter()
            .filter(|&&id| {
                puzzle.value(id).is_none() && puzzle.allowed_values_cell(id).contains(value)
            })
            .copied();
        let only = match (candidates.next(), candidates.next()) {
            (Some(id), None) => id,
            _ => continue,
        };
        drop(candidates);
        if puzzle.set_cell(only, value).is_ok() {
            committed += 1;
        }
    }
    committed
}

/// Line-box reduction over bands of `box_size` parallel lines
///
/// A value placed in all but one line of a band must land in the
/// remaining line, inside the one box not yet holding it; when that
/// intersection leaves a single candidate cell, the value is committed.
fn line_box_reduction(puzzle: &mut Puzzle) -> usize {
    let box_size = match puzzle.box_size() {
        Some(box_size) if box_size > 1 => box_size,
        _ => return 0,
    };
    let mut total = 0;
    loop {
        let committed = reduce_bands(puzzle, Axis::Row, box_size)
            + reduce_bands(puzzle, Axis::Col, box_size);
        if committed == 0 {
            return total;
        }
        total += committed;
    }
}

fn reduce_bands(puzzle: &mut Puzzle, axis: Axis, box_size: usize) -> usize {
    let width = puzzle.width();
    let mut committed = 0;
    for band in (0..width).step_by(box_size) {
        // occurrence counts of each placed value across the band's lines
        let mut counts: VecMap<usize> = VecMap::with_capacity(width + 1);
        for line in band..band + box_size {
            for value in line_values(puzzle, axis, line) {
                *counts.entry(value as usize).or_insert(0) += 1;
            }
        }
        let frequent: Vec<Value> = counts
            .iter()
            .filter(|&(_, &count)| count == box_size - 1)
            .map(|(value, _)| value as Value)
            .collect();
        for value in frequent {
            // the one line of the band missing the value, and the one box
            // slot not yet holding it
            let mut lines: Vec<usize> = (band..band + box_size).collect();
            let mut slots: Vec<usize> = (0..box_size).collect();
            for line in band..band + box_size {
                let mut found = false;
                for cross in 0..width {
                    if puzzle.value(cell_at(width, axis, line, cross)) == Some(value) {
                        found = true;
                        slots.retain(|&slot| slot != cross / box_size);
                    }
                }
                if found {
                    lines.retain(|&l| l != line);
                }
            }
            let (line, slot) = match (&lines[..], &slots[..]) {
                (&[line], &[slot]) => (line, slot),
                _ => continue,
            };
            let mut candidates = (slot * box_size..(slot + 1) * box_size)
                .map(|cross| cell_at(width, axis, line, cross))
                .filter(|&id| {
                    puzzle.value(id).is_none() && puzzle.allowed_values_cell(id).contains(value)
                });
            let only = match (candidates.next(), candidates.next()) {
                (Some(id), None) => id,
                _ => continue,
            };
            drop(candidates);
            if puzzle.set_cell(only, value).is_ok() {
                committed += 1;
            }
        }
    }
    committed
}

fn line_cells(puzzle: &Puzzle, axis: Axis, index: usize) -> Vec<CellId> {
    let width = puzzle.width();
    (0..width)
        .map(|cross| cell_at(width, axis, index, cross))
        .collect()
}

fn line_values(puzzle: &Puzzle, axis: Axis, index: usize) -> Vec<Value> {
    match axis {
        Axis::Row => puzzle.row_values(index),
        Axis::Col => puzzle.col_values(index),
    }
}

fn cell_at(width: usize, axis: Axis, line: usize, cross: usize) -> CellId {
    match axis {
        Axis::Row => line * width + cross,
        Axis::Col => cross * width + line,
    }
}

#[cfg(test)]
mod tests {
    use crate::collections::square::Coord;
    use crate::puzzle::Puzzle;
    use crate::solve::SolveStrategy;

    use super::{
        hidden_singles, line_box_reduction, naked_singles, DeductiveSolver,
    };

    #[test]
    fn naked_single_commits_last_value_in_row() {
        let mut puzzle = Puzzle::latin_from_str("123.............").unwrap();
        assert!(naked_singles(&mut puzzle) >= 1);
        assert_eq!(Some(4), puzzle.get(Coord::new(3, 0)));
    }

    #[test]
    fn hidden_single_in_row() {
        // 1 cannot go in columns 0-2 of row 0, so it must go in column 3
        let mut puzzle = Puzzle::sudoku_from_str("....1....1....1.").unwrap();
        assert!(hidden_singles(&mut puzzle) >= 1);
        assert_eq!(Some(1), puzzle.get(Coord::new(3, 0)));
    }

    #[test]
    fn line_box_reduction_places_third_occurrence() {
        let mut puzzle = Puzzle::sudoku(9).unwrap();
        puzzle.set(Coord::new(0, 0), 5).unwrap();
        puzzle.set(Coord::new(3, 1), 5).unwrap();
        puzzle.set(Coord::new(6, 4), 5).unwrap();
        puzzle.set(Coord::new(7, 7), 5).unwrap();
        // row 2 must take its 5 in the right-hand box, and columns 6 and 7
        // are blocked, leaving only column 8
        assert!(line_box_reduction(&mut puzzle) >= 1);
        assert_eq!(Some(5), puzzle.get(Coord::new(8, 2)));
    }

    #[test]
    fn without_search_reports_failure() {
        // an empty grid gives the rules nothing to conclude
        let mut puzzle = Puzzle::sudoku(9).unwrap();
        let mut solver = DeductiveSolver::without_search();
        assert!(!solver.solve(&mut puzzle));
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn falls_back_to_search() {
        let mut puzzle = Puzzle::sudoku(4).unwrap();
        let mut solver = DeductiveSolver::new();
        assert!(solver.solve(&mut puzzle));
        assert!(puzzle.is_solved());
    }
}

//! Solving by reduction to Boolean satisfiability
//!
//! The grid is translated to CNF over one variable per (cell, digit) and
//! handed to an external exact SAT engine in a single blocking call. This
//! is the one solver that ignores the incremental candidate state: the
//! encoding depends solely on the exported non-empty cells.

use std::convert::TryFrom;

use itertools::Itertools;
use log::{debug, info};
use splr::Certificate;

use crate::puzzle::{CellId, Puzzle, Value};
use crate::{HashMap, HashSet};

use super::SolveStrategy;

#[derive(Debug, Default)]
pub struct SatSolver;

impl SatSolver {
    pub fn new() -> Self {
        SatSolver
    }
}

impl SolveStrategy for SatSolver {
    fn solve(&mut self, puzzle: &mut Puzzle) -> bool {
        if puzzle.is_solved() {
            return true;
        }
        let clauses = encode(puzzle);
        debug!("encoded {} clauses", clauses.len());
        let model = match solve_cnf(clauses) {
            Some(model) => model,
            // unsatisfiable or unknown, a normal failure
            None => return false,
        };
        let truths: HashSet<i32> = model.into_iter().filter(|&literal| literal > 0).collect();

        let width = puzzle.width();
        let mut decoded: HashMap<CellId, Value> = HashMap::default();
        for id in puzzle.empty_cells() {
            let coord = puzzle.coord_at(id);
            let value = (1..=width as Value)
                .find(|&digit| truths.contains(&var(width, coord.row(), coord.col(), digit)));
            let value = match value {
                Some(value) => value,
                None => return false,
            };
            decoded.insert(id, value);
        }
        for (id, value) in decoded {
            if puzzle.set_cell(id, value).is_err() {
                return false;
            }
        }
        puzzle.is_solved()
    }
}

/// The variable asserting that the cell at (`row`, `col`) holds `digit`
///
/// Rows and columns are zero-based; variables run from 1 to `width`^3.
fn var(width: usize, row: usize, col: usize, digit: Value) -> i32 {
    (width * width * row + width * col) as i32 + digit
}

/// Emits the clause set for the puzzle's placement constraints
fn encode(puzzle: &Puzzle) -> Vec<Vec<i32>> {
    let width = puzzle.width();
    let digits = || 1..=width as Value;
    let mut clauses: Vec<Vec<i32>> = Vec::new();

    for row in 0..width {
        for col in 0..width {
            // each cell has at least one value
            clauses.push(digits().map(|d| var(width, row, col, d)).collect());
            // and at most one
            for (d, e) in digits().tuple_combinations() {
                clauses.push(vec![-var(width, row, col, d), -var(width, row, col, e)]);
            }
        }
    }

    // each row and column has each value at most once
    for i in 0..width {
        let row: Vec<CellId> = (0..width).map(|col| i * width + col).collect();
        exclude_pairs(&mut clauses, puzzle, &row);
        let col: Vec<CellId> = (0..width).map(|row| row * width + i).collect();
        exclude_pairs(&mut clauses, puzzle, &col);
    }

    // and so does each box
    if puzzle.box_size().is_some() {
        for index in 0..width {
            let cells = puzzle.box_cells(index);
            exclude_pairs(&mut clauses, puzzle, &cells);
        }
    }

    // each cage picks one admissible arrangement of a possibility tuple;
    // selector variables are numbered after the cell variables
    if let Some((cages, _)) = puzzle.cages() {
        let mut next_selector = (width * width * width) as i32 + 1;
        for cage in cages {
            let mut selectors = Vec::new();
            let mut seen: HashSet<Vec<Value>> = HashSet::default();
            for tuple in cage.possibilities() {
                for arrangement in tuple.iter().copied().permutations(tuple.len()) {
                    if !seen.insert(arrangement.clone()) {
                        continue;
                    }
                    let selector = next_selector;
                    next_selector += 1;
                    for (&cell, &value) in cage.cells().iter().zip(&arrangement) {
                        let coord = puzzle.coord_at(cell);
                        clauses.push(vec![
                            -selector,
                            var(width, coord.row(), coord.col(), value),
                        ]);
                    }
                    selectors.push(selector);
                }
            }
            clauses.push(selectors);
        }
    }

    // one unit clause per existing clue
    for id in 0..puzzle.cell_count() {
        if let Some(value) = puzzle.value(id) {
            let coord = puzzle.coord_at(id);
            clauses.push(vec![var(width, coord.row(), coord.col(), value)]);
        }
    }

    clauses
}

/// No two cells of a region may share a value
fn exclude_pairs(clauses: &mut Vec<Vec<i32>>, puzzle: &Puzzle, cells: &[CellId]) {
    let width = puzzle.width();
    for (&a, &b) in cells.iter().tuple_combinations() {
        let ca = puzzle.coord_at(a);
        let cb = puzzle.coord_at(b);
        for d in 1..=width as Value {
            clauses.push(vec![
                -var(width, ca.row(), ca.col(), d),
                -var(width, cb.row(), cb.col(), d),
            ]);
        }
    }
}

/// The external SAT engine boundary: clauses in, satisfied literals out
///
/// Called exactly once per solve; an unsatisfiable or unknown outcome is
/// reported as `None`, never retried.
fn solve_cnf(clauses: Vec<Vec<i32>>) -> Option<Vec<i32>> {
    match Certificate::try_from(clauses) {
        Ok(Certificate::SAT(model)) => Some(model),
        Ok(Certificate::UNSAT) => None,
        Err(e) => {
            info!("sat engine returned no model: {}", e);
            None
        }
    }
}

use log::debug;

use crate::puzzle::{CellId, Puzzle};

use super::SolveStrategy;

/// Backtracking search ordered by minimum remaining values
///
/// The same recursion as [`BacktrackingSolver`](super::BacktrackingSolver),
/// except each level branches on a cell with the fewest candidates (ties
/// broken by scan order). Every committed value narrows neighboring
/// candidate sets through the puzzle's incremental constraint updates, so
/// the choice is recomputed from fresh counts at every depth.
#[derive(Debug, Default)]
pub struct PropagationSolver {
    max_depth: u32,
    backtrack_count: u64,
}

impl PropagationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The deepest recursion level reached by the last `solve`
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// The number of guesses undone during the last `solve`
    pub fn backtrack_count(&self) -> u64 {
        self.backtrack_count
    }

    fn search(&mut self, puzzle: &mut Puzzle, depth: u32) -> bool {
        if depth > self.max_depth {
            self.max_depth = depth;
        }
        let cell = match best_empty_cell(puzzle) {
            Some(cell) => cell,
            None => return true,
        };
        for value in puzzle.allowed_values_cell(cell).iter() {
            if puzzle.set_cell(cell, value).is_err() {
                continue;
            }
            debug!(
                "guessing {} at {:?} (depth={})",
                value,
                puzzle.coord_at(cell),
                depth
            );
            if self.search(puzzle, depth + 1) {
                return true;
            }
            puzzle.clear_cell(cell);
            self.backtrack_count += 1;
        }
        false
    }
}

/// An empty cell with the fewest candidates, first in scan order on ties
fn best_empty_cell(puzzle: &Puzzle) -> Option<CellId> {
    puzzle
        .empty_cells()
        .min_by_key(|&id| puzzle.allowed_values_cell(id).len())
}

impl SolveStrategy for PropagationSolver {
    fn solve(&mut self, puzzle: &mut Puzzle) -> bool {
        self.max_depth = 0;
        self.backtrack_count = 0;
        if puzzle.is_solved() {
            return true;
        }
        self.search(puzzle, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::collections::square::Coord;
    use crate::puzzle::Puzzle;
    use crate::solve::SolveStrategy;

    use super::{best_empty_cell, PropagationSolver};

    #[test]
    fn best_cell_has_fewest_candidates() {
        let mut puzzle = Puzzle::latin(4).unwrap();
        puzzle.set(Coord::new(0, 0), 1).unwrap();
        puzzle.set(Coord::new(1, 0), 2).unwrap();
        puzzle.set(Coord::new(2, 0), 3).unwrap();
        // (3, 0) is the only cell down to one candidate
        assert_eq!(Some(3), best_empty_cell(&puzzle));
    }

    #[test]
    fn ties_break_in_scan_order() {
        let puzzle = Puzzle::latin(4).unwrap();
        assert_eq!(Some(0), best_empty_cell(&puzzle));
    }

    #[test]
    fn solves_sudoku() {
        let mut puzzle = Puzzle::sudoku_from_str("12.4.4122.4343.1").unwrap();
        let mut solver = PropagationSolver::new();
        assert!(solver.solve(&mut puzzle));
        assert!(puzzle.is_solved());
    }
}

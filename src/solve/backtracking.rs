use log::debug;

use crate::puzzle::Puzzle;

use super::SolveStrategy;

/// Depth-first search over the first empty cell in scan order
///
/// The deliberately naive baseline the smarter solvers are validated
/// against: cells are taken row-major, candidate values ascending, with
/// no ordering heuristic. Recursion depth is bounded by the number of
/// empty cells, at most 625 on the largest supported grid.
#[derive(Debug, Default)]
pub struct BacktrackingSolver {
    max_depth: u32,
    backtrack_count: u64,
}

impl BacktrackingSolver {
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
        let cell = match puzzle.first_empty_cell() {
            Some(cell) => cell,
            None => return true,
        };
        for value in puzzle.allowed_values_cell(cell).iter() {
            if puzzle.set_cell(cell, value).is_err() {
                // completing a cage off its target prunes this branch
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

impl SolveStrategy for BacktrackingSolver {
    fn solve(&mut self, puzzle: &mut Puzzle) -> bool {
        self.max_depth = 0;
        self.backtrack_count = 0;
        if puzzle.is_solved() {
            return true;
        }
        self.search(puzzle, 0)
    }
}

//! The solver suite
//!
//! Four strategies of increasing sophistication, all operating in place
//! on one puzzle. A solver returning `false` means "could not solve" and
//! is a normal outcome, not an error; callers wanting to keep the
//! original puzzle clone it before solving.

pub use self::backtracking::BacktrackingSolver;
pub use self::deductive::DeductiveSolver;
pub use self::propagation::PropagationSolver;
pub use self::sat::SatSolver;

mod backtracking;
mod deductive;
mod propagation;
mod sat;

use enum_dispatch::enum_dispatch;

use crate::puzzle::Puzzle;

/// A solving strategy
#[enum_dispatch]
pub trait SolveStrategy {
    /// Attempts to solve the puzzle in place; returns whether it ended solved
    fn solve(&mut self, puzzle: &mut Puzzle) -> bool;
}

/// The closed set of solver strategies, statically dispatched
#[enum_dispatch(SolveStrategy)]
pub enum Solver {
    Backtracking(BacktrackingSolver),
    Propagation(PropagationSolver),
    Deductive(DeductiveSolver),
    Sat(SatSolver),
}

impl Solver {
    pub const NAMES: [&'static str; 4] = ["backtracking", "propagation", "deductive", "sat"];

    /// Looks up a strategy by name, as used on the command line
    pub fn from_name(name: &str) -> Option<Solver> {
        let solver = match name {
            "backtracking" => BacktrackingSolver::new().into(),
            "propagation" => PropagationSolver::new().into(),
            "deductive" => DeductiveSolver::new().into(),
            "sat" => SatSolver::new().into(),
            _ => return None,
        };
        Some(solver)
    }
}

impl Default for Solver {
    fn default() -> Self {
        PropagationSolver::new().into()
    }
}

#[cfg(test)]
mod tests {
    use super::Solver;

    #[test]
    fn from_name() {
        for name in &Solver::NAMES {
            assert!(Solver::from_name(name).is_some());
        }
        assert!(Solver::from_name("bogosort").is_none());
    }
}

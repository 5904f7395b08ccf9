use anyhow::Result;

use doku::collections::square::Coord;
use doku::error::Error;
use doku::parse;
use doku::puzzle::Puzzle;
use doku::samples;
use doku::solve::{DeductiveSolver, SolveStrategy, Solver};

const KIDS_PUZZLE: &str =
    "89.4...5614.35..9.......8..9.....2...8.965.4...1.....5..8.......3..21.7842...6.13";
const KIDS_SOLUTION: &str =
    "893472156146358792275619834954183267782965341361247985518734629639521478427896513";

#[test]
fn every_solver_finds_the_unique_solution() -> Result<()> {
    for name in &Solver::NAMES {
        let mut puzzle = Puzzle::sudoku_from_str(KIDS_PUZZLE)?;
        let mut solver = Solver::from_name(name).unwrap();
        assert!(solver.solve(&mut puzzle), "solver {} failed", name);
        assert!(puzzle.is_solved(), "solver {} left an unsolved grid", name);
        assert_eq!(KIDS_SOLUTION, puzzle.grid_string(), "solver {}", name);
    }
    Ok(())
}

#[test]
fn starting_clue_count() -> Result<()> {
    let puzzle = Puzzle::sudoku_from_str(KIDS_PUZZLE)?;
    assert_eq!(31, parse::count_clues(KIDS_PUZZLE));
    assert_eq!(31, puzzle.clue_count());
    Ok(())
}

#[test]
fn deductive_rules_alone_solve_the_kids_puzzle() -> Result<()> {
    let mut puzzle = Puzzle::sudoku_from_str(KIDS_PUZZLE)?;
    let mut solver = DeductiveSolver::without_search();
    assert!(solver.solve(&mut puzzle));
    assert_eq!(KIDS_SOLUTION, puzzle.grid_string());
    Ok(())
}

#[test]
fn conflicting_clues_fail_loudly() {
    // same puzzle with the 9 in the first row changed to a second 8
    let bad =
        "88.4...5614.35..9.......8..9.....2...8.965.4...1.....5..8.......3..21.7842...6.13";
    let result = Puzzle::sudoku_from_str(bad);
    assert!(matches!(result, Err(Error::ConstraintViolation { .. })));
}

#[test]
fn unsolvable_puzzle_is_a_normal_false() -> Result<()> {
    // (3, 0) can hold nothing: 1, 2, 3 in its row and 4 in its column
    for name in &Solver::NAMES {
        let mut puzzle = Puzzle::latin_from_str("123....4........")?;
        let mut solver = Solver::from_name(name).unwrap();
        assert!(!solver.solve(&mut puzzle), "solver {}", name);
    }
    Ok(())
}

#[test]
fn solvers_agree_on_unique_solution_fixtures() -> Result<()> {
    for label in &["SMH 2", "KTH 1", "SMH 3"] {
        let sample = samples::find(label).unwrap();
        let mut solutions = Vec::new();
        for name in &["propagation", "deductive", "sat"] {
            let mut puzzle = Puzzle::sudoku_from_str(sample.puzzle)?;
            let mut solver = Solver::from_name(name).unwrap();
            assert!(solver.solve(&mut puzzle), "{} on {}", name, label);
            solutions.push(puzzle.grid_string());
        }
        assert!(
            solutions.windows(2).all(|pair| pair[0] == pair[1]),
            "solvers disagree on {}",
            label
        );
    }
    Ok(())
}

#[test]
fn round_trip_for_all_samples() -> Result<()> {
    for sample in samples::SAMPLE_SUDOKUS.iter() {
        let puzzle = Puzzle::sudoku_from_str(sample.puzzle)?;
        assert_eq!(sample.puzzle, puzzle.grid_string(), "{}", sample.label);
        assert_eq!(81, puzzle.grid_string().len());
    }
    Ok(())
}

#[test]
fn smallest_and_largest_grids() -> Result<()> {
    let mut tiny = Puzzle::latin_from_str(".")?;
    let mut solver = Solver::from_name("backtracking").unwrap();
    assert!(solver.solve(&mut tiny));
    assert_eq!("1", tiny.grid_string());

    let large = Puzzle::latin(25)?;
    assert_eq!(625, large.grid_string().len());
    let round_trip = Puzzle::latin_from_str(&large.grid_string())?;
    assert_eq!(large.grid_string(), round_trip.grid_string());

    assert!(Puzzle::latin(0).is_err());
    assert!(Puzzle::latin(26).is_err());
    Ok(())
}

#[test]
fn largest_grid_keeps_letter_values() -> Result<()> {
    let mut puzzle = Puzzle::latin(25)?;
    puzzle.set(Coord::new(0, 0), 25)?;
    puzzle.set(Coord::new(1, 0), 10)?;
    let s = puzzle.grid_string();
    assert!(s.starts_with("PA"));
    let round_trip = Puzzle::latin_from_str(&s)?;
    assert_eq!(Some(25), round_trip.get(Coord::new(0, 0)));
    assert_eq!(Some(10), round_trip.get(Coord::new(1, 0)));
    Ok(())
}

#[test]
fn array_and_string_encodings_agree() -> Result<()> {
    let rows = vec![
        vec![1, 2, 0, 4],
        vec![0, 4, 1, 2],
        vec![2, 0, 4, 3],
        vec![4, 3, 0, 1],
    ];
    let from_array = Puzzle::sudoku_from_array(&rows)?;
    let from_str = Puzzle::sudoku_from_str("12.4.4122.4343.1")?;
    assert_eq!(from_str.grid_string(), from_array.grid_string());
    assert_eq!(12, from_array.clue_count());
    Ok(())
}

#[test]
fn cloning_isolates_solver_runs() -> Result<()> {
    let original = Puzzle::sudoku_from_str(KIDS_PUZZLE)?;
    let mut copy = original.clone();
    let mut solver = Solver::default();
    assert!(solver.solve(&mut copy));
    assert_eq!(KIDS_PUZZLE, original.grid_string());
    assert_eq!(KIDS_SOLUTION, copy.grid_string());
    Ok(())
}

#[test]
fn writing_an_allowed_value_never_invalidates() -> Result<()> {
    let mut puzzle = Puzzle::sudoku_from_str(KIDS_PUZZLE)?;
    let empty: Vec<_> = puzzle.empty_cells().collect();
    for id in empty {
        let coord = puzzle.coord_at(id);
        for value in puzzle.allowed_values(coord).iter().collect::<Vec<_>>() {
            puzzle.set(coord, value)?;
            assert!(puzzle.is_valid());
            puzzle.clear(coord);
        }
    }
    Ok(())
}

#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

use std::fs;

use anyhow::{anyhow, Result};
use log::info;

use doku::puzzle::Puzzle;
use doku::samples;
use doku::solve::{SolveStrategy, Solver};

use crate::options::{Kind, Options, Source};

mod options;

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from_args()?;
    let text = read_source(&options)?;
    let mut puzzle = match options.kind() {
        Kind::Latin => Puzzle::latin_from_str(&text)?,
        Kind::Sudoku => Puzzle::sudoku_from_str(&text)?,
    };
    println!("{}", puzzle);
    println!(
        "{}x{} puzzle, {} clues",
        puzzle.width(),
        puzzle.width(),
        puzzle.clue_count()
    );

    let mut solver = Solver::from_name(options.solver())
        .ok_or_else(|| anyhow!("unknown solver {}", options.solver()))?;
    info!("solving with {}", options.solver());
    if solver.solve(&mut puzzle) {
        println!("Puzzle solved");
        println!("{}", puzzle);
        println!("{}", puzzle.grid_string());
    } else {
        println!("Puzzle not solved");
    }
    Ok(())
}

fn read_source(options: &Options) -> Result<String> {
    let text = match options.source() {
        Source::File(path) => {
            println!("Reading puzzle from \"{}\"", path.display());
            fs::read_to_string(path)?
        }
        Source::Literal(s) => s.clone(),
        Source::Sample(label) => {
            let sample = samples::find(label)
                .ok_or_else(|| anyhow!("no sample named \"{}\"", label))?;
            println!("Sample \"{}\" ({})", sample.label, sample.level);
            sample.puzzle.to_string()
        }
    };
    Ok(text)
}

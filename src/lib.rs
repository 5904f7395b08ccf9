//! Solve Latin square, Sudoku and MathDoku puzzles
//!
//! A [`Puzzle`](puzzle::Puzzle) maintains, for every row, column and
//! box/cage, the set of values still placeable there, updated on every
//! write. The solvers in [`solve`] all operate on that incremental state.

#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

pub mod collections;
pub mod error;
pub mod parse;
pub mod puzzle;
pub mod samples;
pub mod solve;

pub(crate) type HashMap<K, V> = ahash::AHashMap<K, V>;
pub(crate) type HashSet<T> = ahash::AHashSet<T>;

//! Curated sample puzzles for tests and the command line
//!
//! Difficulty levels describe how hard each puzzle is for a human; the
//! backtracking solvers are largely indifferent to them.

use once_cell::sync::Lazy;

/// A sample Sudoku puzzle in the flat string encoding
pub struct Sample {
    pub label: &'static str,
    pub level: &'static str,
    pub puzzle: &'static str,
}

impl Sample {
    const fn new(label: &'static str, level: &'static str, puzzle: &'static str) -> Self {
        Self {
            label,
            level,
            puzzle,
        }
    }
}

pub static SAMPLE_SUDOKUS: Lazy<Vec<Sample>> = Lazy::new(|| {
    vec![
        Sample::new(
            "SMH 1",
            "Kids",
            "89.4...5614.35..9.......8..9.....2...8.965.4...1.....5..8.......3..21.7842...6.13",
        ),
        Sample::new(
            "SMH 2",
            "Easy",
            "7438........4.........96....5..8..6.8.47.93.......5........3..99...1.....6....782",
        ),
        Sample::new(
            "KTH 1",
            "Easy",
            "....37.9263........9...23.587......1.2.9.1.4.9......271.95...7........8636.41....",
        ),
        Sample::new(
            "Rico Alan Heart",
            "Easy",
            ".216.784.7...1...39.......23.......82.......7.9.....6...4...7.....2.1.......8....",
        ),
        Sample::new(
            "SMH 3",
            "Moderate",
            "..75.....1....98...6..1.43.8.5..2.1.......2...1.7....9..3..8..4.4.9..3..9....6.2.",
        ),
        Sample::new(
            "SMH 5",
            "Hard",
            "..8......1..6..49.5......7..7..4.....5.2.6...8..79..1..63.....1..5.73......9..75.",
        ),
        Sample::new(
            "Qassim Hamza",
            "Diabolical",
            "...7..8......4..3......9..16..5......1..3..4...5..1..75..2..6...3..8..9...7.....2",
        ),
        Sample::new(
            "AI escargot",
            "Pathological",
            "1....7.9..3..2...8..96..5....53..9...1..8...26....4...3......1..4......7..7...3..",
        ),
    ]
});

/// Finds a sample by its label
pub fn find(label: &str) -> Option<&'static Sample> {
    SAMPLE_SUDOKUS.iter().find(|sample| sample.label == label)
}

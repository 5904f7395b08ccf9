use std::fmt;
use std::fmt::Debug;

/// Coordinates of an element in a `Square`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord([usize; 2]);

impl Coord {
    pub fn new(col: usize, row: usize) -> Self {
        Self([col, row])
    }

    pub fn col(self) -> usize {
        self.0[0]
    }

    pub fn row(self) -> usize {
        self.0[1]
    }

    /// The row-major index of this coordinate in a square of the given width
    pub fn as_index(self, width: usize) -> usize {
        self.row() * width + self.col()
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col(), self.row())
    }
}

impl From<[usize; 2]> for Coord {
    fn from(array: [usize; 2]) -> Self {
        Self(array)
    }
}

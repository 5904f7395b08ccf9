//! Puzzle grids with incrementally maintained constraints
//!
//! Every write and clear updates the candidate sets of the affected row,
//! column and box in O(1); `allowed_values` is an intersection of those
//! sets, never a grid scan.

pub use self::cage::{Cage, CageSpec, Operator};
pub use self::value_set::ValueSet;

mod cage;
mod value_set;

use std::convert::TryFrom;
use std::fmt;
use std::fmt::Display;

use log::debug;
use vec_map::VecMap;

use crate::collections::square::Coord;
use crate::collections::Square;
use crate::error::Error;
use crate::parse;

pub type CageId = usize;
pub type CellId = usize;
pub type Value = i32;

pub const MIN_GRID_SIZE: usize = 1;
pub const MAX_GRID_SIZE: usize = 25;
pub const DEFAULT_GRID_SIZE: usize = 9;

/// A square puzzle grid where no value repeats in a row or column,
/// optionally constrained further by Sudoku boxes or MathDoku cages
#[derive(Clone)]
pub struct Puzzle {
    width: usize,
    cells: Square<Option<Value>>,
    empty_count: usize,
    row_candidates: Vec<ValueSet>,
    col_candidates: Vec<ValueSet>,
    regions: RegionModel,
}

/// The distinctness regions of a puzzle beyond its rows and columns
#[derive(Clone)]
enum RegionModel {
    /// A plain Latin square
    RowsCols,
    /// Sudoku: one candidate set per `box_size`-wide sub-square
    Boxes {
        box_size: usize,
        candidates: Vec<ValueSet>,
    },
    /// MathDoku: an arbitrary total partition of the grid into cages
    Cages {
        cages: Vec<Cage>,
        cage_map: Square<CageId>,
    },
}

impl Puzzle {
    /// Creates an empty Latin square puzzle
    pub fn latin(width: usize) -> Result<Self, Error> {
        Self::with_regions(width, RegionModel::RowsCols)
    }

    /// Creates an empty Sudoku puzzle; `width` must be a square number
    pub fn sudoku(width: usize) -> Result<Self, Error> {
        let box_size = (width as f64).sqrt() as usize;
        if box_size * box_size != width {
            return Err(Error::MalformedGrid(format!(
                "width {} is not a square number",
                width
            )));
        }
        Self::with_regions(
            width,
            RegionModel::Boxes {
                box_size,
                candidates: vec![ValueSet::with_all(width); width],
            },
        )
    }

    /// Creates a MathDoku puzzle from cage specs and a cell-to-cage map
    ///
    /// The map must partition the grid: every cell names a cage index in
    /// range, and every cage covers exactly its declared number of cells.
    /// Possibility tables are computed here, before any cell is written;
    /// assignment cages then seed their clues through ordinary writes.
    pub fn mathdoku(
        width: usize,
        specs: &[CageSpec],
        cage_map: &[Vec<usize>],
    ) -> Result<Self, Error> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&width) {
            return Err(Error::size_out_of_range(width));
        }
        if cage_map.len() != width {
            return Err(Error::InvalidCageConfiguration(format!(
                "cage map has {} rows, expected {}",
                cage_map.len(),
                width
            )));
        }
        for (row, map_row) in cage_map.iter().enumerate() {
            if map_row.len() != width {
                return Err(Error::InvalidCageConfiguration(format!(
                    "cage map row {} has {} cells, expected {}",
                    row,
                    map_row.len(),
                    width
                )));
            }
        }

        let mut cage_cells: VecMap<Vec<CellId>> = VecMap::with_capacity(specs.len());
        let flat: Vec<CageId> = cage_map.iter().flatten().copied().collect();
        for (id, &cage_id) in flat.iter().enumerate() {
            if cage_id >= specs.len() {
                return Err(Error::InvalidCageConfiguration(format!(
                    "cage index {} at {:?} is out of range (0..{})",
                    cage_id,
                    Coord::new(id % width, id / width),
                    specs.len()
                )));
            }
            cage_cells.entry(cage_id).or_insert_with(Vec::new).push(id);
        }

        let cages = specs
            .iter()
            .enumerate()
            .map(|(id, &spec)| {
                let cells = cage_cells.remove(id).unwrap_or_default();
                if cells.len() != spec.size {
                    return Err(Error::InvalidCageConfiguration(format!(
                        "cage {} declares {} cells but is mapped to {}",
                        id,
                        spec.size,
                        cells.len()
                    )));
                }
                Cage::new(id, spec, cells, width)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cage_map = Square::try_from(flat).expect("cage map dimensions already checked");
        let mut puzzle = Self::with_regions(width, RegionModel::Cages { cages, cage_map })?;
        puzzle.write_assign_clues()?;
        Ok(puzzle)
    }

    /// Parses a Latin square from the flat string encoding
    pub fn latin_from_str(s: &str) -> Result<Self, Error> {
        let rows = parse::parse_grid(s)?;
        let mut puzzle = Self::latin(rows.len())?;
        puzzle.replay_clues(&rows)?;
        Ok(puzzle)
    }

    /// Parses a Sudoku from the flat string encoding
    pub fn sudoku_from_str(s: &str) -> Result<Self, Error> {
        let rows = parse::parse_grid(s)?;
        let mut puzzle = Self::sudoku(rows.len())?;
        puzzle.replay_clues(&rows)?;
        Ok(puzzle)
    }

    /// Creates a Latin square from the array encoding (0 = empty)
    pub fn latin_from_array(rows: &[Vec<Value>]) -> Result<Self, Error> {
        let rows = parse::grid_from_array(rows)?;
        let mut puzzle = Self::latin(rows.len())?;
        puzzle.replay_clues(&rows)?;
        Ok(puzzle)
    }

    /// Creates a Sudoku from the array encoding (0 = empty)
    pub fn sudoku_from_array(rows: &[Vec<Value>]) -> Result<Self, Error> {
        let rows = parse::grid_from_array(rows)?;
        let mut puzzle = Self::sudoku(rows.len())?;
        puzzle.replay_clues(&rows)?;
        Ok(puzzle)
    }

    fn with_regions(width: usize, regions: RegionModel) -> Result<Self, Error> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&width) {
            return Err(Error::size_out_of_range(width));
        }
        Ok(Self {
            width,
            cells: Square::with_width(width),
            empty_count: width * width,
            row_candidates: vec![ValueSet::with_all(width); width],
            col_candidates: vec![ValueSet::with_all(width); width],
            regions,
        })
    }

    /// The width (and height) of the puzzle
    pub fn width(&self) -> usize {
        self.width
    }

    /// The highest value a cell can hold, equal to the width
    pub fn max_value(&self) -> Value {
        self.width as Value
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.width
    }

    /// The number of empty cells, maintained incrementally
    pub fn empty_count(&self) -> usize {
        self.empty_count
    }

    /// The number of non-empty cells
    pub fn clue_count(&self) -> usize {
        self.cell_count() - self.empty_count
    }

    /// The set of all values required in every row and column
    pub fn complete_set(&self) -> ValueSet {
        ValueSet::with_all(self.width)
    }

    /// The box width, if this is a Sudoku puzzle
    pub fn box_size(&self) -> Option<usize> {
        match self.regions {
            RegionModel::Boxes { box_size, .. } => Some(box_size),
            _ => None,
        }
    }

    /// The cages and cell-to-cage map, if this is a MathDoku puzzle
    pub fn cages(&self) -> Option<(&[Cage], &Square<CageId>)> {
        match &self.regions {
            RegionModel::Cages { cages, cage_map } => Some((cages, cage_map)),
            _ => None,
        }
    }

    pub fn coord_at(&self, id: CellId) -> Coord {
        self.cells.coord_at(id)
    }

    /// The value at a cell, `None` when empty
    pub fn get(&self, coord: Coord) -> Option<Value> {
        self.cells[coord]
    }

    pub fn value(&self, id: CellId) -> Option<Value> {
        self.cells[id]
    }

    pub fn is_cell_empty(&self, coord: Coord) -> bool {
        self.cells[coord].is_none()
    }

    /// Sets the cell at `coord` to `value`
    ///
    /// Setting a cell to its current value is a no-op. Any failure leaves
    /// the grid and its candidate sets unchanged.
    pub fn set(&mut self, coord: Coord, value: Value) -> Result<(), Error> {
        self.set_cell(coord.as_index(self.width), value)
    }

    pub fn set_cell(&mut self, id: CellId, value: Value) -> Result<(), Error> {
        if value < 1 || value > self.max_value() {
            return Err(Error::OutOfRange {
                value,
                min: 1,
                max: self.max_value(),
            });
        }
        if self.cells[id] == Some(value) {
            return Ok(());
        }

        // clear first so the candidate sets reflect the cell being vacant
        let prev = self.cells[id];
        if prev.is_some() {
            self.clear_cell(id);
        }

        if !self.allowed_values_cell(id).contains(value) {
            self.roll_back(id, prev);
            return Err(self.violation(id, value));
        }
        self.place(id, value);

        // the write may have completed a cage that misses its target
        if !self.cage_accepts_cell(id) {
            self.clear_cell(id);
            self.roll_back(id, prev);
            return Err(self.violation(id, value));
        }
        Ok(())
    }

    /// Clears the cell at `coord`; clearing an empty cell is a no-op
    pub fn clear(&mut self, coord: Coord) {
        self.clear_cell(coord.as_index(self.width));
    }

    pub fn clear_cell(&mut self, id: CellId) {
        let prev = match self.cells[id] {
            None => return,
            Some(v) => v,
        };
        self.cells[id] = None;
        self.empty_count += 1;
        let coord = self.cells.coord_at(id);
        self.row_candidates[coord.row()].insert(prev);
        self.col_candidates[coord.col()].insert(prev);
        if let RegionModel::Boxes {
            box_size,
            candidates,
        } = &mut self.regions
        {
            candidates[box_at(*box_size, coord)].insert(prev);
        }
    }

    /// Clears the entire puzzle grid
    pub fn clear_all(&mut self) {
        for id in 0..self.cell_count() {
            self.clear_cell(id);
        }
    }

    /// Re-initializes the grid from the array encoding (0 = empty)
    ///
    /// The existing contents are cleared and the clues replayed as
    /// ordinary writes, so a clue violating a constraint fails here.
    pub fn init_grid(&mut self, rows: &[Vec<Value>]) -> Result<(), Error> {
        if rows.len() != self.width {
            return Err(Error::MalformedGrid(format!(
                "starting grid has {} rows, expected {}",
                rows.len(),
                self.width
            )));
        }
        let rows = parse::grid_from_array(rows)?;
        self.clear_all();
        self.replay_clues(&rows)
    }

    fn replay_clues(&mut self, rows: &[Vec<Option<Value>>]) -> Result<(), Error> {
        debug_assert_eq!(rows.len(), self.width);
        for (row, row_values) in rows.iter().enumerate() {
            for (col, &value) in row_values.iter().enumerate() {
                if let Some(value) = value {
                    self.set(Coord::new(col, row), value)?;
                }
            }
        }
        Ok(())
    }

    fn write_assign_clues(&mut self) -> Result<(), Error> {
        let clues: Vec<(CellId, Value)> = match &self.regions {
            RegionModel::Cages { cages, .. } => cages
                .iter()
                .filter(|cage| cage.operator() == Operator::Assign)
                .map(|cage| (cage.cells()[0], cage.target()))
                .collect(),
            _ => Vec::new(),
        };
        for (id, value) in clues {
            self.set_cell(id, value)?;
        }
        Ok(())
    }

    /// The set of values currently placeable at `coord`
    ///
    /// A non-empty cell allows only its current value. An empty cell
    /// allows the intersection of its row, column and box candidates; in
    /// a cage the intersection is further narrowed to values appearing in
    /// the cage's possibility table.
    pub fn allowed_values(&self, coord: Coord) -> ValueSet {
        self.allowed_values_cell(coord.as_index(self.width))
    }

    pub fn allowed_values_cell(&self, id: CellId) -> ValueSet {
        if let Some(value) = self.cells[id] {
            return ValueSet::single(self.width, value);
        }
        let coord = self.cells.coord_at(id);
        let mut allowed = self.row_candidates[coord.row()].clone();
        allowed.intersect_with(&self.col_candidates[coord.col()]);
        match &self.regions {
            RegionModel::RowsCols => {}
            RegionModel::Boxes {
                box_size,
                candidates,
            } => allowed.intersect_with(&candidates[box_at(*box_size, coord)]),
            RegionModel::Cages { cages, cage_map } => {
                allowed.intersect_with(cages[cage_map[id]].value_union())
            }
        }
        allowed
    }

    /// Whether placing `value` at `coord` is currently allowed
    pub fn is_allowed(&self, coord: Coord, value: Value) -> bool {
        if self.cells[coord] == Some(value) {
            return true;
        }
        self.allowed_values(coord).contains(value)
    }

    /// The IDs of all empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_none())
            .map(|(id, _)| id)
    }

    /// The first empty cell in row-major scan order
    pub fn first_empty_cell(&self) -> Option<CellId> {
        self.empty_cells().next()
    }

    /// The non-empty values in row `row`
    pub fn row_values(&self, row: usize) -> Vec<Value> {
        (0..self.width)
            .filter_map(|col| self.cells[Coord::new(col, row)])
            .collect()
    }

    /// The non-empty values in column `col`
    pub fn col_values(&self, col: usize) -> Vec<Value> {
        (0..self.width)
            .filter_map(|row| self.cells[Coord::new(col, row)])
            .collect()
    }

    /// The cell IDs of box `index`, row-major within the box
    pub fn box_cells(&self, index: usize) -> Vec<CellId> {
        let box_size = match self.box_size() {
            Some(box_size) => box_size,
            None => return Vec::new(),
        };
        let origin = box_origin(box_size, index);
        let mut cells = Vec::with_capacity(self.width);
        for row in origin.row()..origin.row() + box_size {
            for col in origin.col()..origin.col() + box_size {
                cells.push(Coord::new(col, row).as_index(self.width));
            }
        }
        cells
    }

    /// The non-empty values in box `index`
    pub fn box_values(&self, index: usize) -> Vec<Value> {
        self.box_cells(index)
            .into_iter()
            .filter_map(|id| self.cells[id])
            .collect()
    }

    /// Checks every region constraint from scratch
    ///
    /// Writes are already gated by `allowed_values`, so this should always
    /// hold; it re-derives validity rather than trusting the incremental
    /// state. Rows, columns and boxes must hold no duplicate values, and
    /// every complete cage must evaluate to its target.
    pub fn is_valid(&self) -> bool {
        for i in 0..self.width {
            if has_duplicates(self.width, &self.row_values(i)) {
                return false;
            }
            if has_duplicates(self.width, &self.col_values(i)) {
                return false;
            }
        }
        match &self.regions {
            RegionModel::RowsCols => {}
            RegionModel::Boxes { .. } => {
                for index in 0..self.width {
                    if has_duplicates(self.width, &self.box_values(index)) {
                        return false;
                    }
                }
            }
            RegionModel::Cages { cages, .. } => {
                for cage in cages {
                    let values: Vec<Value> = cage
                        .cells()
                        .iter()
                        .filter_map(|&id| self.cells[id])
                        .collect();
                    if values.len() == cage.size() {
                        let mut values = values;
                        values.sort_unstable_by(|a, b| b.cmp(a));
                        if !cage.accepts(&values) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Whether the puzzle is completely and validly filled
    pub fn is_solved(&self) -> bool {
        self.empty_count == 0 && self.is_valid()
    }

    /// Serializes the grid to the flat string encoding
    pub fn grid_string(&self) -> String {
        parse::write_grid(&self.cells)
    }

    fn place(&mut self, id: CellId, value: Value) {
        debug_assert!(self.cells[id].is_none());
        self.cells[id] = Some(value);
        self.empty_count -= 1;
        let coord = self.cells.coord_at(id);
        self.row_candidates[coord.row()].remove(value);
        self.col_candidates[coord.col()].remove(value);
        if let RegionModel::Boxes {
            box_size,
            candidates,
        } = &mut self.regions
        {
            candidates[box_at(*box_size, coord)].remove(value);
        }
    }

    /// Restores the pre-write value after a rejected write
    fn roll_back(&mut self, id: CellId, prev: Option<Value>) {
        if let Some(prev) = prev {
            debug!(
                "write rejected at {:?}, restoring {}",
                self.cells.coord_at(id),
                prev
            );
            self.place(id, prev);
        }
    }

    /// Whether the cage containing `id` is incomplete or hits its target
    fn cage_accepts_cell(&self, id: CellId) -> bool {
        let (cages, cage_map) = match &self.regions {
            RegionModel::Cages { cages, cage_map } => (cages, cage_map),
            _ => return true,
        };
        let cage = &cages[cage_map[id]];
        let mut values = Vec::with_capacity(cage.size());
        for &cell in cage.cells() {
            match self.cells[cell] {
                Some(value) => values.push(value),
                None => return true,
            }
        }
        values.sort_unstable_by(|a, b| b.cmp(a));
        cage.accepts(&values)
    }

    fn violation(&self, id: CellId, value: Value) -> Error {
        Error::ConstraintViolation {
            coord: self.cells.coord_at(id),
            value,
        }
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            let mut first = true;
            for &value in row {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", parse::value_to_char(value))?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The box index containing `coord`
fn box_at(box_size: usize, coord: Coord) -> usize {
    (coord.row() / box_size) * box_size + coord.col() / box_size
}

/// The top-left coordinate of box `index`, inverse of `box_at`
fn box_origin(box_size: usize, index: usize) -> Coord {
    Coord::new((index % box_size) * box_size, (index / box_size) * box_size)
}

fn has_duplicates(max: usize, values: &[Value]) -> bool {
    let mut seen = ValueSet::new(max);
    values.iter().any(|&value| !seen.insert(value))
}

use itertools::Itertools;

use crate::error::Error;
use crate::puzzle::{CellId, Value};

use super::ValueSet;

/// The math operator on a cage
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Assigns the target to a single cell, seeding a starting clue
    Assign,
}

impl Operator {
    /// Retrieves the character representation of the operator
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Assign => '=',
        }
    }

    /// Retrieves an `Operator` from its corresponding symbol
    pub fn from_symbol(c: char) -> Option<Operator> {
        let operator = match c {
            '+' => Operator::Add,
            '-' => Operator::Subtract,
            '*' => Operator::Multiply,
            '/' => Operator::Divide,
            '=' => Operator::Assign,
            _ => return None,
        };
        Some(operator)
    }

    /// Applies the operator left-to-right over `values`
    ///
    /// Subtraction and division are not commutative; callers must pass
    /// values sorted in descending order, the canonical evaluation order
    /// for cage targets.
    pub(crate) fn apply(self, values: &[Value]) -> Value {
        debug_assert!(!values.is_empty());
        match self {
            Operator::Add => values.iter().sum(),
            Operator::Multiply => values.iter().product(),
            Operator::Subtract => values[1..].iter().fold(values[0], |acc, &v| acc - v),
            Operator::Divide => values[1..].iter().fold(values[0], |acc, &v| acc / v),
            Operator::Assign => values[0],
        }
    }
}

/// The boundary description of one cage: target, operator and cell count
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CageSpec {
    pub target: Value,
    pub operator: Operator,
    pub size: usize,
}

impl CageSpec {
    pub fn new(target: Value, operator: Operator, size: usize) -> Self {
        Self {
            target,
            operator,
            size,
        }
    }
}

/// A cage bound to its cells, with the precomputed possibility table
///
/// The table holds every value tuple (one value per cell, sorted
/// descending) whose operator application yields the target. It is a pure
/// function of the cage definition and never changes after construction.
#[derive(Clone, Debug)]
pub struct Cage {
    cells: Vec<CellId>,
    operator: Operator,
    target: Value,
    possibilities: Vec<Vec<Value>>,
    value_union: ValueSet,
}

impl Cage {
    pub(crate) fn new(
        id: usize,
        spec: CageSpec,
        cells: Vec<CellId>,
        max: usize,
    ) -> Result<Self, Error> {
        let CageSpec {
            target,
            operator,
            size,
        } = spec;
        if size == 0 {
            return Err(Error::InvalidCageConfiguration(format!(
                "cage {} has no cells",
                id
            )));
        }
        if target < 1 {
            return Err(Error::InvalidCageConfiguration(format!(
                "cage {} target {} is less than 1",
                id, target
            )));
        }
        if operator == Operator::Assign {
            if size != 1 {
                return Err(Error::InvalidCageConfiguration(format!(
                    "cage {} assigns to {} cells, assignment must be to a single cell",
                    id, size
                )));
            }
            if target > max as Value {
                return Err(Error::InvalidCageConfiguration(format!(
                    "cage {} assignment of {} is greater than {}",
                    id, target, max
                )));
            }
        }
        debug_assert_eq!(size, cells.len());

        let possibilities = possibilities(operator, target, size, max);
        if possibilities.is_empty() {
            return Err(Error::InvalidCageConfiguration(format!(
                "cage {} target {}{} cannot be reached with {} cells",
                id,
                target,
                operator.symbol(),
                size
            )));
        }
        let mut value_union = ValueSet::new(max);
        for tuple in &possibilities {
            value_union.extend(tuple.iter().copied());
        }

        Ok(Self {
            cells,
            operator,
            target,
            possibilities,
            value_union,
        })
    }

    /// The number on the cage
    pub fn target(&self) -> Value {
        self.target
    }

    /// The math operator on the cage
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The IDs of the cells in the cage, in ascending order
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Every value tuple satisfying the cage, each sorted descending
    pub fn possibilities(&self) -> &[Vec<Value>] {
        &self.possibilities
    }

    /// The union of all values appearing in any possibility tuple
    pub(crate) fn value_union(&self) -> &ValueSet {
        &self.value_union
    }

    /// Whether a complete assignment, sorted descending, hits the target
    pub(crate) fn accepts(&self, values_descending: &[Value]) -> bool {
        debug_assert_eq!(values_descending.len(), self.cells.len());
        self.operator.apply(values_descending) == self.target
    }
}

/// Enumerates the descending-sorted value tuples that satisfy a cage
fn possibilities(operator: Operator, target: Value, size: usize, max: usize) -> Vec<Vec<Value>> {
    if operator == Operator::Assign {
        return vec![vec![target]];
    }
    (1..=max as Value)
        .rev()
        .combinations_with_replacement(size)
        .filter(|tuple| operator.apply(tuple) == target)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{possibilities, Cage, CageSpec, Operator};

    #[test]
    fn operator_symbol_round_trip() {
        for &operator in &[
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
            Operator::Assign,
        ] {
            assert_eq!(Some(operator), Operator::from_symbol(operator.symbol()));
        }
        assert_eq!(None, Operator::from_symbol('x'));
    }

    #[test]
    fn apply_subtract() {
        assert_eq!(2, Operator::Subtract.apply(&[4, 2]));
        assert_eq!(2, Operator::Subtract.apply(&[3, 1]));
        assert_eq!(0, Operator::Subtract.apply(&[1, 1]));
        assert_eq!(-27, Operator::Subtract.apply(&[9, 8, 7, 6, 5, 4, 3, 2, 1]));
    }

    #[test]
    fn apply_divide() {
        assert_eq!(2, Operator::Divide.apply(&[4, 2]));
        assert_eq!(1, Operator::Divide.apply(&[4, 4]));
        assert_eq!(1, Operator::Divide.apply(&[4, 2, 2]));
        assert_eq!(3, Operator::Divide.apply(&[9, 3]));
    }

    #[test]
    fn apply_multiply() {
        assert_eq!(16, Operator::Multiply.apply(&[4, 2, 2]));
        assert_eq!(362_880, Operator::Multiply.apply(&[9, 8, 7, 6, 5, 4, 3, 2]));
    }

    // fixtures match the 4x4 cage set used by the integration tests
    #[test]
    fn possibility_tables() {
        assert_eq!(
            vec![vec![4, 4, 1], vec![4, 2, 2]],
            possibilities(Operator::Multiply, 16, 3, 4)
        );
        assert_eq!(
            vec![vec![4, 2, 1], vec![3, 3, 1], vec![3, 2, 2]],
            possibilities(Operator::Add, 7, 3, 4)
        );
        assert_eq!(
            vec![vec![4, 2], vec![3, 1]],
            possibilities(Operator::Subtract, 2, 2, 4)
        );
        assert_eq!(
            vec![vec![4, 3, 1], vec![3, 2, 2]],
            possibilities(Operator::Multiply, 12, 3, 4)
        );
        assert_eq!(
            vec![vec![4, 2], vec![2, 1]],
            possibilities(Operator::Divide, 2, 2, 4)
        );
        assert_eq!(vec![vec![4]], possibilities(Operator::Assign, 4, 1, 4));
    }

    #[test]
    fn impossible_target_rejected() {
        let spec = CageSpec::new(100, Operator::Multiply, 2);
        assert!(Cage::new(0, spec, vec![0, 1], 4).is_err());
    }

    #[test]
    fn assign_must_be_single_cell() {
        let spec = CageSpec::new(2, Operator::Assign, 2);
        assert!(Cage::new(0, spec, vec![0, 1], 4).is_err());
    }

    #[test]
    fn assign_target_must_fit_the_grid() {
        let spec = CageSpec::new(5, Operator::Assign, 1);
        assert!(Cage::new(0, spec, vec![0], 4).is_err());
        let spec = CageSpec::new(4, Operator::Assign, 1);
        assert!(Cage::new(0, spec, vec![0], 4).is_ok());
    }

    #[test]
    fn value_union_flattens_table() {
        let spec = CageSpec::new(2, Operator::Subtract, 2);
        let cage = Cage::new(0, spec, vec![0, 1], 4).unwrap();
        let values: Vec<_> = cage.value_union().iter().collect();
        assert_eq!(vec![1, 2, 3, 4], values);
    }
}

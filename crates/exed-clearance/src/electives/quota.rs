use std::collections::BTreeMap;

use super::demographics::{cells, Gender, Grade};

/// Seat ceilings for a course: one per (grade, gender) cell plus an overall
/// ceiling. The two are independent and both apply; cell capacities need not
/// sum to the total. A cell that was never given a capacity is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotMap {
    total_capacity: u32,
    cells: BTreeMap<(Grade, Gender), u32>,
}

impl SpotMap {
    pub fn new(total_capacity: u32) -> Self {
        Self {
            total_capacity,
            cells: BTreeMap::new(),
        }
    }

    /// Quota with the same capacity in all eight cells.
    pub fn uniform(total_capacity: u32, per_cell: u32) -> Self {
        cells().fold(Self::new(total_capacity), |map, (grade, gender)| {
            map.with_cell(grade, gender, per_cell)
        })
    }

    pub fn with_cell(mut self, grade: Grade, gender: Gender, capacity: u32) -> Self {
        self.cells.insert((grade, gender), capacity);
        self
    }

    pub fn total_capacity(&self) -> u32 {
        self.total_capacity
    }

    pub fn cell_capacity(&self, grade: Grade, gender: Gender) -> u32 {
        self.cells.get(&(grade, gender)).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_cells_are_closed() {
        let map = SpotMap::new(10).with_cell(Grade::Senior, Gender::Female, 3);
        assert_eq!(map.cell_capacity(Grade::Senior, Gender::Female), 3);
        assert_eq!(map.cell_capacity(Grade::Senior, Gender::Male), 0);
    }

    #[test]
    fn cell_capacities_are_independent_of_total() {
        let over = SpotMap::uniform(4, 2);
        let under = SpotMap::uniform(20, 1);
        let over_sum: u32 = cells().map(|(g, s)| over.cell_capacity(g, s)).sum();
        let under_sum: u32 = cells().map(|(g, s)| under.cell_capacity(g, s)).sum();

        assert_eq!(over.total_capacity(), 4);
        assert_eq!(over_sum, 16);
        assert_eq!(under.total_capacity(), 20);
        assert_eq!(under_sum, 8);
    }
}

// Draft slot grid: manual placement of drafted players by pick index.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Flat `rounds * teams` grid of optional player ids, indexed by pick.
///
/// Invariant: no id occupies more than one cell after `resize` or any
/// placement made through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlots {
    cells: Vec<Option<String>>,
}

impl DraftSlots {
    /// An empty grid with `total` cells.
    pub fn new(total: usize) -> Self {
        DraftSlots {
            cells: vec![None; total],
        }
    }

    /// Build a grid from raw cells, repairing duplicates.
    pub fn from_cells(cells: Vec<Option<String>>) -> Self {
        let mut slots = DraftSlots { cells };
        slots.dedupe();
        slots
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    /// The id in a cell, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.iter().any(|c| c.as_deref() == Some(id))
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Put `id` in the lowest-index empty cell. Returns the index used, or
    /// `None` if the grid is full.
    pub fn place_first_empty(&mut self, id: &str) -> Option<usize> {
        let idx = self.cells.iter().position(Option::is_none)?;
        self.cells[idx] = Some(id.to_string());
        Some(idx)
    }

    /// Empty every cell holding `id`. Returns how many were cleared.
    pub fn clear_id(&mut self, id: &str) -> usize {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if cell.as_deref() == Some(id) {
                *cell = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Empty the whole grid, keeping its size.
    pub fn clear_all(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Exchange two cells. Out-of-range indices leave the grid unchanged.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.cells.len() || b >= self.cells.len() {
            return false;
        }
        self.cells.swap(a, b);
        true
    }

    /// Resize to `total` cells, keeping contents at matching indices and
    /// dropping later duplicates.
    pub fn resize(&mut self, total: usize) {
        self.cells.resize(total, None);
        self.dedupe();
    }

    fn dedupe(&mut self) {
        let mut seen = HashSet::new();
        for cell in &mut self.cells {
            let duplicate = match cell {
                Some(id) => !seen.insert(id.clone()),
                None => false,
            };
            if duplicate {
                *cell = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|c| c.map(str::to_string)).collect()
    }

    fn assert_unique(slots: &DraftSlots) {
        let mut seen = HashSet::new();
        for id in slots.cells().iter().flatten() {
            assert!(seen.insert(id.clone()), "duplicate {id}");
        }
    }

    #[test]
    fn place_uses_lowest_empty_index() {
        let mut slots = DraftSlots::from_cells(cells(&[None, Some("y"), None]));
        assert_eq!(slots.place_first_empty("x"), Some(0));
        assert_eq!(slots.cells(), &cells(&[Some("x"), Some("y"), None])[..]);
    }

    #[test]
    fn place_into_full_grid_fails() {
        let mut slots = DraftSlots::from_cells(cells(&[Some("a")]));
        assert_eq!(slots.place_first_empty("b"), None);
        assert!(!slots.contains("b"));
    }

    #[test]
    fn clear_id_removes_every_copy() {
        let mut slots = DraftSlots {
            cells: cells(&[Some("y"), None, Some("y")]),
        };
        assert_eq!(slots.clear_id("y"), 2);
        assert_eq!(slots.filled(), 0);
    }

    #[test]
    fn swap_handles_empty_cells() {
        let mut slots = DraftSlots::from_cells(cells(&[Some("a"), None, None]));
        assert!(slots.swap(0, 2));
        assert_eq!(slots.cells(), &cells(&[None, None, Some("a")])[..]);
        assert!(slots.swap(0, 1));
        assert_eq!(slots.cells(), &cells(&[None, None, Some("a")])[..]);
        assert!(!slots.swap(0, 3));
    }

    #[test]
    fn resize_grows_with_empty_cells() {
        let mut slots = DraftSlots::from_cells(cells(&[Some("a"), None]));
        slots.resize(4);
        assert_eq!(slots.cells(), &cells(&[Some("a"), None, None, None])[..]);
    }

    #[test]
    fn resize_truncates() {
        let mut slots = DraftSlots::from_cells(cells(&[Some("a"), Some("b"), Some("c")]));
        slots.resize(2);
        assert_eq!(slots.cells(), &cells(&[Some("a"), Some("b")])[..]);
        assert!(!slots.contains("c"));
    }

    #[test]
    fn resize_drops_later_duplicates() {
        let mut slots = DraftSlots {
            cells: cells(&[Some("a"), Some("b"), Some("a"), Some("b")]),
        };
        slots.resize(3);
        assert_eq!(slots.cells(), &cells(&[Some("a"), Some("b"), None])[..]);
        assert_unique(&slots);
    }

    #[test]
    fn resize_to_zero() {
        let mut slots = DraftSlots::from_cells(cells(&[Some("a")]));
        slots.resize(0);
        assert!(slots.is_empty());
    }
}

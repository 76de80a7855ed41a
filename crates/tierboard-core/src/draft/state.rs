// Drafted-player tracking: the drafted set, its order, and slot placement.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::slots::DraftSlots;

/// Outcome of a drafted toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Marked drafted; `slot` is the cell it was placed in, or its existing
    /// cell, or `None` when the grid had no free cell.
    Drafted { slot: Option<usize> },
    /// Marked undrafted; `cleared` cells were emptied.
    Undrafted { cleared: usize },
}

/// The draft in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftState {
    drafted: HashSet<String>,
    /// Drafted ids in the order they were marked. Same members as `drafted`.
    order: Vec<String>,
    slots: DraftSlots,
}

impl DraftState {
    /// An empty draft with `total_slots` grid cells.
    pub fn new(total_slots: usize) -> Self {
        DraftState {
            drafted: HashSet::new(),
            order: Vec::new(),
            slots: DraftSlots::new(total_slots),
        }
    }

    pub fn is_drafted(&self, id: &str) -> bool {
        self.drafted.contains(id)
    }

    pub fn drafted_count(&self) -> usize {
        self.drafted.len()
    }

    /// Drafted ids in draft order.
    pub fn drafted_order(&self) -> &[String] {
        &self.order
    }

    pub fn slots(&self) -> &DraftSlots {
        &self.slots
    }

    /// Flip whether `id` is drafted.
    ///
    /// Drafting places the id in the first empty cell unless it is already
    /// slotted. Undrafting clears every cell holding it.
    pub fn toggle_drafted(&mut self, id: &str) -> ToggleOutcome {
        if self.drafted.remove(id) {
            self.order.retain(|x| x != id);
            let cleared = self.slots.clear_id(id);
            debug!(id, cleared, "player undrafted");
            return ToggleOutcome::Undrafted { cleared };
        }

        self.drafted.insert(id.to_string());
        if !self.order.iter().any(|x| x == id) {
            self.order.push(id.to_string());
        }

        let slot = match self.slots.cells().iter().position(|c| c.as_deref() == Some(id)) {
            Some(existing) => Some(existing),
            None => self.slots.place_first_empty(id),
        };
        debug!(id, ?slot, "player drafted");
        ToggleOutcome::Drafted { slot }
    }

    /// Exchange two grid cells. Drafted membership is untouched.
    pub fn swap_slots(&mut self, a: usize, b: usize) -> bool {
        self.slots.swap(a, b)
    }

    /// Resize the grid for a new `rounds * teams`. Returns false, leaving
    /// the grid as is, when the product does not fit in `usize`.
    pub fn resize(&mut self, rounds: usize, teams: usize) -> bool {
        let Some(total) = rounds.checked_mul(teams) else {
            warn!(rounds, teams, "draft grid size overflows, slots unchanged");
            return false;
        };
        if total != self.slots.len() {
            debug!(from = self.slots.len(), to = total, "resizing draft slots");
        }
        self.slots.resize(total);
        true
    }

    /// Undraft everyone and empty the grid.
    pub fn clear_all(&mut self) {
        self.drafted.clear();
        self.order.clear();
        self.slots.clear_all();
        info!("all drafted marks cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(state: &DraftState) -> Vec<Option<&str>> {
        state.slots().cells().iter().map(|c| c.as_deref()).collect()
    }

    #[test]
    fn draft_fills_lowest_empty_slot() {
        let mut state = DraftState::new(3);
        state.toggle_drafted("a");
        state.swap_slots(0, 1); // [None, a, None]
        let outcome = state.toggle_drafted("x");
        assert_eq!(outcome, ToggleOutcome::Drafted { slot: Some(0) });
        assert_eq!(cells(&state), vec![Some("x"), Some("a"), None]);
        assert_eq!(state.drafted_order(), &["a".to_string(), "x".to_string()][..]);
    }

    #[test]
    fn undraft_clears_slots_and_order() {
        let mut state = DraftState::new(3);
        state.toggle_drafted("y");
        state.toggle_drafted("z");
        let outcome = state.toggle_drafted("y");
        assert_eq!(outcome, ToggleOutcome::Undrafted { cleared: 1 });
        assert!(!state.is_drafted("y"));
        assert!(!state.slots().contains("y"));
        assert_eq!(state.drafted_order(), &["z".to_string()][..]);
    }

    #[test]
    fn draft_with_full_grid_still_marks() {
        let mut state = DraftState::new(1);
        state.toggle_drafted("a");
        let outcome = state.toggle_drafted("b");
        assert_eq!(outcome, ToggleOutcome::Drafted { slot: None });
        assert!(state.is_drafted("b"));
        assert_eq!(state.drafted_count(), 2);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut state = DraftState::new(4);
        state.toggle_drafted("a");
        state.toggle_drafted("a");
        assert_eq!(state.drafted_count(), 0);
        assert!(state.drafted_order().is_empty());
        assert_eq!(state.slots().filled(), 0);
    }

    #[test]
    fn swap_does_not_touch_drafted_set() {
        let mut state = DraftState::new(2);
        state.toggle_drafted("a");
        assert!(state.swap_slots(0, 1));
        assert!(state.is_drafted("a"));
        assert_eq!(cells(&state), vec![None, Some("a")]);
    }

    #[test]
    fn resize_keeps_and_truncates() {
        let mut state = DraftState::new(2);
        state.toggle_drafted("a");
        state.toggle_drafted("b");
        state.resize(1, 1);
        assert_eq!(cells(&state), vec![Some("a")]);
        // "b" is still marked drafted even though its cell is gone.
        assert!(state.is_drafted("b"));
        state.resize(2, 2);
        assert_eq!(state.slots().len(), 4);
    }

    #[test]
    fn resize_overflow_leaves_grid_alone() {
        let mut state = DraftState::new(2);
        state.toggle_drafted("a");
        assert!(!state.resize(usize::MAX, 2));
        assert_eq!(cells(&state), vec![Some("a"), None]);
    }

    #[test]
    fn clear_all_empties_everything() {
        let mut state = DraftState::new(3);
        state.toggle_drafted("a");
        state.toggle_drafted("b");
        state.clear_all();
        assert_eq!(state.drafted_count(), 0);
        assert!(state.drafted_order().is_empty());
        assert_eq!(state.slots().len(), 3);
        assert_eq!(state.slots().filled(), 0);
    }
}

// Drag-gesture decoding.
//
// The drag collaborator reports opaque string ids and pointer offsets. This
// module turns them into board actions without touching any state itself;
// the caller applies the resulting `DragAction`. Hover state lives only in
// the controller and is dropped on drop or cancel.

use serde::{Deserialize, Serialize};

use crate::draft::state::DraftState;
use crate::player::Position;
use crate::ranking::RankingStore;

const TIER_BAR_PREFIX: &str = "tierbar:";
const DRAFT_SLOT_PREFIX: &str = "draftslot:";

/// What a drag id refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    /// A row or board cell for a player.
    Player(String),
    /// The tier bar above `start_id` on a position tab.
    TierBar { position: Position, start_id: String },
    /// A cell on the draft board.
    DraftSlot(usize),
}

impl DragTarget {
    /// Decode a drag id. Malformed composite ids fall back to plain player
    /// ids, which then simply fail to resolve against the ranking.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix(TIER_BAR_PREFIX) {
            if let Some((pos, start_id)) = rest.split_once(':') {
                // Position tokens here are always written upper-case.
                let position = match pos {
                    "QB" | "RB" | "WR" | "TE" => Position::from_str_pos(pos),
                    _ => None,
                };
                if let Some(position) = position {
                    return DragTarget::TierBar {
                        position,
                        start_id: start_id.to_string(),
                    };
                }
            }
        }

        if let Some(rest) = raw.strip_prefix(DRAFT_SLOT_PREFIX) {
            if let Ok(index) = rest.parse::<usize>() {
                return DragTarget::DraftSlot(index);
            }
        }

        DragTarget::Player(raw.to_string())
    }

    /// Encode back to the wire form.
    pub fn to_drag_id(&self) -> String {
        match self {
            DragTarget::Player(id) => id.clone(),
            DragTarget::TierBar { position, start_id } => {
                format!("{TIER_BAR_PREFIX}{position}:{start_id}")
            }
            DragTarget::DraftSlot(i) => format!("{DRAFT_SLOT_PREFIX}{i}"),
        }
    }
}

/// A semantic operation produced by a completed drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragAction {
    MovePlayer { active_id: String, over_id: String },
    MoveTierBreak { position: Position, from_start_id: String, to_start_id: String },
    SwapDraftSlots { from: usize, to: usize },
}

/// Vertical offset of the gap above a sub-ranking row.
#[derive(Debug, Clone, PartialEq)]
pub struct TierGap {
    /// The id that would start the tier if the bar were dropped here.
    pub start_id: String,
    /// Offset of the gap in the list's scroll coordinates.
    pub top: f64,
}

/// The gap closest to `pointer_y`. Ties go to the earlier gap.
pub fn nearest_gap(gaps: &[TierGap], pointer_y: f64) -> Option<&str> {
    let mut best: Option<(&TierGap, f64)> = None;
    for gap in gaps {
        let dist = (pointer_y - gap.top).abs();
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((gap, dist)),
        }
    }
    best.map(|(gap, _)| gap.start_id.as_str())
}

/// Gesture callbacks from the drag collaborator.
pub trait DragEvents {
    /// Pointer moved while dragging `active_id`.
    fn on_drag_move(&mut self, active_id: &str, pointer_y: f64, gaps: &[TierGap]);

    /// Dragged item was dropped over `over_id` (if over anything).
    fn on_drag_end(
        &mut self,
        active_id: &str,
        over_id: Option<&str>,
        pointer_y: f64,
        gaps: &[TierGap],
    ) -> Option<DragAction>;

    /// Drag was abandoned.
    fn on_drag_cancel(&mut self);
}

/// Tracks hover state for tier-bar drags and decodes drops.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    hover_start_id: Option<String>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gap a tier bar would snap to right now.
    pub fn hover_start_id(&self) -> Option<&str> {
        self.hover_start_id.as_deref()
    }
}

impl DragEvents for DragController {
    fn on_drag_move(&mut self, active_id: &str, pointer_y: f64, gaps: &[TierGap]) {
        if let DragTarget::TierBar { .. } = DragTarget::parse(active_id) {
            self.hover_start_id = nearest_gap(gaps, pointer_y).map(str::to_string);
        }
    }

    fn on_drag_end(
        &mut self,
        active_id: &str,
        over_id: Option<&str>,
        pointer_y: f64,
        gaps: &[TierGap],
    ) -> Option<DragAction> {
        self.hover_start_id = None;

        match DragTarget::parse(active_id) {
            DragTarget::TierBar { position, start_id } => {
                let to = nearest_gap(gaps, pointer_y)?;
                if to == start_id {
                    return None;
                }
                Some(DragAction::MoveTierBreak {
                    position,
                    from_start_id: start_id,
                    to_start_id: to.to_string(),
                })
            }
            DragTarget::DraftSlot(from) => match DragTarget::parse(over_id?) {
                DragTarget::DraftSlot(to) if to != from => {
                    Some(DragAction::SwapDraftSlots { from, to })
                }
                _ => None,
            },
            DragTarget::Player(active) => {
                let over = over_id?;
                if over == active {
                    return None;
                }
                match DragTarget::parse(over) {
                    DragTarget::Player(over) => Some(DragAction::MovePlayer {
                        active_id: active,
                        over_id: over,
                    }),
                    _ => None,
                }
            }
        }
    }

    fn on_drag_cancel(&mut self) {
        self.hover_start_id = None;
    }
}

/// Gap offsets for a position tab laid out as uniform rows.
pub fn uniform_gaps(store: &RankingStore, position: Position, row_height: f64) -> Vec<TierGap> {
    store
        .tier_gap_ids(position)
        .into_iter()
        .enumerate()
        .map(|(i, start_id)| TierGap {
            start_id,
            top: (i + 1) as f64 * row_height,
        })
        .collect()
}

/// Apply a decoded drop. Returns whether any state changed.
pub fn apply_action(store: &mut RankingStore, draft: &mut DraftState, action: &DragAction) -> bool {
    match action {
        DragAction::MovePlayer { active_id, over_id } => store.move_player(active_id, over_id),
        DragAction::MoveTierBreak {
            position,
            from_start_id,
            to_start_id,
        } => {
            let before = store.tier_breaks(*position);
            store.move_tier_break(*position, from_start_id, to_start_id);
            store.tier_breaks(*position) != before
        }
        DragAction::SwapDraftSlots { from, to } => draft.swap_slots(*from, *to),
    }
}

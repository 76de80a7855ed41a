// Ranking & tier store: the overall order plus per-position tier breaks.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::directory::PlayerDirectory;
use crate::headshot::IdLookup;
use crate::player::{Player, Position};
use crate::tiers::{self, TierBreaks};

/// Which list the rankings panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Overall,
    Position(Position),
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Tab; 5] = [
        Tab::Overall,
        Tab::Position(Position::QB),
        Tab::Position(Position::RB),
        Tab::Position(Position::WR),
        Tab::Position(Position::TE),
    ];

    pub fn from_str_tab(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("overall") {
            return Some(Tab::Overall);
        }
        Position::from_str_pos(s).map(Tab::Position)
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Tab::Overall => None,
            Tab::Position(p) => Some(*p),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Overall => write!(f, "Overall"),
            Tab::Position(p) => write!(f, "{p}"),
        }
    }
}

/// The overall ranking, its tier breaks, and the directory that gives ids
/// their positions.
///
/// Invariants held after every public method returns:
/// - the ranking is a duplicate-free permutation of the directory's ids;
/// - every stored tier-break list is normalized against its sub-ranking.
#[derive(Debug, Clone)]
pub struct RankingStore {
    directory: PlayerDirectory,
    ranking: Vec<String>,
    tiers: TierBreaks,
}

impl RankingStore {
    /// Create a store from a directory and a seeded ranking.
    ///
    /// Unknown and repeated ids in `initial` are dropped; known players
    /// missing from it are appended in directory order.
    pub fn new(directory: PlayerDirectory, initial: Vec<String>) -> Self {
        let ranking = covering_ranking(&directory, initial);
        info!(players = ranking.len(), "ranking store initialized");
        RankingStore {
            directory,
            ranking,
            tiers: TierBreaks::new(),
        }
    }

    /// Create a store ranked in directory order.
    pub fn from_directory(directory: PlayerDirectory) -> Self {
        let initial = directory.default_ranking();
        Self::new(directory, initial)
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.directory
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.directory.get(id)
    }

    pub fn set_headshot_lookup(&mut self, lookup: IdLookup) {
        self.directory.set_lookup(lookup);
    }

    /// The overall ranking.
    pub fn ranking(&self) -> &[String] {
        &self.ranking
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// 0-based overall index of a player.
    pub fn overall_index(&self, id: &str) -> Option<usize> {
        self.ranking.iter().position(|r| r == id)
    }

    /// Players at `position`, in overall order. Derived on every call.
    pub fn sub_ranking(&self, position: Position) -> Vec<String> {
        self.ranking
            .iter()
            .filter(|id| self.directory.position_of(id) == Some(position))
            .cloned()
            .collect()
    }

    /// Ids shown on a tab.
    pub fn ids_for_tab(&self, tab: Tab) -> Vec<String> {
        match tab {
            Tab::Overall => self.ranking.clone(),
            Tab::Position(p) => self.sub_ranking(p),
        }
    }

    // -----------------------------------------------------------------------
    // Ranking mutations
    // -----------------------------------------------------------------------

    /// Move the id at `from` so it lands at `to`. Returns whether anything
    /// changed.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.ranking.len() || to >= self.ranking.len() {
            return false;
        }
        let id = self.ranking.remove(from);
        self.ranking.insert(to, id);
        self.repair_tiers();
        debug!(from, to, "reordered ranking");
        true
    }

    /// Drag-drop adaptor: move `active_id` to the slot held by `over_id`.
    pub fn move_player(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        match (self.overall_index(active_id), self.overall_index(over_id)) {
            (Some(from), Some(to)) => self.reorder(from, to),
            _ => false,
        }
    }

    /// Add a new player and append it to the ranking. Returns the new id.
    pub fn add_player(&mut self, name: &str, position: Position) -> Option<String> {
        let id = self.directory.add_player(name, position)?;
        self.ranking.push(id.clone());
        info!(id = %id, %position, "player added to ranking");
        Some(id)
    }

    /// Restore the default order: base roster, then added players.
    pub fn reset_ranking(&mut self) {
        self.ranking = self.directory.default_ranking();
        self.repair_tiers();
        info!("ranking reset to default order");
    }

    /// Replace the ranking and tier state wholesale (import).
    ///
    /// `players` are merged into the directory first, so the new ranking
    /// can reference them. The result is made covering and normalized.
    pub fn replace(&mut self, players: Vec<Player>, ranking: Vec<String>, tiers: TierBreaks) {
        let added = self.directory.merge_players(players);
        self.ranking = covering_ranking(&self.directory, ranking);
        self.tiers = tiers;
        self.repair_tiers();
        info!(
            players = self.ranking.len(),
            new_players = added,
            tier_breaks = self.tiers.total(),
            "ranking replaced"
        );
    }

    // -----------------------------------------------------------------------
    // Tier operations
    // -----------------------------------------------------------------------

    /// Normalized tier breaks for a position.
    pub fn tier_breaks(&self, position: Position) -> Vec<String> {
        tiers::normalize_tier_breaks(&self.sub_ranking(position), self.tiers.get(position))
    }

    /// Normalized tier breaks for every position.
    pub fn all_tier_breaks(&self) -> TierBreaks {
        let mut out = TierBreaks::new();
        for pos in Position::ALL {
            out.set(pos, self.tier_breaks(pos));
        }
        out
    }

    /// Append a tier break after the current last one.
    pub fn add_tier(&mut self, position: Position) -> bool {
        let sub = self.sub_ranking(position);
        let mut current = tiers::normalize_tier_breaks(&sub, self.tiers.get(position));
        let before = current.len();

        let Some(start) = tiers::next_tier_start(&sub, &current) else {
            return false;
        };
        current.push(start);
        let next = tiers::normalize_tier_breaks(&sub, &current);
        let changed = next.len() != before;
        self.tiers.set(position, next);
        changed
    }

    /// Drop the last tier break. Returns whether one existed.
    pub fn remove_last_tier(&mut self, position: Position) -> bool {
        let mut current = self.tier_breaks(position);
        let removed = current.pop().is_some();
        self.tiers.set(position, current);
        removed
    }

    /// Move the break starting at `from_start_id` so it starts at
    /// `to_start_id`. Moving onto an existing break merges the two.
    pub fn move_tier_break(&mut self, position: Position, from_start_id: &str, to_start_id: &str) {
        let sub = self.sub_ranking(position);
        let mut next: Vec<String> = tiers::normalize_tier_breaks(&sub, self.tiers.get(position))
            .into_iter()
            .filter(|id| id != from_start_id)
            .collect();
        next.push(to_start_id.to_string());
        self.tiers.set(position, tiers::normalize_tier_breaks(&sub, &next));
        debug!(%position, from = from_start_id, to = to_start_id, "moved tier break");
    }

    /// Tier number of a player within `position`.
    pub fn tier_number(&self, position: Position, id: &str) -> Option<u32> {
        tiers::tier_number(&self.sub_ranking(position), self.tiers.get(position), id)
    }

    /// Tier number of a player within its own position.
    pub fn tier_of(&self, id: &str) -> Option<u32> {
        let position = self.directory.position_of(id)?;
        self.tier_number(position, id)
    }

    /// A position's sub-ranking split into tiers.
    pub fn tier_groups(&self, position: Position) -> Vec<Vec<String>> {
        tiers::tier_groups(&self.sub_ranking(position), self.tiers.get(position))
    }

    /// Gap candidates for a tier-bar drag: every sub-ranking id but the first.
    pub fn tier_gap_ids(&self, position: Position) -> Vec<String> {
        self.sub_ranking(position).into_iter().skip(1).collect()
    }

    fn repair_tiers(&mut self) {
        for pos in Position::ALL {
            let repaired = self.tier_breaks(pos);
            self.tiers.set(pos, repaired);
        }
    }
}

/// Deduplicate `ids`, drop unknown ids, and append any directory players
/// that are missing.
fn covering_ranking(directory: &PlayerDirectory, ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ranking: Vec<String> = ids
        .into_iter()
        .filter(|id| directory.contains(id) && seen.insert(id.clone()))
        .collect();

    for id in directory.default_ranking() {
        if seen.insert(id.clone()) {
            ranking.push(id);
        }
    }
    ranking
}

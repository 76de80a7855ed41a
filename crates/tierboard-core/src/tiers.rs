// Tier-break arithmetic over a position's sub-ranking.
//
// Everything here is a pure function of (sub-ranking, breaks). Stored
// breaks may go stale when the overall ranking changes underneath them;
// `normalize_tier_breaks` is the single repair point and every other
// function in this module normalizes its input first.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::player::Position;

/// Per-position tier breaks. Each list holds the ids that start tier 2+.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBreaks {
    by_position: [Vec<String>; 4],
}

impl TierBreaks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored breaks for a position, as last written. Not normalized.
    pub fn get(&self, position: Position) -> &[String] {
        &self.by_position[position.index()]
    }

    pub fn set(&mut self, position: Position, breaks: Vec<String>) {
        self.by_position[position.index()] = breaks;
    }

    /// Total number of stored breaks across all positions.
    pub fn total(&self) -> usize {
        self.by_position.iter().map(Vec::len).sum()
    }
}

fn index_of(sub_ranking: &[String]) -> HashMap<&str, usize> {
    sub_ranking
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect()
}

/// Repair a break list against the current sub-ranking.
///
/// Keeps only ids present in `sub_ranking`, never its first id, drops
/// duplicates, and sorts by sub-ranking index.
pub fn normalize_tier_breaks(sub_ranking: &[String], breaks: &[String]) -> Vec<String> {
    let positions = index_of(sub_ranking);
    let mut seen = HashSet::new();

    let mut kept: Vec<(usize, &String)> = breaks
        .iter()
        .filter_map(|id| match positions.get(id.as_str()) {
            Some(&i) if i > 0 && seen.insert(id.as_str()) => Some((i, id)),
            _ => None,
        })
        .collect();

    kept.sort_by_key(|&(i, _)| i);
    kept.into_iter().map(|(_, id)| id.clone()).collect()
}

/// Where the next `add tier` should start, given already-normalized breaks.
///
/// With no breaks the new tier starts at the second player. Otherwise it
/// starts right after the last break, clamped to the final player. Returns
/// `None` when the position has fewer than two players.
pub fn next_tier_start(sub_ranking: &[String], normalized: &[String]) -> Option<String> {
    if sub_ranking.len() < 2 {
        return None;
    }

    let next_idx = match normalized.last() {
        None => 1,
        Some(last) => {
            let last_idx = sub_ranking.iter().position(|id| id == last)?;
            (last_idx + 1).min(sub_ranking.len() - 1)
        }
    };
    Some(sub_ranking[next_idx].clone())
}

/// Tier number of every player in the sub-ranking, in sub-ranking order.
pub fn tier_numbers(sub_ranking: &[String], breaks: &[String]) -> Vec<(String, u32)> {
    let normalized = normalize_tier_breaks(sub_ranking, breaks);
    let break_set: HashSet<&str> = normalized.iter().map(String::as_str).collect();

    let mut tier = 1;
    sub_ranking
        .iter()
        .map(|id| {
            if break_set.contains(id.as_str()) {
                tier += 1;
            }
            (id.clone(), tier)
        })
        .collect()
}

/// Tier number of one player, or `None` if it is not in the sub-ranking.
pub fn tier_number(sub_ranking: &[String], breaks: &[String], player_id: &str) -> Option<u32> {
    let normalized = normalize_tier_breaks(sub_ranking, breaks);
    let positions = index_of(sub_ranking);
    let player_idx = *positions.get(player_id)?;

    let at_or_before = normalized
        .iter()
        .filter(|id| positions.get(id.as_str()).is_some_and(|&i| i <= player_idx))
        .count();
    Some(1 + at_or_before as u32)
}

/// Split the sub-ranking into consecutive tiers.
pub fn tier_groups(sub_ranking: &[String], breaks: &[String]) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut current_tier = 0;
    for (id, tier) in tier_numbers(sub_ranking, breaks) {
        if tier != current_tier {
            groups.push(Vec::new());
            current_tier = tier;
        }
        if let Some(group) = groups.last_mut() {
            group.push(id);
        }
    }
    groups
}

/// Rebuild breaks from declared tier numbers, in sub-ranking order.
///
/// A break is emitted whenever a declared tier exceeds every tier seen so
/// far, so repeated or decreasing numbers never create spurious breaks.
/// Tiers compare as plain numbers: `1, 1.5, 2` is three tiers.
pub fn breaks_from_declared<'a, I>(declared: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut breaks = Vec::new();
    let mut running_max = 1.0;
    for (id, tier) in declared {
        if tier > running_max {
            breaks.push(id.to_string());
            running_max = tier;
        }
    }
    breaks
}

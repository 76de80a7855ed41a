// Name search over the active tab.

use serde::Serialize;

use crate::player::Position;
use crate::ranking::{RankingStore, Tab};

/// Default cap on returned matches.
pub const DEFAULT_SEARCH_LIMIT: usize = 12;

/// Fold a name or query into comparable form.
///
/// Lowercases, drops `.` and `'`, turns `-` into a space and collapses runs
/// of whitespace.
pub fn normalize_for_search(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// 1-based rank within the searched tab.
    pub rank: usize,
    /// `"7"` on the overall tab, `"RB3"` on a position tab.
    pub rank_label: String,
}

/// Players on `tab` whose name contains `query`, in tab order.
pub fn search(store: &RankingStore, tab: Tab, query: &str, limit: usize) -> Vec<SearchMatch> {
    let needle = normalize_for_search(query);
    if needle.is_empty() {
        return Vec::new();
    }

    store
        .ids_for_tab(tab)
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let player = store.player(id)?;
            if !normalize_for_search(&player.name).contains(&needle) {
                return None;
            }
            let rank = i + 1;
            let rank_label = match tab {
                Tab::Overall => rank.to_string(),
                Tab::Position(p) => format!("{p}{rank}"),
            };
            Some(SearchMatch {
                id: player.id.clone(),
                name: player.name.clone(),
                position: player.position,
                rank,
                rank_label,
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::PlayerDirectory;
    use crate::player::Player;

    fn store() -> RankingStore {
        RankingStore::from_directory(PlayerDirectory::new(vec![
            Player::new("ja-marr-chase", "Ja'Marr Chase", Position::WR),
            Player::new("amon-ra-st-brown", "Amon-Ra St. Brown", Position::WR),
            Player::new("aj-brown", "A.J. Brown", Position::WR),
            Player::new("bijan-robinson", "Bijan Robinson", Position::RB),
            Player::new("brian-robinson", "Brian Robinson Jr.", Position::RB),
        ]))
    }

    #[test]
    fn normalize_folds_punctuation() {
        assert_eq!(normalize_for_search("  Amon-Ra   St. Brown "), "amon ra st brown");
        assert_eq!(normalize_for_search("Ja'Marr"), "jamarr");
        assert_eq!(normalize_for_search("A.J."), "aj");
    }

    #[test]
    fn search_matches_normalized_substrings() {
        let s = store();
        let hits = search(&s, Tab::Overall, "amon ra", DEFAULT_SEARCH_LIMIT);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "amon-ra-st-brown");
        assert_eq!(hits[0].rank_label, "2");

        let hits = search(&s, Tab::Overall, "jamarr", DEFAULT_SEARCH_LIMIT);
        assert_eq!(hits[0].id, "ja-marr-chase");
    }

    #[test]
    fn search_keeps_tab_order_and_position_ranks() {
        let s = store();
        let hits = search(&s, Tab::Position(Position::RB), "robinson", DEFAULT_SEARCH_LIMIT);
        let labels: Vec<&str> = hits.iter().map(|h| h.rank_label.as_str()).collect();
        assert_eq!(labels, vec!["RB1", "RB2"]);

        assert!(search(&s, Tab::Position(Position::TE), "robinson", 12).is_empty());
    }

    #[test]
    fn search_respects_limit() {
        let s = store();
        assert_eq!(search(&s, Tab::Overall, "brown", 1).len(), 1);
        assert_eq!(search(&s, Tab::Overall, "brown", 12).len(), 2);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let s = store();
        assert!(search(&s, Tab::Overall, "", 12).is_empty());
        assert!(search(&s, Tab::Overall, " .' ", 12).is_empty());
    }
}

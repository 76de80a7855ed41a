// Plain-text rendering of rankings tabs and the draft board.

use std::fmt::Write as _;

use tierboard_core::board::BoardGrid;
use tierboard_core::drag::DragTarget;
use tierboard_core::draft::state::DraftState;
use tierboard_core::ranking::{RankingStore, Tab};
use tierboard_core::search::SearchMatch;

/// Board cell width in characters, excluding the separator.
const CELL_WIDTH: usize = 24;

fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        format!("{s:<width$}")
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// A rankings tab: overall rank list, or a position list split by tier bars.
///
/// Tier headers after the first carry the bar's drag id for `drag`.
pub fn render_tab(store: &RankingStore, draft: &DraftState, tab: Tab) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {tab} ({} players) ==", store.ids_for_tab(tab).len());

    match tab {
        Tab::Overall => {
            for (i, id) in store.ranking().iter().enumerate() {
                let Some(player) = store.player(id) else {
                    continue;
                };
                let tier = store.tier_of(id).unwrap_or(1);
                let mark = if draft.is_drafted(id) { " [drafted]" } else { "" };
                let _ = writeln!(
                    out,
                    "{:>4}. {} ({} T{}) {}{}",
                    i + 1,
                    player.name,
                    player.position,
                    tier,
                    id,
                    mark
                );
            }
        }
        Tab::Position(position) => {
            let mut rank = 0;
            for (t, group) in store.tier_groups(position).iter().enumerate() {
                match group.first() {
                    Some(start_id) if t > 0 => {
                        let bar = DragTarget::TierBar {
                            position,
                            start_id: start_id.clone(),
                        };
                        let _ = writeln!(out, "---- Tier {} ---- {}", t + 1, bar.to_drag_id());
                    }
                    _ => {
                        let _ = writeln!(out, "---- Tier {} ----", t + 1);
                    }
                }
                for id in group {
                    rank += 1;
                    let Some(player) = store.player(id) else {
                        continue;
                    };
                    let overall = store.overall_index(id).map_or(0, |i| i + 1);
                    let mark = if draft.is_drafted(id) { " [drafted]" } else { "" };
                    let _ = writeln!(
                        out,
                        "{:>4}. {}{} (#{}) {}{}",
                        rank, position, rank, overall, player.name, mark
                    );
                }
            }
        }
    }
    out
}

/// The projected board as a grid, one line per round.
pub fn render_board(grid: &BoardGrid, team_names: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {} ({}, {} teams, {} rounds) ==",
        grid.view,
        grid.style,
        grid.teams,
        grid.rounds()
    );

    let header: Vec<String> = (0..grid.teams)
        .map(|i| {
            let default = format!("Team {}", i + 1);
            fit(team_names.get(i).unwrap_or(&default), CELL_WIDTH)
        })
        .collect();
    let _ = writeln!(out, "{}", header.join("|"));

    for row in &grid.rows {
        let labels: Vec<String> = row.iter().map(|c| fit(&c.label, CELL_WIDTH)).collect();
        let names: Vec<String> = row
            .iter()
            .map(|c| match &c.player {
                Some(p) => {
                    let mark = if p.drafted { "*" } else { "" };
                    fit(&format!("{mark}{} {}", p.name, p.position), CELL_WIDTH)
                }
                None => fit("", CELL_WIDTH),
            })
            .collect();
        let _ = writeln!(out, "{}", labels.join("|"));
        let _ = writeln!(out, "{}", names.join("|"));
    }
    out
}

/// Search hits, one per line.
pub fn render_matches(matches: &[SearchMatch]) -> String {
    if matches.is_empty() {
        return "no matches\n".to_string();
    }
    let mut out = String::new();
    for m in matches {
        let _ = writeln!(out, "{:>5}  {} ({}) {}", m.rank_label, m.name, m.position, m.id);
    }
    out
}

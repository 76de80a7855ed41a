// Integration tests for the board model.
//
// These drive the public API the way the app does: seed a store, reorder,
// tier, draft, project the grid, and round-trip through CSV.

use std::collections::HashSet;

use tierboard_core::board::{project_board, BoardView};
use tierboard_core::directory::PlayerDirectory;
use tierboard_core::drag::{apply_action, DragController, DragEvents};
use tierboard_core::draft::pick::{pick_index, rounds_for, DraftStyle};
use tierboard_core::draft::state::DraftState;
use tierboard_core::headshot::parse_id_lookup;
use tierboard_core::player::{Player, Position};
use tierboard_core::ranking::RankingStore;
use tierboard_core::rankings_io::{apply_import, export_rankings_csv};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Four players at each position, interleaved QB RB WR TE.
fn sixteen_player_store() -> RankingStore {
    let mut players = Vec::new();
    for n in 1..=4 {
        for pos in Position::ALL {
            let name = format!("{pos} Player {n}");
            let id = format!("{}-{n}", pos.display_str().to_lowercase());
            players.push(Player::new(id, name, pos));
        }
    }
    RankingStore::from_directory(PlayerDirectory::new(players))
}

fn assert_contiguous_tiers(store: &RankingStore) {
    for pos in Position::ALL {
        let mut prev = 1;
        for (i, id) in store.sub_ranking(pos).iter().enumerate() {
            let t = store.tier_number(pos, id).unwrap();
            if i == 0 {
                assert_eq!(t, 1, "{pos} starts at tier {t}");
            } else {
                assert!(t == prev || t == prev + 1, "{pos}: tier jumped to {t} at {id}");
            }
            prev = t;
        }
    }
}

fn assert_unique_slots(draft: &DraftState) {
    let mut seen = HashSet::new();
    for id in draft.slots().cells().iter().flatten() {
        assert!(seen.insert(id.clone()), "{id} occupies two slots");
    }
}

// ===========================================================================
// Pick arithmetic
// ===========================================================================

#[test]
fn snake_pick_indices_for_twelve_teams() {
    assert_eq!(pick_index(0, 0, 12, DraftStyle::Snake), 0);
    assert_eq!(pick_index(1, 0, 12, DraftStyle::Snake), 23);
    assert_eq!(pick_index(1, 11, 12, DraftStyle::Snake), 12);
}

#[test]
fn third_round_reversal_direction_pattern() {
    let reversed: Vec<bool> = (0..5)
        .map(|r| DraftStyle::ThirdRoundReversal.is_reversed(r))
        .collect();
    assert_eq!(reversed, vec![false, true, true, false, true]);
}

#[test]
fn every_pick_index_is_hit_exactly_once() {
    for style in DraftStyle::ALL {
        let mut seen = HashSet::new();
        for round in 0..6 {
            for slot in 0..10 {
                assert!(seen.insert(pick_index(round, slot, 10, style)));
            }
        }
        assert_eq!(seen.len(), 60);
        assert!(seen.iter().all(|i| *i < 60));
    }
}

// ===========================================================================
// Ranking and tiers
// ===========================================================================

#[test]
fn reorders_and_tier_edits_keep_invariants() {
    let mut store = sixteen_player_store();
    let expected: HashSet<String> = store.ranking().iter().cloned().collect();

    store.add_tier(Position::QB);
    store.add_tier(Position::QB);
    store.add_tier(Position::WR);
    for (from, to) in [(0, 15), (7, 2), (3, 3), (14, 1), (1, 9)] {
        store.reorder(from, to);
        let now: HashSet<String> = store.ranking().iter().cloned().collect();
        assert_eq!(now, expected);
        assert_eq!(store.len(), 16);
        assert_contiguous_tiers(&store);
    }
}

#[test]
fn tier_bar_drag_moves_break() {
    let mut store = sixteen_player_store();
    let mut draft = DraftState::new(16);
    store.add_tier(Position::RB); // break at rb-2

    let gaps = tierboard_core::drag::uniform_gaps(&store, Position::RB, 20.0);
    let mut ctl = DragController::new();
    ctl.on_drag_move("tierbar:RB:rb-2", 61.0, &gaps);
    assert_eq!(ctl.hover_start_id(), Some("rb-4"));

    let action = ctl.on_drag_end("tierbar:RB:rb-2", None, 61.0, &gaps).unwrap();
    assert!(apply_action(&mut store, &mut draft, &action));
    assert_eq!(store.tier_of("rb-3"), Some(1));
    assert_eq!(store.tier_of("rb-4"), Some(2));
}

#[test]
fn drag_cancel_leaves_store_untouched() {
    let mut store = sixteen_player_store();
    store.add_tier(Position::TE);
    let before = (store.ranking().to_vec(), store.all_tier_breaks());

    let gaps = tierboard_core::drag::uniform_gaps(&store, Position::TE, 20.0);
    let mut ctl = DragController::new();
    ctl.on_drag_move("tierbar:TE:te-2", 40.0, &gaps);
    ctl.on_drag_cancel();

    assert_eq!((store.ranking().to_vec(), store.all_tier_breaks()), before);
    assert_eq!(ctl.hover_start_id(), None);
}

// ===========================================================================
// Draft slots and the board
// ===========================================================================

#[test]
fn toggle_fills_first_empty_and_undraft_clears() {
    let mut draft = DraftState::new(3);
    draft.toggle_drafted("y");
    draft.swap_slots(0, 1); // [None, y, None]
    draft.toggle_drafted("x");
    let cells: Vec<Option<&str>> = draft.slots().cells().iter().map(|c| c.as_deref()).collect();
    assert_eq!(cells, vec![Some("x"), Some("y"), None]);

    draft.toggle_drafted("y");
    assert!(!draft.slots().contains("y"));
    assert!(!draft.is_drafted("y"));
}

#[test]
fn team_count_changes_resize_without_duplicates() {
    let store = sixteen_player_store();
    let mut draft = DraftState::new(rounds_for(store.len(), 4) * 4);
    for id in store.ranking().iter().take(10) {
        draft.toggle_drafted(id);
    }
    for teams in [4, 3, 12, 1, 5] {
        draft.resize(rounds_for(store.len(), teams), teams);
        assert_unique_slots(&draft);
    }
    // 5 teams: 4 rounds, 20 cells.
    assert_eq!(draft.slots().len(), 20);
}

#[test]
fn rankings_and_draft_boards_project_differently() {
    let store = sixteen_player_store();
    let mut draft = DraftState::new(16);
    draft.toggle_drafted("wr-4");

    let rankings = project_board(&store, &draft, 4, 4, DraftStyle::Snake, BoardView::Rankings);
    let first = rankings.cell(0, 0).unwrap().player.as_ref().unwrap();
    assert_eq!(first.id, "qb-1");
    assert!(!first.drafted);

    let board = project_board(&store, &draft, 4, 4, DraftStyle::Snake, BoardView::Draft);
    let first = board.cell(0, 0).unwrap().player.as_ref().unwrap();
    assert_eq!(first.id, "wr-4");
    assert!(first.drafted);
    assert!(board.cell(0, 1).unwrap().player.is_none());
}

#[test]
fn headshot_lookup_reaches_board_cells() {
    let mut store = sixteen_player_store();
    store.set_headshot_lookup(parse_id_lookup("espn_name,espn_id\nQB Player 1,3918298\n"));
    let draft = DraftState::new(16);
    let grid = project_board(&store, &draft, 1, 4, DraftStyle::Regular, BoardView::Rankings);
    let url = grid.cell(0, 0).unwrap().player.as_ref().unwrap().image_url.clone();
    assert_eq!(
        url.as_deref(),
        Some("https://a.espncdn.com/i/headshots/nfl/players/full/3918298.png")
    );
    assert!(grid.cell(0, 1).unwrap().player.as_ref().unwrap().image_url.is_none());
}

// ===========================================================================
// CSV round trip
// ===========================================================================

#[test]
fn export_then_import_reproduces_order_and_tiers() {
    let mut source = sixteen_player_store();
    source.add_player("Rookie Tight End", Position::TE);
    source.reorder(16, 0);
    source.add_tier(Position::QB);
    source.add_tier(Position::TE);
    source.add_tier(Position::TE);
    let csv = export_rankings_csv(&source).unwrap();

    let mut target = RankingStore::from_directory(PlayerDirectory::new(Vec::new()));
    let imported = apply_import(&mut target, &csv).unwrap();
    assert_eq!(imported.skipped_rows, 0);

    assert_eq!(target.ranking(), source.ranking());
    for id in source.ranking() {
        assert_eq!(target.tier_of(id), source.tier_of(id), "tier of {id}");
        assert_eq!(
            target.player(id).map(|p| p.position),
            source.player(id).map(|p| p.position)
        );
    }
}

#[test]
fn failed_import_keeps_current_state() {
    let mut store = sixteen_player_store();
    store.add_tier(Position::WR);
    let before = (store.ranking().to_vec(), store.all_tier_breaks());

    assert!(apply_import(&mut store, "rank,team\n1,BUF\n").is_err());
    assert_eq!((store.ranking().to_vec(), store.all_tier_breaks()), before);
}

// Application state and command loop.
//
// Owns the ranking store, the draft and the board settings, applies parsed
// commands to them, and keeps the slot grid sized to `rounds * teams` after
// anything that changes either factor.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tierboard_core::board::{project_board, BoardView};
use tierboard_core::directory::PlayerDirectory;
use tierboard_core::drag::{self, DragAction, DragController, DragEvents, DragTarget};
use tierboard_core::draft::pick::{rounds_for, DraftStyle, MAX_TEAMS};
use tierboard_core::draft::state::{DraftState, ToggleOutcome};
use tierboard_core::headshot::IdLookup;
use tierboard_core::player::Player;
use tierboard_core::ranking::{RankingStore, Tab};
use tierboard_core::rankings_io::{self, ImportError};
use tierboard_core::search::{self, DEFAULT_SEARCH_LIMIT};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::protocol::{parse_command, BoardCommand, BoardSnapshot, RankingRow, HELP_TEXT};
use crate::render;

/// Row height used to lay out tier gaps for replayed drags.
const ROW_HEIGHT: f64 = 32.0;

// ---------------------------------------------------------------------------
// Errors and replies
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("rank {rank} is out of range (1-{len})")]
    RankOutOfRange { rank: usize, len: usize },

    #[error("pick {pick} is out of range (1-{total})")]
    PickOutOfRange { pick: usize, total: usize },

    #[error("team count {teams} is out of range (1-{max})")]
    TeamCountOutOfRange { teams: usize, max: usize },

    #[error("team {slot} is out of range (1-{teams})")]
    TeamOutOfRange { slot: usize, teams: usize },

    #[error("unknown player `{0}`")]
    UnknownPlayer(String),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    /// Directory that relative import/export paths resolve against.
    pub base_dir: PathBuf,
    pub store: RankingStore,
    pub draft: DraftState,
    pub teams: usize,
    pub style: DraftStyle,
    pub view: BoardView,
    pub tab: Tab,
    /// One header per team slot; always `teams` long.
    pub team_names: Vec<String>,
    pub drag: DragController,
}

/// Resize `names` to `teams`, keeping existing names by index and filling
/// blanks with `Team N`.
pub fn fit_team_names(names: &[String], teams: usize) -> Vec<String> {
    (0..teams)
        .map(|i| match names.get(i) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("Team {}", i + 1),
        })
        .collect()
}

impl AppState {
    /// Build state from a loaded config and seed roster.
    pub fn new(config: Config, base_dir: PathBuf, seed: Vec<Player>) -> Self {
        let store = RankingStore::from_directory(PlayerDirectory::new(seed));
        let teams = config.board.teams;
        let style = config.board.draft_style;
        let team_names = fit_team_names(&config.board.team_names, teams);
        let mut draft = DraftState::default();
        draft.resize(rounds_for(store.len(), teams), teams);

        info!(
            players = store.len(),
            teams,
            %style,
            rounds = rounds_for(store.len(), teams),
            "board initialized"
        );

        AppState {
            config,
            base_dir,
            store,
            draft,
            teams,
            style,
            view: BoardView::Rankings,
            tab: Tab::Overall,
            team_names,
            drag: DragController::new(),
        }
    }

    pub fn set_headshot_lookup(&mut self, lookup: IdLookup) {
        self.store.set_headshot_lookup(lookup);
    }

    pub fn rounds(&self) -> usize {
        rounds_for(self.store.len(), self.teams)
    }

    pub fn total_picks(&self) -> usize {
        self.rounds().saturating_mul(self.teams)
    }

    /// Re-derive the slot grid and headers after players or teams change.
    fn sync_board(&mut self) {
        self.draft.resize(self.rounds(), self.teams);
        if self.team_names.len() != self.teams {
            self.team_names = fit_team_names(&self.team_names, self.teams);
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Snapshot of everything on screen.
    pub fn build_snapshot(&self) -> BoardSnapshot {
        let ranking = self
            .store
            .ranking()
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let p = self.store.player(id)?;
                Some(RankingRow {
                    rank: i + 1,
                    id: p.id.clone(),
                    name: p.name.clone(),
                    position: p.position,
                    tier: self.store.tier_of(id).unwrap_or(1),
                    drafted: self.draft.is_drafted(id),
                })
            })
            .collect();

        BoardSnapshot {
            tab: self.tab,
            teams: self.teams,
            rounds: self.rounds(),
            style: self.style,
            team_names: self.team_names.clone(),
            ranking,
            tier_breaks: self.store.all_tier_breaks(),
            drafted_order: self.draft.drafted_order().to_vec(),
            board: project_board(
                &self.store,
                &self.draft,
                self.rounds(),
                self.teams,
                self.style,
                self.view,
            ),
        }
    }

    fn render_board(&self) -> String {
        let grid = project_board(
            &self.store,
            &self.draft,
            self.rounds(),
            self.teams,
            self.style,
            self.view,
        );
        render::render_board(&grid, &self.team_names)
    }

    // -----------------------------------------------------------------------
    // Command dispatch
    // -----------------------------------------------------------------------

    /// Apply one command.
    pub fn handle_command(&mut self, cmd: BoardCommand) -> Result<Reply, CommandError> {
        debug!(?cmd, "handling command");
        let text = match cmd {
            BoardCommand::Show(tab) => {
                if let Some(tab) = tab {
                    self.tab = tab;
                }
                render::render_tab(&self.store, &self.draft, self.tab)
            }
            BoardCommand::Board(view) => {
                if let Some(view) = view {
                    self.view = view;
                }
                self.render_board()
            }
            BoardCommand::Move { from, to } => {
                let len = self.store.len();
                for rank in [from, to] {
                    if rank == 0 || rank > len {
                        return Err(CommandError::RankOutOfRange { rank, len });
                    }
                }
                if self.store.reorder(from - 1, to - 1) {
                    format!("moved #{from} to #{to}")
                } else {
                    "no change".to_string()
                }
            }
            BoardCommand::Drag { active_id, over_id } => self.replay_drag(&active_id, &over_id),
            BoardCommand::TierAdd(pos) => {
                if self.store.add_tier(pos) {
                    format!("{pos} now has {} tiers", self.store.tier_breaks(pos).len() + 1)
                } else {
                    format!("{pos}: no room for another tier")
                }
            }
            BoardCommand::TierRemove(pos) => {
                if self.store.remove_last_tier(pos) {
                    format!("{pos} now has {} tiers", self.store.tier_breaks(pos).len() + 1)
                } else {
                    format!("{pos} has no tier breaks")
                }
            }
            BoardCommand::TierMove {
                position,
                from_id,
                to_id,
            } => {
                self.store.move_tier_break(position, &from_id, &to_id);
                format!(
                    "{position} tier breaks: {}",
                    self.store.tier_breaks(position).join(", ")
                )
            }
            BoardCommand::Draft(id) => {
                let Some(name) = self.store.player(&id).map(|p| p.name.clone()) else {
                    return Err(CommandError::UnknownPlayer(id));
                };
                match self.draft.toggle_drafted(&id) {
                    ToggleOutcome::Drafted { slot: Some(slot) } => {
                        format!("drafted {name} at pick {}", slot + 1)
                    }
                    ToggleOutcome::Drafted { slot: None } => {
                        format!("drafted {name} (board full, not placed)")
                    }
                    ToggleOutcome::Undrafted { .. } => format!("undrafted {name}"),
                }
            }
            BoardCommand::Swap { a, b } => {
                let total = self.total_picks();
                for pick in [a, b] {
                    if pick == 0 || pick > total {
                        return Err(CommandError::PickOutOfRange { pick, total });
                    }
                }
                self.draft.swap_slots(a - 1, b - 1);
                format!("swapped picks {a} and {b}")
            }
            BoardCommand::Clear => {
                self.draft.clear_all();
                "cleared all drafted players".to_string()
            }
            BoardCommand::Add { position, name } => {
                let id = self
                    .store
                    .add_player(&name, position)
                    .ok_or(CommandError::EmptyName)?;
                self.sync_board();
                format!("added {} as {id} at #{}", name.trim(), self.store.len())
            }
            BoardCommand::Teams(teams) => {
                if teams == 0 || teams > MAX_TEAMS {
                    return Err(CommandError::TeamCountOutOfRange {
                        teams,
                        max: MAX_TEAMS,
                    });
                }
                self.teams = teams;
                self.sync_board();
                info!(teams, rounds = self.rounds(), "team count changed");
                format!("{teams} teams, {} rounds", self.rounds())
            }
            BoardCommand::Style(style) => {
                self.style = style;
                info!(%style, "draft style changed");
                format!("draft style: {style}")
            }
            BoardCommand::Rename { slot, name } => {
                if slot == 0 || slot > self.teams {
                    return Err(CommandError::TeamOutOfRange {
                        slot,
                        teams: self.teams,
                    });
                }
                self.team_names[slot - 1] = name;
                self.team_names = fit_team_names(&self.team_names, self.teams);
                format!("team {slot} is now {}", self.team_names[slot - 1])
            }
            BoardCommand::Find(query) => {
                let hits = search::search(&self.store, self.tab, &query, DEFAULT_SEARCH_LIMIT);
                render::render_matches(&hits)
            }
            BoardCommand::Import(path) => self.import(&path)?,
            BoardCommand::Export(path) => self.export(path.as_deref())?,
            BoardCommand::Reset => {
                self.store.reset_ranking();
                "ranking reset to default order".to_string()
            }
            BoardCommand::Json => serde_json::to_string_pretty(&self.build_snapshot())?,
            BoardCommand::Help => HELP_TEXT.to_string(),
            BoardCommand::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    /// Replay a drag from `active_id` onto `over_id`.
    ///
    /// For tier bars, `over_id` names the target gap; the gap's row offset
    /// stands in for the pointer position.
    fn replay_drag(&mut self, active_id: &str, over_id: &str) -> String {
        let (pointer_y, gaps) = match DragTarget::parse(active_id) {
            DragTarget::TierBar { position, .. } => {
                let gaps = drag::uniform_gaps(&self.store, position, ROW_HEIGHT);
                let target = gaps.iter().find(|g| g.start_id == over_id).map(|g| g.top);
                match target {
                    Some(y) => {
                        self.drag.on_drag_move(active_id, y, &gaps);
                        (y, gaps)
                    }
                    None => {
                        self.drag.on_drag_cancel();
                        return format!("drag cancelled: `{over_id}` is not a {position} tier gap");
                    }
                }
            }
            _ => (0.0, Vec::new()),
        };

        let Some(action) = self
            .drag
            .on_drag_end(active_id, Some(over_id), pointer_y, &gaps)
        else {
            return "drag ignored".to_string();
        };

        if !drag::apply_action(&mut self.store, &mut self.draft, &action) {
            return "drag made no change".to_string();
        }
        match action {
            DragAction::MovePlayer { active_id, over_id } => {
                format!("moved {active_id} to {over_id}'s spot")
            }
            DragAction::MoveTierBreak {
                position,
                to_start_id,
                ..
            } => format!("{position} tier now starts at {to_start_id}"),
            DragAction::SwapDraftSlots { from, to } => {
                format!("swapped picks {} and {}", from + 1, to + 1)
            }
        }
    }

    fn import(&mut self, path: &Path) -> Result<String, CommandError> {
        let full = self.resolve(path);
        let text = std::fs::read_to_string(&full).map_err(|e| CommandError::Read {
            path: full.clone(),
            source: e,
        })?;
        let imported = rankings_io::apply_import(&mut self.store, &text)?;
        self.sync_board();
        Ok(format!(
            "imported {} players ({} rows skipped) from {}",
            imported.ranking.len(),
            imported.skipped_rows,
            full.display()
        ))
    }

    fn export(&self, path: Option<&Path>) -> Result<String, CommandError> {
        let default = PathBuf::from(&self.config.data.export_path);
        let full = self.resolve(path.unwrap_or(default.as_path()));
        let csv = rankings_io::export_rankings_csv(&self.store)?;
        std::fs::write(&full, csv).map_err(|e| CommandError::Write {
            path: full.clone(),
            source: e,
        })?;
        info!(path = %full.display(), players = self.store.len(), "rankings exported");
        Ok(format!("exported {} players to {}", self.store.len(), full.display()))
    }
}

// ---------------------------------------------------------------------------
// Command loop
// ---------------------------------------------------------------------------

/// Read commands line by line until `quit` or end of input.
///
/// Parse and command errors are reported on `output` and never end the loop.
pub async fn run<R, W>(
    state: &mut AppState,
    input: R,
    mut output: W,
    prompt: bool,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        if prompt {
            output.write_all(b"> ").await?;
            output.flush().await?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let reply = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(cmd)) => state.handle_command(cmd),
            Err(e) => {
                output.write_all(format!("error: {e}\n").as_bytes()).await?;
                continue;
            }
        };

        match reply {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) => {
                output.write_all(text.as_bytes()).await?;
                if !text.ends_with('\n') {
                    output.write_all(b"\n").await?;
                }
            }
            Err(e) => {
                warn!("command failed: {}", e);
                output.write_all(format!("error: {e}\n").as_bytes()).await?;
            }
        }
        output.flush().await?;
    }

    output.flush().await?;
    info!("command loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::parse_seed;
    use tierboard_core::player::Position;

    fn state() -> AppState {
        let seed = parse_seed(
            "Name,Position\n\
             Josh Allen,QB\n\
             Bijan Robinson,RB\n\
             CeeDee Lamb,WR\n\
             Travis Kelce,TE\n\
             Jalen Hurts,QB\n\
             Breece Hall,RB\n\
             Tyreek Hill,WR\n\
             Lamar Jackson,QB\n",
        )
        .unwrap();
        let mut config = Config::default();
        config.board.teams = 3;
        AppState::new(config, std::env::temp_dir(), seed)
    }

    fn text(state: &mut AppState, line: &str) -> String {
        match state.handle_command(parse_command(line).unwrap().unwrap()).unwrap() {
            Reply::Text(t) => t,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn new_state_sizes_grid_from_players_and_teams() {
        let s = state();
        assert_eq!(s.rounds(), 3);
        assert_eq!(s.draft.slots().len(), 9);
        assert_eq!(s.team_names, vec!["Team 1", "Team 2", "Team 3"]);
    }

    #[test]
    fn move_uses_one_based_ranks() {
        let mut s = state();
        text(&mut s, "move 8 1");
        assert_eq!(s.store.ranking()[0], "lamar-jackson");
        assert!(matches!(
            s.handle_command(BoardCommand::Move { from: 9, to: 1 }),
            Err(CommandError::RankOutOfRange { rank: 9, len: 8 })
        ));
    }

    #[test]
    fn teams_change_resizes_grid_and_names() {
        let mut s = state();
        text(&mut s, "rename 2 Sharks");
        text(&mut s, "draft josh-allen");
        text(&mut s, "teams 5");
        assert_eq!(s.rounds(), 2);
        assert_eq!(s.draft.slots().len(), 10);
        assert_eq!(s.team_names[1], "Sharks");
        assert_eq!(s.team_names[4], "Team 5");
        text(&mut s, "teams 1");
        assert_eq!(s.team_names, vec!["Team 1"]);
        assert_eq!(s.draft.slots().get(0), Some("josh-allen"));
    }

    #[test]
    fn team_count_is_bounded() {
        let mut s = state();
        for teams in [0, MAX_TEAMS + 1, usize::MAX / 2, usize::MAX] {
            assert!(matches!(
                s.handle_command(BoardCommand::Teams(teams)),
                Err(CommandError::TeamCountOutOfRange { .. })
            ));
        }
        assert_eq!(s.teams, 3);
        assert_eq!(s.draft.slots().len(), 9);
        text(&mut s, "teams 32");
        assert_eq!(s.draft.slots().len(), 32);
    }

    #[test]
    fn adding_a_player_can_add_a_round() {
        let mut s = state();
        text(&mut s, "add TE Sam LaPorta");
        assert_eq!(s.store.len(), 9);
        assert_eq!(s.rounds(), 3);
        text(&mut s, "add WR Puka Nacua");
        assert_eq!(s.rounds(), 4);
        assert_eq!(s.draft.slots().len(), 12);
        assert_eq!(s.store.sub_ranking(Position::WR).last().unwrap(), "puka-nacua");
    }

    #[test]
    fn draft_toggle_and_unknown_player() {
        let mut s = state();
        assert!(text(&mut s, "draft jalen-hurts").contains("pick 1"));
        assert!(text(&mut s, "draft jalen-hurts").contains("undrafted"));
        assert!(matches!(
            s.handle_command(BoardCommand::Draft("nobody".into())),
            Err(CommandError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn swap_checks_pick_range() {
        let mut s = state();
        text(&mut s, "draft josh-allen");
        text(&mut s, "swap 1 9");
        assert_eq!(s.draft.slots().get(8), Some("josh-allen"));
        assert!(matches!(
            s.handle_command(BoardCommand::Swap { a: 1, b: 10 }),
            Err(CommandError::PickOutOfRange { pick: 10, total: 9 })
        ));
    }

    #[test]
    fn drag_replays_player_tier_and_slot_moves() {
        let mut s = state();
        text(&mut s, "drag lamar-jackson josh-allen");
        assert_eq!(s.store.sub_ranking(Position::QB)[0], "lamar-jackson");

        text(&mut s, "tier add QB"); // break at josh-allen
        let out = text(&mut s, "drag tierbar:QB:josh-allen jalen-hurts");
        assert!(out.contains("starts at jalen-hurts"));
        assert_eq!(s.store.tier_breaks(Position::QB), vec!["jalen-hurts".to_string()]);

        let out = text(&mut s, "drag tierbar:QB:jalen-hurts bijan-robinson");
        assert!(out.starts_with("drag cancelled"));
        assert_eq!(s.drag.hover_start_id(), None);

        text(&mut s, "draft bijan-robinson");
        text(&mut s, "drag draftslot:0 draftslot:4");
        assert_eq!(s.draft.slots().get(4), Some("bijan-robinson"));
    }

    #[test]
    fn shown_tier_bar_ids_can_be_dragged() {
        let mut s = state();
        text(&mut s, "tier add QB"); // break at jalen-hurts
        let shown = text(&mut s, "show qb");
        let bar = shown
            .split_whitespace()
            .find(|w| w.starts_with("tierbar:"))
            .unwrap()
            .to_string();
        assert_eq!(bar, "tierbar:QB:jalen-hurts");

        text(&mut s, &format!("drag {bar} lamar-jackson"));
        assert_eq!(s.store.tier_breaks(Position::QB), vec!["lamar-jackson".to_string()]);
    }

    #[test]
    fn find_searches_current_tab() {
        let mut s = state();
        assert!(text(&mut s, "find hall").contains("Breece Hall"));
        text(&mut s, "show qb");
        assert_eq!(text(&mut s, "find hall"), "no matches\n");
        assert!(text(&mut s, "find lamar").contains("QB3"));
    }

    #[test]
    fn reset_restores_seed_order_with_extras_last() {
        let mut s = state();
        text(&mut s, "add TE Sam LaPorta");
        text(&mut s, "move 9 1");
        text(&mut s, "move 5 2");
        text(&mut s, "reset");
        assert_eq!(s.store.ranking()[0], "josh-allen");
        assert_eq!(s.store.ranking().last().unwrap(), "sam-laporta");
    }

    #[test]
    fn export_then_import_through_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = state();
        s.base_dir = tmp.path().to_path_buf();
        text(&mut s, "move 6 1");
        text(&mut s, "tier add RB"); // break at bijan-robinson
        assert!(text(&mut s, "export").contains("exported 8 players"));
        assert!(tmp.path().join("rankings-export.csv").exists());

        let mut fresh = state();
        fresh.base_dir = tmp.path().to_path_buf();
        text(&mut fresh, "import rankings-export.csv");
        assert_eq!(fresh.store.ranking(), s.store.ranking());
        assert_eq!(fresh.store.all_tier_breaks(), s.store.all_tier_breaks());
    }

    #[test]
    fn failed_import_reports_and_keeps_state() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bad.csv"), "rank,team\n1,BUF\n").unwrap();
        let mut s = state();
        s.base_dir = tmp.path().to_path_buf();
        let before = s.store.ranking().to_vec();
        assert!(matches!(
            s.handle_command(BoardCommand::Import("bad.csv".into())),
            Err(CommandError::Import(ImportError::MissingIdentity))
        ));
        assert!(matches!(
            s.handle_command(BoardCommand::Import("missing.csv".into())),
            Err(CommandError::Read { .. })
        ));
        assert_eq!(s.store.ranking(), &before[..]);
    }

    #[test]
    fn json_snapshot_has_board_and_ranking() {
        let mut s = state();
        text(&mut s, "draft josh-allen");
        let json: serde_json::Value = serde_json::from_str(&text(&mut s, "json")).unwrap();
        assert_eq!(json["teams"], 3);
        assert_eq!(json["rounds"], 3);
        assert_eq!(json["style"], "snake");
        assert_eq!(json["ranking"][0]["id"], "josh-allen");
        assert_eq!(json["ranking"][0]["drafted"], true);
        assert_eq!(json["drafted_order"][0], "josh-allen");
        assert_eq!(json["board"]["rows"][1][1]["player"]["id"], "jalen-hurts");
    }

    #[test]
    fn fit_team_names_fills_blanks() {
        let names = vec!["A".to_string(), "  ".to_string()];
        assert_eq!(fit_team_names(&names, 3), vec!["A", "Team 2", "Team 3"]);
        assert!(fit_team_names(&names, 0).is_empty());
    }

    #[tokio::test]
    async fn run_loop_reports_errors_and_stops_at_quit() {
        let mut s = state();
        let input: &[u8] = b"# comment\nmove 1 2\nbogus\ndraft nobody\nquit\nmove 1 2\n";
        let mut output = Vec::new();
        run(&mut s, input, &mut output, false).await.unwrap();

        let out = String::from_utf8(output).unwrap();
        assert!(out.contains("moved #1 to #2"));
        assert!(out.contains("error: unknown command `bogus`"));
        assert!(out.contains("error: unknown player `nobody`"));
        // Only the first move ran.
        assert_eq!(s.store.ranking()[1], "josh-allen");
        assert_eq!(out.matches("moved").count(), 1);
    }
}

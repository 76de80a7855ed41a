// Draft board projection: maps every (round, team) cell to a player.
//
// The rankings board reads the overall ranking by pick index; the draft
// board reads the manually placed draft slots. Both share the same pick
// arithmetic from `draft::pick`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::pick::{pick_position, DraftStyle, PickPosition};
use crate::draft::state::DraftState;
use crate::player::Position;
use crate::ranking::RankingStore;

/// Which grid is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardView {
    /// Players in overall ranking order.
    #[default]
    Rankings,
    /// Players where they were placed in the draft slots.
    Draft,
}

impl BoardView {
    pub fn from_str_view(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rankings" | "rankings board" | "ranking" => Some(BoardView::Rankings),
            "draft" | "draft board" => Some(BoardView::Draft),
            _ => None,
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardView::Rankings => write!(f, "Rankings Board"),
            BoardView::Draft => write!(f, "Draft Board"),
        }
    }
}

/// The player shown at `pick_index`, if any.
pub fn project<'a>(
    view: BoardView,
    pick_index: usize,
    store: &'a RankingStore,
    draft: &'a DraftState,
) -> Option<&'a str> {
    match view {
        BoardView::Rankings => store.ranking().get(pick_index).map(String::as_str),
        BoardView::Draft => draft.slots().get(pick_index),
    }
}

/// A player occupying a board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPlayer {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub image_url: Option<String>,
    pub drafted: bool,
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    pub pick: PickPosition,
    pub label: String,
    pub player: Option<CellPlayer>,
}

/// A fully projected board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardGrid {
    pub view: BoardView,
    pub style: DraftStyle,
    pub teams: usize,
    /// `rounds` rows of `teams` cells, in visual order.
    pub rows: Vec<Vec<BoardCell>>,
}

impl BoardGrid {
    pub fn rounds(&self) -> usize {
        self.rows.len()
    }

    /// The cell at a visual (round, team slot) position.
    pub fn cell(&self, round: usize, team_slot: usize) -> Option<&BoardCell> {
        self.rows.get(round)?.get(team_slot)
    }
}

/// Project the whole board.
pub fn project_board(
    store: &RankingStore,
    draft: &DraftState,
    rounds: usize,
    teams: usize,
    style: DraftStyle,
    view: BoardView,
) -> BoardGrid {
    let rows = (0..rounds)
        .map(|round| {
            (0..teams)
                .map(|slot| {
                    let pick = pick_position(round, slot, teams, style);
                    let player = project(view, pick.pick_index, store, draft).and_then(|id| {
                        let p = store.player(id)?;
                        Some(CellPlayer {
                            id: p.id.clone(),
                            name: p.name.clone(),
                            position: p.position,
                            image_url: store.directory().image_url(id),
                            drafted: draft.is_drafted(id),
                        })
                    });
                    BoardCell {
                        label: pick.label(),
                        pick,
                        player,
                    }
                })
                .collect()
        })
        .collect();

    BoardGrid {
        view,
        style,
        teams,
        rows,
    }
}

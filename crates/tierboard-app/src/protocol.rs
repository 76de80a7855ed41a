// Line command protocol and the serializable board snapshot.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tierboard_core::board::{BoardGrid, BoardView};
use tierboard_core::draft::pick::{DraftStyle, MAX_TEAMS};
use tierboard_core::player::Position;
use tierboard_core::ranking::Tab;
use tierboard_core::tiers::TierBreaks;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One parsed input line. Ranks and picks are 1-based as typed.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCommand {
    /// Print a tab; `None` keeps the current one.
    Show(Option<Tab>),
    /// Print the board; `Some` switches view first.
    Board(Option<BoardView>),
    Move { from: usize, to: usize },
    Drag { active_id: String, over_id: String },
    TierAdd(Position),
    TierRemove(Position),
    TierMove { position: Position, from_id: String, to_id: String },
    Draft(String),
    Swap { a: usize, b: usize },
    Clear,
    Add { position: Position, name: String },
    Teams(usize),
    Style(DraftStyle),
    Rename { slot: usize, name: String },
    Find(String),
    Import(PathBuf),
    Export(Option<PathBuf>),
    Reset,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {what} `{value}`")]
    InvalidArg { what: &'static str, value: String },

    #[error("{what} must be between 1 and {max}, got `{value}`")]
    OutOfRange {
        what: &'static str,
        value: String,
        max: usize,
    },
}

pub const HELP_TEXT: &str = "\
commands:
  show [overall|qb|rb|wr|te]     print a rankings tab
  board [rankings|draft]         print the draft board
  move <from> <to>               move a player between overall ranks
  drag <activeId> <overId>       replay a drag (player, tierbar:POS:id, draftslot:N)
  tier add|remove <POS>          add or remove the last tier break
  tier move <POS> <fromId> <toId>
  draft <id>                     toggle a player's drafted mark
  swap <a> <b>                   swap two draft board picks
  clear                          clear all drafted marks
  add <POS> <name...>            add a player to the end of the ranking
  teams <n>                      set the team count (1-32)
  style <regular|snake|third_round_reversal>
  rename <team> <name...>        rename a board column
  find <query>                   search the current tab
  import <path>                  replace rankings from a CSV file
  export [path]                  write rankings to a CSV file
  reset                          restore the default ranking order
  json                           print a board snapshot as JSON
  help | quit";

fn parse_usize(what: &'static str, raw: &str) -> Result<usize, ParseError> {
    raw.parse::<usize>().map_err(|_| ParseError::InvalidArg {
        what,
        value: raw.to_string(),
    })
}

/// 1-based number: zero is rejected.
fn parse_ordinal(what: &'static str, raw: &str) -> Result<usize, ParseError> {
    match parse_usize(what, raw)? {
        0 => Err(ParseError::InvalidArg {
            what,
            value: raw.to_string(),
        }),
        n => Ok(n),
    }
}

fn parse_position(raw: &str) -> Result<Position, ParseError> {
    Position::from_str_pos(raw).ok_or_else(|| ParseError::InvalidArg {
        what: "position",
        value: raw.to_string(),
    })
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<BoardCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let (verb, args) = match words.split_first() {
        Some((verb, args)) => (verb.to_lowercase(), args),
        None => return Ok(None),
    };
    // Everything after the verb (or after the first argument), spacing kept.
    let rest_after = |n: usize| -> String {
        let mut s = line;
        for _ in 0..=n {
            s = s.trim_start();
            s = s.find(char::is_whitespace).map_or("", |i| &s[i..]);
        }
        s.trim().to_string()
    };

    let cmd = match (verb.as_str(), args) {
        ("show", []) => BoardCommand::Show(None),
        ("show", [tab]) => BoardCommand::Show(Some(Tab::from_str_tab(tab).ok_or_else(
            || ParseError::InvalidArg {
                what: "tab",
                value: tab.to_string(),
            },
        )?)),
        ("show", _) => return Err(ParseError::Usage("show [overall|qb|rb|wr|te]")),

        ("board", []) => BoardCommand::Board(None),
        ("board", [view]) => BoardCommand::Board(Some(BoardView::from_str_view(view).ok_or_else(
            || ParseError::InvalidArg {
                what: "board",
                value: view.to_string(),
            },
        )?)),
        ("board", _) => return Err(ParseError::Usage("board [rankings|draft]")),

        ("move", [from, to]) => BoardCommand::Move {
            from: parse_ordinal("rank", from)?,
            to: parse_ordinal("rank", to)?,
        },
        ("move", _) => return Err(ParseError::Usage("move <from> <to>")),

        ("drag", [active, over]) => BoardCommand::Drag {
            active_id: active.to_string(),
            over_id: over.to_string(),
        },
        ("drag", _) => return Err(ParseError::Usage("drag <activeId> <overId>")),

        ("tier", [op, pos]) if op.eq_ignore_ascii_case("add") => {
            BoardCommand::TierAdd(parse_position(pos)?)
        }
        ("tier", [op, pos]) if op.eq_ignore_ascii_case("remove") => {
            BoardCommand::TierRemove(parse_position(pos)?)
        }
        ("tier", [op, pos, from, to]) if op.eq_ignore_ascii_case("move") => {
            BoardCommand::TierMove {
                position: parse_position(pos)?,
                from_id: from.to_string(),
                to_id: to.to_string(),
            }
        }
        ("tier", _) => {
            return Err(ParseError::Usage(
                "tier add|remove <POS> | tier move <POS> <fromId> <toId>",
            ))
        }

        ("draft", [id]) => BoardCommand::Draft(id.to_string()),
        ("draft", _) => return Err(ParseError::Usage("draft <id>")),

        ("swap", [a, b]) => BoardCommand::Swap {
            a: parse_ordinal("pick", a)?,
            b: parse_ordinal("pick", b)?,
        },
        ("swap", _) => return Err(ParseError::Usage("swap <a> <b>")),

        ("clear", []) => BoardCommand::Clear,

        ("add", [pos, _, ..]) => BoardCommand::Add {
            position: parse_position(pos)?,
            name: rest_after(1),
        },
        ("add", _) => return Err(ParseError::Usage("add <POS> <name...>")),

        ("teams", [n]) => match parse_ordinal("team count", n)? {
            teams if teams > MAX_TEAMS => {
                return Err(ParseError::OutOfRange {
                    what: "team count",
                    value: n.to_string(),
                    max: MAX_TEAMS,
                })
            }
            teams => BoardCommand::Teams(teams),
        },
        ("teams", _) => return Err(ParseError::Usage("teams <n>")),

        ("style", [_, ..]) => {
            let raw = rest_after(0);
            BoardCommand::Style(DraftStyle::from_str_style(&raw).ok_or(
                ParseError::InvalidArg {
                    what: "draft style",
                    value: raw,
                },
            )?)
        }
        ("style", _) => return Err(ParseError::Usage("style <regular|snake|third_round_reversal>")),

        ("rename", [slot, _, ..]) => BoardCommand::Rename {
            slot: parse_ordinal("team", slot)?,
            name: rest_after(1),
        },
        ("rename", _) => return Err(ParseError::Usage("rename <team> <name...>")),

        ("find", [_, ..]) => BoardCommand::Find(rest_after(0)),
        ("find", _) => return Err(ParseError::Usage("find <query>")),

        ("import", [_, ..]) => BoardCommand::Import(PathBuf::from(rest_after(0))),
        ("import", _) => return Err(ParseError::Usage("import <path>")),

        ("export", []) => BoardCommand::Export(None),
        ("export", _) => BoardCommand::Export(Some(PathBuf::from(rest_after(0)))),

        ("reset", []) => BoardCommand::Reset,
        ("json", []) => BoardCommand::Json,
        ("help", _) | ("?", _) => BoardCommand::Help,
        ("quit", _) | ("exit", _) | ("q", _) => BoardCommand::Quit,

        _ => return Err(ParseError::Unknown(verb.clone())),
    };

    Ok(Some(cmd))
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One ranking row in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub position: Position,
    pub tier: u32,
    pub drafted: bool,
}

/// Everything the board shows, for `json` output.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub tab: Tab,
    pub teams: usize,
    pub rounds: usize,
    pub style: DraftStyle,
    pub team_names: Vec<String>,
    pub ranking: Vec<RankingRow>,
    pub tier_breaks: TierBreaks,
    pub drafted_order: Vec<String>,
    pub board: BoardGrid,
}

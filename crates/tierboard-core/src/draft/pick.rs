// Draft styles and pick-index arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order in which teams pick from round to round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStyle {
    /// Same team order every round.
    Regular,
    /// Order reverses on every odd (0-based) round.
    #[default]
    Snake,
    /// Reversed on round index 1 and on every even round index from 2 on.
    ThirdRoundReversal,
}

impl DraftStyle {
    pub const ALL: [DraftStyle; 3] = [
        DraftStyle::Snake,
        DraftStyle::Regular,
        DraftStyle::ThirdRoundReversal,
    ];

    /// Parse a style name. Accepts the snake_case config names and the
    /// display labels, case-insensitively.
    pub fn from_str_style(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match key.as_str() {
            "regular" | "regular_draft" => Some(DraftStyle::Regular),
            "snake" | "snake_draft" => Some(DraftStyle::Snake),
            "third_round_reversal" | "3rr" | "trr" => Some(DraftStyle::ThirdRoundReversal),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            DraftStyle::Regular => "Regular Draft",
            DraftStyle::Snake => "Snake Draft",
            DraftStyle::ThirdRoundReversal => "Third Round Reversal",
        }
    }

    /// Whether team order runs right-to-left in the given 0-based round.
    pub fn is_reversed(&self, round: usize) -> bool {
        match self {
            DraftStyle::Regular => false,
            DraftStyle::Snake => round % 2 == 1,
            DraftStyle::ThirdRoundReversal => round == 1 || (round >= 2 && round % 2 == 0),
        }
    }
}

impl fmt::Display for DraftStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Where one (round, team slot) cell sits in the overall pick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickPosition {
    /// 0-based round.
    pub round: usize,
    /// 0-based visual column.
    pub team_slot: usize,
    /// 0-based overall pick index.
    pub pick_index: usize,
    /// 1-based pick number within the round.
    pub pick_in_round: usize,
    pub reversed: bool,
}

impl PickPosition {
    /// Human-readable label such as `"1.03 →"` or `"← 2.12"`.
    pub fn label(&self) -> String {
        let base = format!("{}.{:02}", self.round + 1, self.pick_in_round);
        if self.reversed {
            format!("← {base}")
        } else {
            format!("{base} →")
        }
    }
}

/// Locate the pick held by visual column `team_slot` in `round`.
///
/// `teams` must be non-zero and `team_slot < teams`.
pub fn pick_position(round: usize, team_slot: usize, teams: usize, style: DraftStyle) -> PickPosition {
    let reversed = style.is_reversed(round);
    let (offset, pick_in_round) = if reversed {
        (teams - 1 - team_slot, teams - team_slot)
    } else {
        (team_slot, team_slot + 1)
    };
    PickPosition {
        round,
        team_slot,
        pick_index: round * teams + offset,
        pick_in_round,
        reversed,
    }
}

/// 0-based overall pick index of a (round, team slot) cell.
pub fn pick_index(round: usize, team_slot: usize, teams: usize, style: DraftStyle) -> usize {
    pick_position(round, team_slot, teams, style).pick_index
}

/// Largest supported team count.
pub const MAX_TEAMS: usize = 32;

/// Rounds needed to draft `players` players with `teams` teams.
pub fn rounds_for(players: usize, teams: usize) -> usize {
    if teams == 0 {
        0
    } else {
        players.div_ceil(teams)
    }
}

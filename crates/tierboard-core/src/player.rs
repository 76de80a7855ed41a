// Player records, positions, and id slug generation.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Football positions tracked on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
}

impl Position {
    /// All positions in tab order.
    pub const ALL: [Position; 4] = [Position::QB, Position::RB, Position::WR, Position::TE];

    /// Parse a position token, case-insensitively and ignoring surrounding
    /// whitespace. Anything other than QB/RB/WR/TE is rejected.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
        }
    }

    /// Index into per-position arrays, matching `ALL`.
    pub fn index(&self) -> usize {
        match self {
            Position::QB => 0,
            Position::RB => 1,
            Position::WR => 2,
            Position::TE => 3,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A player known to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable, URL-safe slug. Never changes once assigned.
    pub id: String,
    pub name: String,
    pub position: Position,
    /// External image reference, attached after creation by a lookup.
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position,
            image_ref: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Id slugs
// ---------------------------------------------------------------------------

/// Fallback slug for names that contain no usable characters.
pub const FALLBACK_SLUG: &str = "player";

/// Turn a display name into a URL-safe slug.
///
/// Lowercases, drops apostrophes and periods, and replaces every run of
/// other non-alphanumeric characters with a single `-`. Leading and
/// trailing dashes are stripped, so `"  Ja'Marr Chase Jr. "` becomes
/// `"jamarr-chase-jr"`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.trim().to_lowercase().chars() {
        if ch == '\'' || ch == '.' {
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Return `base` if it is free, otherwise the first `base-N` (N >= 2) not in
/// `taken`. An empty base falls back to [`FALLBACK_SLUG`].
pub fn ensure_unique_id(base: &str, taken: &HashSet<String>) -> String {
    let base = if base.is_empty() { FALLBACK_SLUG } else { base };
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Slugify `name` and disambiguate it against `taken`.
pub fn unique_id_from_name(name: &str, taken: &HashSet<String>) -> String {
    ensure_unique_id(&slugify(name), taken)
}

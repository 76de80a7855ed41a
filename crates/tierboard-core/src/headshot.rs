// Headshot id lookup: name normalization, lookup table parsing, URL format.
//
// The lookup table itself is fetched by the app; this module only knows how
// to read it and how to turn an id into an image URL.

use std::collections::HashMap;

use tracing::{debug, warn};
use url::Url;

use crate::csv_codec;

/// Base URL for player headshot images.
pub const HEADSHOT_URL_BASE: &str = "https://a.espncdn.com/i/headshots/nfl/players/full/";

/// Header names accepted for the player-name column of the lookup CSV.
const NAME_COLUMNS: &[&str] = &["espn_name", "name", "full_name", "player_name"];

/// Header names accepted for the image-id column of the lookup CSV.
const ID_COLUMNS: &[&str] = &["espn_id", "espn", "espnid"];

/// Name suffixes ignored when matching lookup rows to players.
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Mapping from normalized player name to external image id.
pub type IdLookup = HashMap<String, String>;

/// Normalize a player name for lookup matching.
///
/// `"Kenneth Walker III"`, `"kenneth walker"` and `"Kenneth  Walker, III."`
/// all normalize to `"kenneth walker"`.
pub fn normalize_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        match ch {
            '.' | '\'' => {}
            c if c.is_ascii_lowercase() || c.is_whitespace() => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }

    cleaned
        .split_whitespace()
        .filter(|word| !SUFFIXES.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the display URL for an image id, encoded as one path segment.
pub fn headshot_url(image_ref: &str) -> Option<String> {
    let mut url = Url::parse(HEADSHOT_URL_BASE).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(&format!("{image_ref}.png"));
    Some(url.to_string())
}

/// Parse the id lookup CSV.
///
/// Returns an empty map when the text cannot be parsed or lacks a name or
/// id column; a missing lookup only means "no image available". When a
/// normalized name appears more than once, the first row wins.
pub fn parse_id_lookup(text: &str) -> IdLookup {
    let rows = match csv_codec::parse_rows(text) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("headshot lookup is not valid CSV: {}", e);
            return IdLookup::new();
        }
    };

    let Some((header, body)) = rows.split_first() else {
        return IdLookup::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

    let find = |names: &[&str]| header.iter().position(|h| names.contains(&h.as_str()));
    let (Some(idx_name), Some(idx_id)) = (find(NAME_COLUMNS), find(ID_COLUMNS)) else {
        warn!("headshot lookup is missing a name or id column");
        return IdLookup::new();
    };

    let mut map = IdLookup::new();
    for row in body {
        let name = normalize_name(row.get(idx_name).map(String::as_str).unwrap_or(""));
        let id = row.get(idx_id).map(|s| s.trim()).unwrap_or("");
        if name.is_empty() || id.is_empty() {
            continue;
        }
        map.entry(name).or_insert_with(|| id.to_string());
    }

    debug!(entries = map.len(), "parsed headshot lookup");
    map
}

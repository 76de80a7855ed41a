// Rankings CSV import/export.
//
// Export writes `rank,id,name,position,tier`. Import accepts a few column
// aliases, drops unusable rows, and rebuilds tier breaks from the declared
// tier numbers rather than trusting them literally.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::csv_codec;
use crate::player::{ensure_unique_id, slugify, Player, Position};
use crate::ranking::RankingStore;
use crate::tiers::{self, TierBreaks};

/// Default file name for exported rankings.
pub const DEFAULT_EXPORT_FILE: &str = "rankings-export.csv";

const EXPORT_HEADER: [&str; 5] = ["rank", "id", "name", "position", "tier"];
const ID_COLUMNS: &[&str] = &["id", "playerid", "player_id"];
const NAME_COLUMNS: &[&str] = &["name", "player_name", "full_name"];
const POSITION_COLUMNS: &[&str] = &["position", "pos"];
const TIER_COLUMN: &str = "tier";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV is empty")]
    Empty,

    #[error("CSV must include at least an 'id' or 'name' column")]
    MissingIdentity,

    #[error("CSV must include a 'position' (or 'pos') column")]
    MissingPosition,

    #[error("CSV contained no usable player rows")]
    NoUsableRows,

    #[error("CSV could not be parsed: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize the store's ranking and tiers to CSV text.
pub fn export_rankings_csv(store: &RankingStore) -> Result<String, csv::Error> {
    let mut tier_by_id: HashMap<String, u32> = HashMap::new();
    for pos in Position::ALL {
        let sub = store.sub_ranking(pos);
        tier_by_id.extend(tiers::tier_numbers(&sub, &store.tier_breaks(pos)));
    }

    let header = EXPORT_HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let body = store.ranking().iter().enumerate().filter_map(|(i, id)| {
        let player = store.player(id)?;
        Some(vec![
            (i + 1).to_string(),
            player.id.clone(),
            player.name.clone(),
            player.position.to_string(),
            tier_by_id.get(id).copied().unwrap_or(1).to_string(),
        ])
    });

    csv_codec::write_rows(std::iter::once(header).chain(body))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// The parsed contents of a rankings CSV, not yet applied to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRankings {
    /// Ranking order, duplicate-free.
    pub ranking: Vec<String>,
    /// One record per id in `ranking`.
    pub players: Vec<Player>,
    /// Tier breaks rebuilt from the declared tier column.
    pub tiers: TierBreaks,
    /// Data rows that were dropped (bad position or no identity).
    pub skipped_rows: usize,
}

struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    position: usize,
    tier: Option<usize>,
}

impl Columns {
    fn detect(header: &[String]) -> Result<Self, ImportError> {
        let header: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |names: &[&str]| header.iter().position(|h| names.contains(&h.as_str()));

        let id = find(ID_COLUMNS);
        let name = find(NAME_COLUMNS);
        if id.is_none() && name.is_none() {
            return Err(ImportError::MissingIdentity);
        }
        let position = find(POSITION_COLUMNS).ok_or(ImportError::MissingPosition)?;
        let tier = find(&[TIER_COLUMN]);

        Ok(Columns {
            id,
            name,
            position,
            tier,
        })
    }
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(|s| s.trim()).unwrap_or("")
}

/// Declared tier number; blank, non-numeric, or < 1 reads as 1.
/// Fractional values are kept so they still order between whole tiers.
fn parse_tier(raw: &str) -> f64 {
    match raw.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 1.0 => t,
        _ => 1.0,
    }
}

/// Parse rankings CSV text.
pub fn import_rankings_csv(text: &str) -> Result<ImportedRankings, ImportError> {
    let rows = csv_codec::parse_rows(text)?;
    let (header, body) = rows.split_first().ok_or(ImportError::Empty)?;
    let cols = Columns::detect(header)?;

    let mut taken: HashSet<String> = HashSet::new();
    let mut players: Vec<Player> = Vec::new();
    let mut declared_tier: HashMap<String, f64> = HashMap::new();
    let mut skipped_rows = 0;

    for row in body {
        let Some(position) = Position::from_str_pos(cell(row, Some(cols.position))) else {
            debug!("skipping row with unrecognized position: {:?}", row);
            skipped_rows += 1;
            continue;
        };

        let name = cell(row, cols.name);
        let explicit_id = cell(row, cols.id);
        let id = if !explicit_id.is_empty() {
            let id = ensure_unique_id(explicit_id, &taken);
            if id != explicit_id {
                debug!(id = explicit_id, renamed = %id, "repeated id renamed");
            }
            id
        } else if !name.is_empty() {
            ensure_unique_id(&slugify(name), &taken)
        } else {
            skipped_rows += 1;
            continue;
        };

        taken.insert(id.clone());
        declared_tier.insert(id.clone(), parse_tier(cell(row, cols.tier)));
        let display_name = if name.is_empty() { id.as_str() } else { name };
        players.push(Player::new(id.clone(), display_name, position));
    }

    if players.is_empty() {
        return Err(ImportError::NoUsableRows);
    }

    let mut tiers_out = TierBreaks::new();
    for pos in Position::ALL {
        let sub: Vec<String> = players
            .iter()
            .filter(|p| p.position == pos)
            .map(|p| p.id.clone())
            .collect();
        let declared = sub
            .iter()
            .map(|id| (id.as_str(), declared_tier.get(id).copied().unwrap_or(1.0)));
        let rebuilt = tiers::breaks_from_declared(declared);
        tiers_out.set(pos, tiers::normalize_tier_breaks(&sub, &rebuilt));
    }

    let ranking = players.iter().map(|p| p.id.clone()).collect();
    info!(
        players = players.len(),
        skipped_rows,
        tier_breaks = tiers_out.total(),
        "parsed rankings CSV"
    );

    Ok(ImportedRankings {
        ranking,
        players,
        tiers: tiers_out,
        skipped_rows,
    })
}

/// Parse `text` and, only if it is valid, replace the store's ranking and
/// tiers with it.
pub fn apply_import(store: &mut RankingStore, text: &str) -> Result<ImportedRankings, ImportError> {
    let imported = import_rankings_csv(text)?;
    store.replace(
        imported.players.clone(),
        imported.ranking.clone(),
        imported.tiers.clone(),
    );
    Ok(imported)
}

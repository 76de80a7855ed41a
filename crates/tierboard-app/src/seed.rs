// Seed roster loading.
//
// A seed is a `Name,Position` CSV, header optional. Row order is the initial
// ranking. Ids are slugs of the name, disambiguated with numeric suffixes.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tierboard_core::player::{ensure_unique_id, slugify, Player, Position};
use tracing::{debug, info, warn};

use crate::config::DataConfig;

/// Sample roster used when no seed file is configured.
pub const SAMPLE_SEED: &str = "\
Name,Position
Christian McCaffrey,RB
CeeDee Lamb,WR
Tyreek Hill,WR
Ja'Marr Chase,WR
Bijan Robinson,RB
Breece Hall,RB
Justin Jefferson,WR
Amon-Ra St. Brown,WR
A.J. Brown,WR
Jahmyr Gibbs,RB
Garrett Wilson,WR
Puka Nacua,WR
Jonathan Taylor,RB
Saquon Barkley,RB
Travis Kelce,TE
Marvin Harrison Jr.,WR
Davante Adams,WR
Sam LaPorta,TE
Kyren Williams,RB
Josh Allen,QB
Jalen Hurts,QB
Derrick Henry,RB
Drake London,WR
Chris Olave,WR
De'Von Achane,RB
Lamar Jackson,QB
Patrick Mahomes,QB
Mike Evans,WR
Trey McBride,TE
Isiah Pacheco,RB
DK Metcalf,WR
Brandon Aiyuk,WR
Mark Andrews,TE
C.J. Stroud,QB
Kenneth Walker III,RB
Joe Mixon,RB
Nico Collins,WR
Stefon Diggs,WR
Anthony Richardson,QB
Cooper Kupp,WR
Dalton Kincaid,TE
Alvin Kamara,RB
James Cook,RB
Joe Burrow,QB
George Kittle,TE
Rachaad White,RB
Deebo Samuel,WR
Kyler Murray,QB
";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("seed {path} contains no players")]
    Empty { path: String },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse seed rows from any reader. `source` names the input in errors.
fn load_from_reader<R: Read>(rdr: R, source: &str) -> Result<Vec<Player>, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut taken = HashSet::new();
    let mut players = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|e| SeedError::Csv {
            path: source.to_string(),
            source: e,
        })?;
        let name = record.get(0).unwrap_or("");
        let pos = record.get(1).unwrap_or("");

        if i == 0 && name.to_lowercase().starts_with("name") {
            continue;
        }
        if name.is_empty() || pos.is_empty() {
            debug!(row = i + 1, "skipping incomplete seed row");
            continue;
        }

        let position = Position::from_str_pos(pos).unwrap_or_else(|| {
            warn!("seed player '{}' has unknown position '{}', using WR", name, pos);
            Position::WR
        });

        let id = ensure_unique_id(&slugify(name), &taken);
        taken.insert(id.clone());
        players.push(Player::new(id, name, position));
    }

    if players.is_empty() {
        return Err(SeedError::Empty {
            path: source.to_string(),
        });
    }
    Ok(players)
}

/// Parse seed CSV text.
pub fn parse_seed(text: &str) -> Result<Vec<Player>, SeedError> {
    load_from_reader(text.as_bytes(), "<inline>")
}

/// Load a seed file.
pub fn load_seed_file(path: &Path) -> Result<Vec<Player>, SeedError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| SeedError::Io {
        path: display.clone(),
        source: e,
    })?;
    load_from_reader(file, &display)
}

/// Load the configured seed relative to `base_dir`, or the sample roster.
pub fn load_seed(base_dir: &Path, data: &DataConfig) -> Result<Vec<Player>, SeedError> {
    let players = if data.seed.trim().is_empty() {
        load_from_reader(SAMPLE_SEED.as_bytes(), "<sample>")?
    } else {
        load_seed_file(&base_dir.join(data.seed.trim()))?
    };
    info!(players = players.len(), "seed roster loaded");
    Ok(players)
}

// Configuration loading and parsing (board.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use tierboard_core::draft::pick::{DraftStyle, MAX_TEAMS};
use tierboard_core::rankings_io::DEFAULT_EXPORT_FILE;

/// The one config file, under both `config/` and `defaults/`.
const CONFIG_FILE: &str = "board.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// board.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub headshots: HeadshotConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub teams: usize,
    pub draft_style: DraftStyle,
    /// Overrides for the board's column headers, by team slot.
    pub team_names: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            teams: 12,
            draft_style: DraftStyle::Snake,
            team_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Seed roster CSV, relative to the base directory. Empty means the
    /// built-in sample roster.
    pub seed: String,
    pub export_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            seed: String::new(),
            export_path: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadshotConfig {
    pub enabled: bool,
    pub lookup_url: String,
}

impl Default for HeadshotConfig {
    fn default() -> Self {
        HeadshotConfig {
            enabled: true,
            lookup_url: "https://raw.githubusercontent.com/mayscopeland/ffb_ids/main/player_ids.csv"
                .to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/board.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Create `config/board.toml` from `defaults/board.toml` if it is missing.
///
/// Returns the created path, or `None` when a config already exists. An
/// existing config is never touched.
pub fn ensure_board_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} or defaults/{CONFIG_FILE} in {}; \
                 run from the app directory or pass --base-dir",
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;
    info!("created {} from defaults", target.display());

    Ok(Some(target))
}

/// Copy missing defaults, then load config relative to `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_board_config(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.board.teams == 0 || config.board.teams > MAX_TEAMS {
        return Err(ConfigError::ValidationError {
            field: "board.teams".into(),
            message: format!("must be between 1 and {MAX_TEAMS}"),
        });
    }

    if config.data.export_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.export_path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.headshots.enabled && config.headshots.lookup_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "headshots.lookup_url".into(),
            message: "must not be empty while headshots are enabled".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::modes::ModeSet;
use crate::prefs::DEFAULT_HISTORY_DEPTH;

// ---------------------------------------------------------------------------
// TOML-deserializable config (intermediate representation)
// ---------------------------------------------------------------------------

/// Raw config as parsed from the TOML file.
/// All fields are optional so that missing keys fall through to defaults.
/// Unknown keys are silently ignored by serde.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    verbose: Option<bool>,
    search: FileSearchConfig,
    history: FileHistoryConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileSearchConfig {
    case_sensitive: Option<bool>,
    whole_word: Option<bool>,
    regex: Option<bool>,
    multi_line: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileHistoryConfig {
    enabled: Option<bool>,
    depth: Option<usize>,
    file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Effective (merged) config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub verbose: bool,
    /// Modes for a query that has none remembered.
    pub default_modes: ModeSet,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Whether the search history is read and written.
    pub enabled: bool,
    /// Maximum number of searched/replaced terms kept.
    pub depth: usize,
    /// History file; `None` means the default location.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            default_modes: ModeSet::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: DEFAULT_HISTORY_DEPTH,
            file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Returns the default config file path: `~/.config/findbar/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("findbar").join("config.toml"))
}

/// Load the config file from the given path.
/// Returns the parsed `FileConfig`, or `None` if the file does not exist
/// or cannot be parsed.
fn load_file_config(path: &Path) -> Option<FileConfig> {
    if !path.exists() {
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!(
                    "findbar: warning: failed to parse config file {}: {}",
                    path.display(),
                    e
                );
                None
            }
        },
        Err(e) => {
            eprintln!(
                "findbar: warning: failed to read config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

/// Overlay the values present in `file_cfg` onto `config`.
fn apply_file_config(config: &mut AppConfig, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.verbose {
        config.verbose = v;
    }

    let search = file_cfg.search;
    let modes = &mut config.default_modes;
    if let Some(v) = search.case_sensitive {
        modes.case_sensitive = v;
    }
    if let Some(v) = search.whole_word {
        modes.whole_word = v;
    }
    if let Some(v) = search.regex {
        modes.regex = v;
    }
    if let Some(v) = search.multi_line {
        modes.multi_line = v;
    }

    let history = file_cfg.history;
    if let Some(v) = history.enabled {
        config.history.enabled = v;
    }
    match history.depth {
        Some(0) => {
            eprintln!("findbar: warning: history depth must be at least 1, using default");
        }
        Some(depth) => config.history.depth = depth,
        None => {}
    }
    if history.file.is_some() {
        config.history.file = history.file;
    }
}

/// Build the effective `AppConfig` by merging defaults, config file, and CLI args.
///
/// Precedence (highest wins):
/// 1. CLI flags (if explicitly provided)
/// 2. Config file values
/// 3. Hardcoded defaults
pub fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::default();

    let config_path = cli.config.clone().or_else(default_config_path);

    if let Some(ref path) = config_path {
        if let Some(file_cfg) = load_file_config(path) {
            apply_file_config(&mut config, file_cfg);
        } else if cli.config.is_some() && !path.exists() {
            // Only complain about a missing file the user asked for.
            eprintln!(
                "findbar: warning: config file not found: {}",
                path.display()
            );
        }
    }

    if cli.verbose {
        config.verbose = true;
    }
    if cli.no_history {
        config.history.enabled = false;
    }

    config
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

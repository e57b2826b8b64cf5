//! Persisted search preferences.
//!
//! Holds the two most-recent-first term lists of the find bar ("searched"
//! and "replaced") and the serialized mode history, which is aligned
//! positionally with the searched list. Stored as TOML:
//!
//! ```toml
//! searched = ["foo", "a.*b"]
//! replaced = ["bar"]
//! search_modes = "!...,..!!"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default number of terms kept in each list.
pub const DEFAULT_HISTORY_DEPTH: usize = 15;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from reading or writing the preferences file.
#[derive(Debug)]
pub enum PrefsError {
    /// The file could not be read or written.
    Io(std::io::Error),
    /// The file exists but is not valid TOML for [`SearchPrefs`].
    Parse(toml::de::Error),
    /// The preferences could not be encoded as TOML.
    Serialize(toml::ser::Error),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "preferences I/O error: {}", e),
            PrefsError::Parse(e) => write!(f, "malformed preferences file: {}", e),
            PrefsError::Serialize(e) => write!(f, "could not encode preferences: {}", e),
        }
    }
}

impl std::error::Error for PrefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrefsError::Io(e) => Some(e),
            PrefsError::Parse(e) => Some(e),
            PrefsError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PrefsError {
    fn from(err: std::io::Error) -> Self {
        PrefsError::Io(err)
    }
}

impl From<toml::de::Error> for PrefsError {
    fn from(err: toml::de::Error) -> Self {
        PrefsError::Parse(err)
    }
}

impl From<toml::ser::Error> for PrefsError {
    fn from(err: toml::ser::Error) -> Self {
        PrefsError::Serialize(err)
    }
}

// ---------------------------------------------------------------------------
// SearchPrefs
// ---------------------------------------------------------------------------

/// The persisted state of the find bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPrefs {
    /// Previously searched terms, most recent first.
    pub searched: Vec<String>,
    /// Previously used replacement texts, most recent first.
    pub replaced: Vec<String>,
    /// Serialized mode history, one block per `searched` entry.
    pub search_modes: String,
    /// Maximum length of each list. Not persisted.
    #[serde(skip)]
    pub depth: usize,
}

impl Default for SearchPrefs {
    fn default() -> Self {
        Self {
            searched: Vec::new(),
            replaced: Vec::new(),
            search_modes: String::new(),
            depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl SearchPrefs {
    /// Empty preferences with the given list depth.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Record `term` as the most recent search.
    pub fn store_searched(&mut self, term: &str) {
        push_front_capped(&mut self.searched, term, self.depth);
    }

    /// Record `term` as the most recent replacement.
    pub fn store_replaced(&mut self, term: &str) {
        push_front_capped(&mut self.replaced, term, self.depth);
    }

    /// Most recent search term, if any.
    pub fn last_searched(&self) -> Option<&str> {
        self.searched.first().map(String::as_str)
    }

    /// Most recent replacement text, if any.
    pub fn last_replaced(&self) -> Option<&str> {
        self.replaced.first().map(String::as_str)
    }

    /// Parse preferences from a TOML string. Lists longer than `depth`
    /// are truncated.
    pub fn from_toml(contents: &str, depth: usize) -> Result<Self, PrefsError> {
        let mut prefs: SearchPrefs = toml::from_str(contents)?;
        prefs.depth = depth;
        prefs.searched.truncate(depth);
        prefs.replaced.truncate(depth);
        Ok(prefs)
    }

    /// Encode as a TOML string.
    pub fn to_toml(&self) -> Result<String, PrefsError> {
        Ok(toml::to_string(self)?)
    }

    /// Write the preferences to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Returns the default preferences path: `<data dir>/findbar/history.toml`
pub fn default_prefs_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("findbar").join("history.toml"))
}

/// Load preferences from `path`.
///
/// A missing file yields empty preferences. An unreadable or malformed
/// file prints a warning and also yields empty preferences, so a corrupt
/// history never blocks searching.
pub fn load_prefs(path: &Path, depth: usize) -> SearchPrefs {
    if !path.exists() {
        return SearchPrefs::with_depth(depth);
    }

    let loaded = std::fs::read_to_string(path)
        .map_err(PrefsError::from)
        .and_then(|contents| SearchPrefs::from_toml(&contents, depth));

    match loaded {
        Ok(prefs) => prefs,
        Err(e) => {
            eprintln!(
                "findbar: warning: ignoring search history {}: {}",
                path.display(),
                e
            );
            SearchPrefs::with_depth(depth)
        }
    }
}

/// Move `term` to the front of `list`, dropping duplicates and empty
/// terms, and cap the list at `depth` entries.
fn push_front_capped(list: &mut Vec<String>, term: &str, depth: usize) {
    if term.is_empty() {
        return;
    }
    list.retain(|t| t != term);
    list.insert(0, term.to_string());
    list.truncate(depth);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

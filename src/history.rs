//! Per-query mode history.
//!
//! Remembers which [`ModeSet`] was active for each previously searched
//! term. The persisted form is a flat string of four-character blocks
//! (`'!'` set, `'.'` cleared) joined by `','`, aligned positionally with
//! the list of searched terms kept in the preferences.
//!
//! Example: searched terms `["foo", "a.*b"]` with modes
//! `{case}` and `{regex, multi-line}` serialize to `"!...,..!!"`.

use std::collections::HashMap;

use crate::modes::{ModeSet, MODE_COUNT};

/// Separator between serialized blocks.
pub const BLOCK_SEPARATOR: char = ',';

/// Mapping from searched term to the modes that were active for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeHistory {
    entries: HashMap<String, ModeSet>,
}

impl ModeHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from its persisted form.
    ///
    /// Blocks are zipped with `queries` up to the shorter of the two. A
    /// block of the wrong length yields an all-false [`ModeSet`] for its
    /// query instead of failing.
    pub fn deserialize(serialized: &str, queries: &[String]) -> Self {
        let entries = serialized
            .split(BLOCK_SEPARATOR)
            .zip(queries)
            .map(|(block, query)| {
                let modes = ModeSet::from_block(block).unwrap_or_default();
                (query.clone(), modes)
            })
            .collect();
        Self { entries }
    }

    /// Serialize the modes of `queries`, in order.
    ///
    /// A query without an entry is captured with `fallback` (the live
    /// modes), and that entry is stored.
    pub fn serialize(&mut self, queries: &[String], fallback: ModeSet) -> String {
        let blocks: Vec<String> = queries
            .iter()
            .map(|query| {
                self.entries
                    .entry(query.clone())
                    .or_insert(fallback)
                    .to_block()
            })
            .collect();
        blocks.join(&BLOCK_SEPARATOR.to_string())
    }

    /// The remembered modes for `query`, if any.
    pub fn lookup(&self, query: &str) -> Option<ModeSet> {
        self.entries.get(query).copied()
    }

    /// Number of remembered queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no query is remembered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the history to store at a commit point.
    ///
    /// Every term in `queries` keeps its remembered modes, except the
    /// term equal to `current_query` and terms never seen before: those
    /// take `current_modes`. Terms no longer in `queries` are dropped.
    /// Returns the new history together with its serialized form.
    pub fn rebuild(
        &self,
        queries: &[String],
        current_query: &str,
        current_modes: ModeSet,
    ) -> (ModeHistory, String) {
        let mut next = ModeHistory::new();
        for query in queries {
            let modes = match self.lookup(query) {
                Some(modes) if query != current_query => modes,
                _ => current_modes,
            };
            next.entries.insert(query.clone(), modes);
        }
        let serialized = next.serialize(queries, current_modes);
        (next, serialized)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Find bar controller.
//!
//! [`SearchController`] owns the live query, the current [`ModeSet`], the
//! panel visibility and the per-query mode history. Every query or mode
//! change recomputes the match list against the bound [`HostEditor`] and
//! reports the hit count back to it. Navigation and replace-all are
//! issued to the host as selection and edit commands.
//!
//! History is committed at well-defined points only: Enter, closing the
//! panel, toggling a mode, presetting a new term and replacing. A commit
//! pushes the query onto the searched list and rebuilds the serialized
//! mode history in [`SearchPrefs`].

use crate::history::ModeHistory;
use crate::host::HostEditor;
use crate::modes::{Mode, ModeSet};
use crate::prefs::SearchPrefs;
use crate::replace;
use crate::search::{self, Direction, MatchResult};

// ---------------------------------------------------------------------------
// Key intents
// ---------------------------------------------------------------------------

/// Keyboard intents the host forwards from the query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Editor-level "find next" shortcut pressed while in the field.
    FindNext,
    /// Editor-level "find previous" shortcut pressed while in the field.
    FindPrevious,
    /// Closes the panel if the field is empty, else returns focus.
    Escape,
    /// Commit and jump to the next match.
    Enter,
    /// Jump to the previous match.
    ShiftEnter,
    /// Recall an older searched term.
    HistoryPrevious,
    /// Recall a newer searched term.
    HistoryNext,
}

/// Direction of a history recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Older,
    Newer,
}

// ---------------------------------------------------------------------------
// Search report
// ---------------------------------------------------------------------------

/// Summary of the latest recompute, sent to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Number of matches.
    pub hit_count: usize,
    /// True if the effective query was empty (no active search).
    pub is_empty: bool,
}

impl SearchReport {
    /// Whether replace-all should be offered.
    pub fn replace_enabled(&self) -> bool {
        self.hit_count > 0 && !self.is_empty
    }

    /// Status line for the host, `None` when no search is active.
    pub fn status_message(&self) -> Option<String> {
        if self.is_empty {
            return None;
        }
        Some(match self.hit_count {
            1 => "1 string found".to_string(),
            n => format!("{} strings found", n),
        })
    }
}

// ---------------------------------------------------------------------------
// SearchController
// ---------------------------------------------------------------------------

/// Incremental search-and-replace state bound to one host editor.
#[derive(Debug)]
pub struct SearchController<H: HostEditor> {
    host: Option<H>,
    query: String,
    replacement: String,
    modes: ModeSet,
    visible: bool,
    prefs: SearchPrefs,
    history: ModeHistory,
    result: MatchResult,
    report: Option<SearchReport>,
    recall_cursor: Option<usize>,
}

impl<H: HostEditor> SearchController<H> {
    /// Create a hidden, unbound controller from persisted preferences.
    ///
    /// The query field is preset with the most recent search term and
    /// takes the modes remembered for it, or `default_modes`.
    pub fn new(prefs: SearchPrefs, default_modes: ModeSet) -> Self {
        let history = ModeHistory::deserialize(&prefs.search_modes, &prefs.searched);
        let query = prefs.last_searched().unwrap_or_default().to_string();
        let replacement = prefs.last_replaced().unwrap_or_default().to_string();
        let modes = history.lookup(&query).unwrap_or(default_modes);

        Self {
            host: None,
            query,
            replacement,
            modes,
            visible: false,
            prefs,
            history,
            result: MatchResult::empty(),
            report: None,
            recall_cursor: None,
        }
    }

    // -- Binding ------------------------------------------------------------

    /// Bind to `host`, returning the previously bound editor.
    ///
    /// Match results and the last report are reset; query, modes and
    /// history carry over. With `search`, the new buffer is searched
    /// immediately without moving the selection.
    pub fn bind(&mut self, host: H, search: bool) -> Option<H> {
        let previous = self.host.replace(host);
        self.result = MatchResult::empty();
        self.report = None;
        if search {
            self.search(false);
        }
        previous
    }

    /// Detach the bound editor.
    pub fn unbind(&mut self) -> Option<H> {
        self.result = MatchResult::empty();
        self.report = None;
        self.host.take()
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    // -- Accessors ------------------------------------------------------------

    /// Text of the query field (kept while the panel is hidden).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Text of the replace field.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn modes(&self) -> ModeSet {
        self.modes
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The last computed matches.
    pub fn result(&self) -> &MatchResult {
        &self.result
    }

    /// The last report sent to the host.
    pub fn report(&self) -> Option<SearchReport> {
        self.report
    }

    pub fn history(&self) -> &ModeHistory {
        &self.history
    }

    /// The preferences to persist.
    pub fn prefs(&self) -> &SearchPrefs {
        &self.prefs
    }

    /// Whether the replace controls apply to the bound editor.
    pub fn can_replace(&self) -> bool {
        self.host.as_ref().is_some_and(|h| h.is_editable())
    }

    // -- Field edits ------------------------------------------------------------

    /// The user edited the query field.
    ///
    /// In regex mode, typing an unescaped `\n` switches multi-line on.
    pub fn on_query_edited(&mut self, text: &str) {
        if text == self.query {
            return;
        }
        if self.modes.regex && has_unescaped_newline(text) {
            self.modes.multi_line = true;
        }
        self.query = text.to_string();
        self.recall_cursor = None;
        self.search(true);
    }

    /// The user edited the replace field.
    pub fn on_replacement_edited(&mut self, text: &str) {
        self.replacement = text.to_string();
    }

    /// The user clicked a mode toggle. Returns the new flag value.
    pub fn on_mode_toggled(&mut self, mode: Mode) -> bool {
        let value = self.modes.toggle(mode);
        self.commit_history();
        self.search(false);
        value
    }

    /// Replace all four flags without committing or searching.
    pub fn set_modes(&mut self, modes: ModeSet) {
        self.modes = modes;
    }

    /// Apply the modes remembered for the current query, if any.
    ///
    /// Returns true if the live modes changed (and were re-searched).
    pub fn recall_modes(&mut self) -> bool {
        match self.history.lookup(&self.query) {
            Some(modes) if modes != self.modes => {
                self.modes = modes;
                self.search(false);
                true
            }
            _ => false,
        }
    }

    /// Step through the searched terms and restore the modes that were
    /// active for the recalled term.
    pub fn on_history_recall(&mut self, step: HistoryStep) {
        if let Some(term) = self.step_recall_cursor(step) {
            if term != self.query {
                self.query = term;
                if let Some(modes) = self.history.lookup(&self.query) {
                    self.modes = modes;
                }
                self.search(true);
                return;
            }
        }
        self.recall_modes();
    }

    /// Dispatch a key intent from the query field.
    pub fn on_key_intent(&mut self, intent: KeyIntent) {
        match intent {
            KeyIntent::FindNext | KeyIntent::FindPrevious => {
                if let Some(host) = self.host.as_mut() {
                    host.select_none();
                }
                self.deactivate(false);
            }
            KeyIntent::Escape => {
                let close = self.query.is_empty();
                self.deactivate(close);
            }
            KeyIntent::Enter => self.jump(Direction::Forward, true),
            KeyIntent::ShiftEnter => self.jump(Direction::Backward, false),
            KeyIntent::HistoryPrevious => self.on_history_recall(HistoryStep::Older),
            KeyIntent::HistoryNext => self.on_history_recall(HistoryStep::Newer),
        }
    }

    // -- Navigation and replace ---------------------------------------------------

    /// Move to the next/previous/current match relative to the caret.
    pub fn jump(&mut self, direction: Direction, commit: bool) {
        if commit {
            self.commit_history();
        }
        let Some(host) = self.host.as_mut() else {
            return;
        };

        let caret = host.current_caret_offset();
        match self.result.navigate(direction, caret) {
            Some(span) => host.select_span(span),
            None => host.select_none(),
        }

        let report = SearchReport {
            hit_count: self.result.hit_count(),
            is_empty: self.effective_query().is_empty(),
        };
        self.send_report(report);
    }

    /// Replace every current match with `replacement`, then close.
    ///
    /// In regex mode `\n`, `\t` and `\\` in the replacement are decoded;
    /// in literal mode it is used verbatim.
    pub fn replace(&mut self, replacement: &str) {
        self.commit_history();
        self.replacement = replacement.to_string();
        self.prefs.store_replaced(replacement);

        let text = if self.modes.regex {
            replace::decode(replacement)
        } else {
            replacement.to_string()
        };

        if let Some(host) = self.host.as_mut() {
            if host.is_editable() && !self.result.is_empty() {
                host.replace_spans(&self.result.spans, &text);
            }
        }

        self.deactivate(true);
    }

    // -- Visibility ---------------------------------------------------------------

    /// Show the panel, optionally preset with a new term.
    ///
    /// A non-empty `preset` different from the field text switches regex
    /// off, becomes the query and is committed. The buffer is searched if
    /// the query changed or the panel was hidden.
    pub fn activate(&mut self, preset: &str, take_focus: bool) {
        let mut refresh = !self.visible;
        if refresh {
            self.visible = true;
            if let Some(host) = self.host.as_mut() {
                host.set_trigger_selected(true);
            }
        }
        if take_focus {
            if let Some(host) = self.host.as_mut() {
                host.focus_search_field();
            }
        }

        if !preset.is_empty() && preset != self.query {
            self.modes.regex = false;
            self.query = preset.to_string();
            self.recall_cursor = None;
            self.commit_history();
            refresh = true;
        }

        if refresh {
            self.search(true);
        }
    }

    /// Commit history and return focus to the editor; with `close`, also
    /// hide the panel and clear the highlighting.
    ///
    /// Returns true if the panel was closed.
    pub fn deactivate(&mut self, close: bool) -> bool {
        self.commit_history();
        if let Some(host) = self.host.as_mut() {
            host.focus_self();
        }
        if !close || !self.visible {
            return false;
        }

        self.visible = false;
        if let Some(host) = self.host.as_mut() {
            host.set_trigger_selected(false);
        }
        self.search(true);
        true
    }

    /// Record the query and the live modes in the persisted history.
    pub fn commit_history(&mut self) {
        self.prefs.store_searched(&self.query);
        let (history, serialized) =
            self.history
                .rebuild(&self.prefs.searched, &self.query, self.modes);
        self.history = history;
        self.prefs.search_modes = serialized;
        // The searched list was reordered; re-anchor on the next recall.
        self.recall_cursor = None;
    }

    // -- Internals ------------------------------------------------------------

    /// The query the engine sees: empty while the panel is hidden.
    fn effective_query(&self) -> &str {
        if self.visible {
            &self.query
        } else {
            ""
        }
    }

    /// Recompute matches, position the active match at the caret and
    /// report. With `jump`, the host selection follows the active match.
    fn search(&mut self, jump: bool) {
        let query = if self.visible { self.query.as_str() } else { "" };
        let Some(host) = self.host.as_mut() else {
            self.result = MatchResult::empty();
            return;
        };

        let mut result = search::recompute(host.text(), query, &self.modes);
        let active = result.navigate(Direction::Current, host.current_caret_offset());
        if jump {
            match active {
                Some(span) => host.select_span(span),
                // An empty query leaves the selection alone.
                None if !query.is_empty() => host.select_none(),
                None => {}
            }
        }

        let report = SearchReport {
            hit_count: result.hit_count(),
            is_empty: query.is_empty(),
        };
        self.result = result;
        self.send_report(report);
    }

    fn send_report(&mut self, report: SearchReport) {
        if let Some(host) = self.host.as_mut() {
            host.notify_match_result(&report);
        }
        self.report = Some(report);
    }

    /// Move the recall cursor over the searched list (0 = most recent).
    fn step_recall_cursor(&mut self, step: HistoryStep) -> Option<String> {
        let searched = &self.prefs.searched;
        let anchor = self
            .recall_cursor
            .or_else(|| searched.iter().position(|t| *t == self.query));

        let next = match (step, anchor) {
            (HistoryStep::Older, Some(idx)) => idx + 1,
            (HistoryStep::Older, None) => 0,
            (HistoryStep::Newer, Some(idx)) if idx > 0 => idx - 1,
            (HistoryStep::Newer, _) => return None,
        };

        let term = searched.get(next)?.clone();
        self.recall_cursor = Some(next);
        Some(term)
    }
}

/// Returns true if `text` contains a backslash followed by `n` that is
/// not itself preceded by a backslash.
pub fn has_unescaped_newline(text: &str) -> bool {
    let bytes = text.as_bytes();
    (0..bytes.len().saturating_sub(1)).any(|i| {
        bytes[i] == b'\\' && bytes[i + 1] == b'n' && (i == 0 || bytes[i - 1] != b'\\')
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

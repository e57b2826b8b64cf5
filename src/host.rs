//! The host-editor contract.
//!
//! The search engine never owns the text surface. It queries and
//! commands the editor it is bound to through [`HostEditor`]: read the
//! buffer and caret, select a span, apply a replacement, move focus.
//! [`BufferEditor`] is an in-memory host used by the command-line driver
//! and the tests.

use crate::controller::SearchReport;
use crate::search::MatchSpan;

// ---------------------------------------------------------------------------
// HostEditor trait
// ---------------------------------------------------------------------------

/// Operations the search controller needs from a text editor.
pub trait HostEditor {
    /// The full text buffer.
    fn text(&self) -> &str;

    /// Caret position as a byte offset into [`HostEditor::text`].
    fn current_caret_offset(&self) -> usize;

    /// Select `span`. The caret moves to `span.start`.
    fn select_span(&mut self, span: MatchSpan);

    /// Clear the selection, leaving the caret where it is.
    fn select_none(&mut self);

    /// Replace every span with `text` as a single undoable edit.
    ///
    /// Spans are non-overlapping and in buffer order.
    fn replace_spans(&mut self, spans: &[MatchSpan], text: &str);

    /// Whether the buffer accepts edits. Replace is only offered if true.
    fn is_editable(&self) -> bool;

    /// Give keyboard focus back to the text surface.
    fn focus_self(&mut self);

    /// Give keyboard focus to the query field of the find bar.
    fn focus_search_field(&mut self) {}

    /// Reflect the find bar visibility on the control that toggles it.
    fn set_trigger_selected(&mut self, _selected: bool) {}

    /// Receive the summary of the latest recompute.
    fn notify_match_result(&mut self, _report: &SearchReport) {}
}

// ---------------------------------------------------------------------------
// BufferEditor
// ---------------------------------------------------------------------------

/// Where keyboard focus currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Editor,
    SearchField,
}

/// An in-memory editor backed by a `String`.
#[derive(Debug, Clone, Default)]
pub struct BufferEditor {
    text: String,
    caret: usize,
    selection: Option<MatchSpan>,
    editable: bool,
    focus: Focus,
    trigger_selected: bool,
    last_report: Option<SearchReport>,
    edit_count: usize,
}

impl BufferEditor {
    /// An editable buffer with the caret at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            editable: true,
            ..Self::default()
        }
    }

    /// A read-only buffer with the caret at the start.
    pub fn read_only(text: impl Into<String>) -> Self {
        Self {
            editable: false,
            ..Self::new(text)
        }
    }

    /// Move the caret, clamped to the buffer and snapped back to a char
    /// boundary.
    pub fn set_caret(&mut self, offset: usize) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.caret = offset;
        self.selection = None;
    }

    pub fn selection(&self) -> Option<MatchSpan> {
        self.selection
    }

    /// The selected text, if any.
    pub fn selected_text(&self) -> Option<&str> {
        self.selection.map(|s| &self.text[s.start..s.end])
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn trigger_selected(&self) -> bool {
        self.trigger_selected
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    /// Number of edits applied through [`HostEditor::replace_spans`].
    pub fn edit_count(&self) -> usize {
        self.edit_count
    }

    /// Consume the editor and return its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl HostEditor for BufferEditor {
    fn text(&self) -> &str {
        &self.text
    }

    fn current_caret_offset(&self) -> usize {
        self.caret
    }

    fn select_span(&mut self, span: MatchSpan) {
        self.caret = span.start;
        self.selection = Some(span);
    }

    fn select_none(&mut self) {
        self.selection = None;
    }

    fn replace_spans(&mut self, spans: &[MatchSpan], text: &str) {
        if spans.is_empty() || !self.editable {
            return;
        }

        let mut out = String::with_capacity(self.text.len());
        let mut copied = 0;
        for span in spans {
            out.push_str(&self.text[copied..span.start]);
            out.push_str(text);
            copied = span.end;
        }
        out.push_str(&self.text[copied..]);

        // Caret lands after the last replacement.
        let last_end = spans.last().map_or(0, |s| s.end);
        let shift = spans.len() * text.len();
        let removed: usize = spans.iter().map(MatchSpan::len).sum();
        self.caret = last_end + shift - removed;
        self.text = out;
        self.selection = None;
        self.edit_count += 1;
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn focus_self(&mut self) {
        self.focus = Focus::Editor;
    }

    fn focus_search_field(&mut self) {
        self.focus = Focus::SearchField;
    }

    fn set_trigger_selected(&mut self, selected: bool) {
        self.trigger_selected = selected;
    }

    fn notify_match_result(&mut self, report: &SearchReport) {
        self.last_report = Some(*report);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_span_moves_caret_to_start() {
        let mut editor = BufferEditor::new("hello world");
        editor.select_span(MatchSpan::new(6, 11));
        assert_eq!(editor.current_caret_offset(), 6);
        assert_eq!(editor.selected_text(), Some("world"));

        editor.select_none();
        assert_eq!(editor.selection(), None);
        assert_eq!(editor.current_caret_offset(), 6);
    }

    #[test]
    fn test_replace_spans_single_edit() {
        let mut editor = BufferEditor::new("foo bar foo");
        editor.replace_spans(&[MatchSpan::new(0, 3), MatchSpan::new(8, 11)], "baz");
        assert_eq!(editor.text(), "baz bar baz");
        assert_eq!(editor.edit_count(), 1);
        assert_eq!(editor.current_caret_offset(), 11);
    }

    #[test]
    fn test_replace_spans_with_different_length() {
        let mut editor = BufferEditor::new("a-b-c");
        editor.replace_spans(&[MatchSpan::new(1, 2), MatchSpan::new(3, 4)], "\n\n");
        assert_eq!(editor.text(), "a\n\nb\n\nc");
        assert_eq!(editor.current_caret_offset(), 6);
    }

    #[test]
    fn test_replace_spans_empty_list_is_noop() {
        let mut editor = BufferEditor::new("unchanged");
        editor.replace_spans(&[], "x");
        assert_eq!(editor.text(), "unchanged");
        assert_eq!(editor.edit_count(), 0);
    }

    #[test]
    fn test_read_only_rejects_edits() {
        let mut editor = BufferEditor::read_only("locked");
        assert!(!editor.is_editable());
        editor.replace_spans(&[MatchSpan::new(0, 6)], "open");
        assert_eq!(editor.text(), "locked");
    }

    #[test]
    fn test_set_caret_clamps_and_snaps() {
        let mut editor = BufferEditor::new("aé");
        editor.set_caret(100);
        assert_eq!(editor.current_caret_offset(), 3);
        editor.set_caret(2); // inside 'é'
        assert_eq!(editor.current_caret_offset(), 1);
    }

    #[test]
    fn test_focus_and_trigger() {
        let mut editor = BufferEditor::new("");
        assert_eq!(editor.focus(), Focus::Editor);
        editor.focus_search_field();
        assert_eq!(editor.focus(), Focus::SearchField);
        editor.focus_self();
        assert_eq!(editor.focus(), Focus::Editor);

        editor.set_trigger_selected(true);
        assert!(editor.trigger_selected());
    }
}

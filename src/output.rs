//! Rendering of match listings for the command-line driver.

use serde::Serialize;

use crate::search::MatchResult;

/// One match, located in the buffer for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
    /// 1-based column of `start`, in characters.
    pub column: usize,
    /// The matched text.
    pub text: String,
    /// Whether this is the active match.
    pub active: bool,
}

/// 1-based `(line, column)` of a byte offset; the column counts chars.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Locate every match of `result` in `text`.
pub fn describe_matches(text: &str, result: &MatchResult) -> Vec<MatchRecord> {
    result
        .spans
        .iter()
        .enumerate()
        .map(|(idx, span)| {
            let (line, column) = line_col(text, span.start);
            MatchRecord {
                start: span.start,
                end: span.end,
                line,
                column,
                text: text[span.start..span.end].to_string(),
                active: result.active_index == Some(idx),
            }
        })
        .collect()
}

/// `line:column: text`, one match per line. Line breaks inside a match
/// are shown as `\n`.
pub fn render_plain(records: &[MatchRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{}:{}: {}\n",
            record.line,
            record.column,
            record.text.replace('\r', "\\r").replace('\n', "\\n")
        ));
    }
    out
}

/// A pretty-printed JSON array of records.
pub fn render_json(records: &[MatchRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Matching engine and navigation logic.
//!
//! [`recompute`] turns a query, a [`ModeSet`] and a text buffer into an
//! ordered list of non-overlapping [`MatchSpan`]s. Results are never
//! patched incrementally; every query or mode change recomputes from
//! scratch. [`advance`] only moves the active index.
//!
//! Two matching paths:
//! - **Literal**: exact substring, case-folded unless case-sensitive,
//!   optionally restricted to whole words.
//! - **Regex**: applied line by line, or across the whole buffer with
//!   multi-line semantics (`^`/`$` at line boundaries, `.` matching `\n`).
//!   A malformed pattern yields no matches rather than an error.
//!
//! All offsets are byte offsets into the original buffer.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::modes::ModeSet;

// ---------------------------------------------------------------------------
// Match span
// ---------------------------------------------------------------------------

/// A half-open byte range `[start, end)` in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Navigation direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Re-show the active match without moving.
    #[default]
    Current,
    /// Next match after the caret, wrapping to the first.
    Forward,
    /// Previous match before the caret, wrapping to the last.
    Backward,
}

// ---------------------------------------------------------------------------
// Match result
// ---------------------------------------------------------------------------

/// All matches for a query plus the currently navigated-to one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Matches in buffer order.
    pub spans: Vec<MatchSpan>,
    /// Index of the active match; `None` when `spans` is empty.
    pub active_index: Option<usize>,
}

impl MatchResult {
    /// A result with no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of matches.
    pub fn hit_count(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The active span, if any.
    pub fn active_span(&self) -> Option<MatchSpan> {
        self.active_index.and_then(|idx| self.spans.get(idx)).copied()
    }

    /// Move the active index relative to `from_offset` and return the new
    /// active span.
    ///
    /// - `Current`: keep the active index if it is still in range, else the
    ///   first span starting at or after `from_offset`, else the last span.
    /// - `Forward`: first span starting after `from_offset`, else the first.
    /// - `Backward`: last span starting before `from_offset`, else the last.
    pub fn navigate(&mut self, direction: Direction, from_offset: usize) -> Option<MatchSpan> {
        let len = self.spans.len();
        if len == 0 {
            self.active_index = None;
            return None;
        }

        let index = match direction {
            Direction::Current => self
                .active_index
                .filter(|&idx| idx < len)
                .or_else(|| self.spans.iter().position(|s| s.start >= from_offset))
                .unwrap_or(len - 1),
            Direction::Forward => self
                .spans
                .iter()
                .position(|s| s.start > from_offset)
                .unwrap_or(0),
            Direction::Backward => self
                .spans
                .iter()
                .rposition(|s| s.start < from_offset)
                .unwrap_or(len - 1),
        };

        self.active_index = Some(index);
        self.spans.get(index).copied()
    }

    /// Format the match counter for display (e.g. `"[3/17]"`).
    pub fn counter_display(&self) -> String {
        match self.active_index {
            Some(idx) if !self.spans.is_empty() => {
                format!("[{}/{}]", idx + 1, self.spans.len())
            }
            _ => format!("[0/{}]", self.spans.len()),
        }
    }
}

/// Functional form of [`MatchResult::navigate`].
pub fn advance(mut result: MatchResult, direction: Direction, from_offset: usize) -> MatchResult {
    result.navigate(direction, from_offset);
    result
}

// ---------------------------------------------------------------------------
// Matching engine
// ---------------------------------------------------------------------------

/// Compute all matches of `query` in `buffer` under `modes`.
///
/// The empty query matches nothing. The active index is left unset; the
/// caller positions it with [`MatchResult::navigate`].
pub fn recompute(buffer: &str, query: &str, modes: &ModeSet) -> MatchResult {
    if query.is_empty() {
        return MatchResult::empty();
    }

    let spans = if modes.regex {
        find_regex(buffer, query, modes)
    } else {
        find_literal(
            buffer,
            query,
            modes.case_sensitive,
            modes.effective_whole_word(),
        )
    };

    MatchResult {
        spans,
        active_index: None,
    }
}

/// Find all non-overlapping literal occurrences of `query`.
///
/// Case-insensitive search runs on lowercased copies, and offsets are
/// mapped back to the **original** `text`: some characters change byte
/// length when lowercased (e.g. Turkish İ U+0130, German ẞ U+1E9E) and
/// callers slice the original text with these offsets.
///
/// Occurrences are found left-to-right, resuming after each match. With
/// `whole_word`, a candidate touching a word character on either side is
/// skipped and the scan resumes one character later.
pub fn find_literal(
    text: &str,
    query: &str,
    case_sensitive: bool,
    whole_word: bool,
) -> Vec<MatchSpan> {
    if query.is_empty() {
        return Vec::new();
    }

    let (haystack, needle): (Cow<'_, str>, Cow<'_, str>) = if case_sensitive {
        (Cow::Borrowed(text), Cow::Borrowed(query))
    } else {
        (Cow::Owned(text.to_lowercase()), Cow::Owned(query.to_lowercase()))
    };
    let lower_to_orig = (!case_sensitive).then(|| build_lower_to_orig_map(text));
    let to_orig = |pos: usize| match &lower_to_orig {
        Some(map) => map_lower_to_orig(map, pos),
        None => Some(pos),
    };

    let mut spans = Vec::new();
    let mut from = 0; // byte offset in the haystack

    while from < haystack.len() {
        let Some(pos) = haystack[from..].find(&*needle) else {
            break;
        };
        let hay_start = from + pos;
        let hay_end = hay_start + needle.len();
        let span = to_orig(hay_start)
            .zip(to_orig(hay_end))
            .map(|(start, end)| MatchSpan::new(start, end))
            .filter(|span| {
                !span.is_empty() && (!whole_word || is_whole_word(text, span.start, span.end))
            });

        let Some(span) = span else {
            let step = haystack[hay_start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            from = hay_start + step;
            continue;
        };

        spans.push(span);
        from = hay_end;
    }

    spans
}

/// Find all non-empty regex matches of `query`.
///
/// Without multi-line mode the pattern is applied to each line on its
/// own, so matches never cross a line break.
fn find_regex(text: &str, query: &str, modes: &ModeSet) -> Vec<MatchSpan> {
    let Ok(regex) = build_regex(query, modes) else {
        return Vec::new();
    };

    let mut spans = Vec::new();
    if modes.effective_multi_line() {
        collect_regex_matches(&regex, text, 0, &mut spans);
    } else {
        let mut line_start = 0;
        for line in text.split('\n') {
            let content = line.strip_suffix('\r').unwrap_or(line);
            collect_regex_matches(&regex, content, line_start, &mut spans);
            line_start += line.len() + 1;
        }
    }
    spans
}

fn collect_regex_matches(regex: &Regex, haystack: &str, base: usize, out: &mut Vec<MatchSpan>) {
    out.extend(
        regex
            .find_iter(haystack)
            .filter(|m| m.start() < m.end())
            .map(|m| MatchSpan::new(base + m.start(), base + m.end())),
    );
}

fn build_regex(query: &str, modes: &ModeSet) -> Result<Regex, regex::Error> {
    let multi = modes.effective_multi_line();
    RegexBuilder::new(query)
        .case_insensitive(!modes.case_sensitive)
        .multi_line(multi)
        .dot_matches_new_line(multi)
        .build()
}

/// Returns true if `[start, end)` is not adjacent to a word character.
pub fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// Word characters: Unicode letters and digits, plus `_`.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Build a mapping from lowercased byte positions to original byte positions.
///
/// Returns a sorted `Vec<(lower_byte_offset, orig_byte_offset)>` with one
/// entry per character plus a sentinel for the end of the string.
fn build_lower_to_orig_map(text: &str) -> Vec<(usize, usize)> {
    let mut map = Vec::with_capacity(text.len() + 1);
    let mut lower_offset: usize = 0;
    let mut orig_offset: usize = 0;

    for ch in text.chars() {
        map.push((lower_offset, orig_offset));
        lower_offset += ch.to_lowercase().map(char::len_utf8).sum::<usize>();
        orig_offset += ch.len_utf8();
    }

    map.push((lower_offset, orig_offset));
    map
}

/// Look up the original byte offset for a given lowercased byte offset.
///
/// Returns `None` for an offset that falls inside the lowercase expansion
/// of a character.
fn map_lower_to_orig(map: &[(usize, usize)], lower_pos: usize) -> Option<usize> {
    map.binary_search_by_key(&lower_pos, |&(lo, _)| lo)
        .ok()
        .map(|idx| map[idx].1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

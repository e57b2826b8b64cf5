//! Escape decoding for replacement text.
//!
//! Only applied in regex mode: there `\n` and `\t` in the replace field
//! stand for a newline and a tab. In literal mode the replacement is used
//! verbatim.

/// Decode `\n`, `\t` and `\\` escapes.
///
/// Any other escape (`\x`) is kept as a backslash followed by `x`, and a
/// trailing lone backslash is emitted as-is. Never fails.
pub fn decode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

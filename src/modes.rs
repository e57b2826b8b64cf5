//! Search mode toggles.
//!
//! A [`ModeSet`] holds the four orthogonal flags of the find bar. Two of
//! them depend on the regex flag: whole-word only applies to literal
//! searches, multi-line only to regex searches. A disabled flag keeps its
//! stored value ("dormant") so it comes back when regex is toggled again;
//! use the `effective_*` accessors when matching.

/// Number of flags in a [`ModeSet`] and characters in a serialized block.
pub const MODE_COUNT: usize = 4;

/// Character used for a set flag in the serialized form.
pub const FLAG_ON: char = '!';
/// Character used for a cleared flag in the serialized form.
pub const FLAG_OFF: char = '.';

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Names a single toggle, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    CaseSensitive,
    WholeWord,
    Regex,
    MultiLine,
}

impl Mode {
    /// All modes in serialization order.
    pub const ALL: [Mode; MODE_COUNT] = [
        Mode::CaseSensitive,
        Mode::WholeWord,
        Mode::Regex,
        Mode::MultiLine,
    ];
}

// ---------------------------------------------------------------------------
// ModeSet
// ---------------------------------------------------------------------------

/// The live combination of search toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModeSet {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub regex: bool,
    pub multi_line: bool,
}

impl ModeSet {
    /// Read a single flag (stored value, dormant or not).
    pub fn get(&self, mode: Mode) -> bool {
        match mode {
            Mode::CaseSensitive => self.case_sensitive,
            Mode::WholeWord => self.whole_word,
            Mode::Regex => self.regex,
            Mode::MultiLine => self.multi_line,
        }
    }

    /// Write a single flag. Never touches the other flags.
    pub fn set(&mut self, mode: Mode, value: bool) {
        match mode {
            Mode::CaseSensitive => self.case_sensitive = value,
            Mode::WholeWord => self.whole_word = value,
            Mode::Regex => self.regex = value,
            Mode::MultiLine => self.multi_line = value,
        }
    }

    /// Flip a single flag and return its new value.
    pub fn toggle(&mut self, mode: Mode) -> bool {
        let value = !self.get(mode);
        self.set(mode, value);
        value
    }

    /// Whether the toggle for `mode` is applicable given the regex flag.
    ///
    /// Hosts grey out the toggle when this returns false.
    pub fn is_enabled(&self, mode: Mode) -> bool {
        match mode {
            Mode::WholeWord => !self.regex,
            Mode::MultiLine => self.regex,
            Mode::CaseSensitive | Mode::Regex => true,
        }
    }

    /// Whole-word matching as honored by the engine.
    pub fn effective_whole_word(&self) -> bool {
        self.whole_word && !self.regex
    }

    /// Multi-line matching as honored by the engine.
    pub fn effective_multi_line(&self) -> bool {
        self.multi_line && self.regex
    }

    /// Encode as a four-character block of `'!'`/`'.'`.
    pub fn to_block(&self) -> String {
        Mode::ALL
            .iter()
            .map(|&m| if self.get(m) { FLAG_ON } else { FLAG_OFF })
            .collect()
    }

    /// Decode a four-character block.
    ///
    /// Returns `None` if the block does not have exactly [`MODE_COUNT`]
    /// characters. Any character other than `'!'` reads as false.
    pub fn from_block(block: &str) -> Option<ModeSet> {
        if block.chars().count() != MODE_COUNT {
            return None;
        }
        let mut modes = ModeSet::default();
        for (mode, ch) in Mode::ALL.iter().zip(block.chars()) {
            modes.set(*mode, ch == FLAG_ON);
        }
        Some(modes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_all_false() {
        let modes = ModeSet::default();
        for mode in Mode::ALL {
            assert!(!modes.get(mode));
        }
        assert_eq!(modes.to_block(), "....");
    }

    #[test]
    fn test_toggle_regex_keeps_whole_word_dormant() {
        let mut modes = ModeSet {
            whole_word: true,
            ..ModeSet::default()
        };
        assert!(modes.effective_whole_word());

        modes.toggle(Mode::Regex);
        assert!(modes.whole_word, "stored value must survive");
        assert!(!modes.effective_whole_word());
        assert!(!modes.is_enabled(Mode::WholeWord));
        assert!(modes.is_enabled(Mode::MultiLine));

        modes.toggle(Mode::Regex);
        assert!(modes.effective_whole_word());
    }

    #[test]
    fn test_multi_line_only_effective_with_regex() {
        let mut modes = ModeSet {
            multi_line: true,
            ..ModeSet::default()
        };
        assert!(!modes.effective_multi_line());
        modes.set(Mode::Regex, true);
        assert!(modes.effective_multi_line());
    }

    #[rstest]
    #[case(ModeSet { case_sensitive: true, ..ModeSet::default() }, "!...")]
    #[case(ModeSet { whole_word: true, ..ModeSet::default() }, ".!..")]
    #[case(ModeSet { regex: true, multi_line: true, ..ModeSet::default() }, "..!!")]
    #[case(ModeSet { case_sensitive: true, whole_word: true, regex: true, multi_line: true }, "!!!!")]
    fn test_block_encoding(#[case] modes: ModeSet, #[case] block: &str) {
        assert_eq!(modes.to_block(), block);
        assert_eq!(ModeSet::from_block(block), Some(modes));
    }

    #[rstest]
    #[case("")]
    #[case("!!!")]
    #[case("!!!!!")]
    fn test_from_block_rejects_wrong_length(#[case] block: &str) {
        assert_eq!(ModeSet::from_block(block), None);
    }

    #[test]
    fn test_from_block_unknown_chars_are_false() {
        let modes = ModeSet::from_block("x!?!").unwrap();
        assert!(!modes.case_sensitive);
        assert!(modes.whole_word);
        assert!(!modes.regex);
        assert!(modes.multi_line);
    }
}

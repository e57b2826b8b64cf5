use clap::Parser;
use std::path::PathBuf;

use crate::modes::ModeSet;

/// Incremental search and replace over a text file
#[derive(Parser, Debug)]
#[command(name = "findbar", about = "Search and replace in a text file")]
pub struct Cli {
    /// File to search.
    pub file: PathBuf,

    /// Text or pattern to search for.
    pub query: String,

    /// Match case exactly.
    #[arg(short = 'c', long, default_value_t = false)]
    pub case_sensitive: bool,

    /// Only match whole words (literal mode only).
    #[arg(short = 'w', long, default_value_t = false)]
    pub whole_word: bool,

    /// Treat the query as a regular expression.
    #[arg(short = 'r', long, default_value_t = false)]
    pub regex: bool,

    /// Let the pattern span lines (regex mode only).
    #[arg(short = 'm', long, default_value_t = false)]
    pub multi_line: bool,

    /// Replace every match with this text. In regex mode `\n`, `\t` and
    /// `\\` are decoded.
    #[arg(long)]
    pub replace: Option<String>,

    /// Write the replaced text back to the file instead of stdout.
    #[arg(long, default_value_t = false, requires = "replace")]
    pub in_place: bool,

    /// Print matches as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Neither read nor write the search history.
    #[arg(long, default_value_t = false)]
    pub no_history: bool,

    /// Print diagnostics to stderr.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The modes given on the command line, or `None` if no mode flag
    /// was passed (remembered or configured modes apply then).
    pub fn explicit_modes(&self) -> Option<ModeSet> {
        let modes = ModeSet {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            regex: self.regex,
            multi_line: self.multi_line,
        };
        (modes != ModeSet::default()).then_some(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["findbar", "notes.txt", "todo"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("notes.txt"));
        assert_eq!(cli.query, "todo");
        assert_eq!(cli.explicit_modes(), None);
        assert!(cli.replace.is_none());
    }

    #[test]
    fn test_parse_mode_flags() {
        let cli = Cli::try_parse_from(["findbar", "-c", "-r", "-m", "f", "a.b"]).unwrap();
        assert_eq!(
            cli.explicit_modes(),
            Some(ModeSet {
                case_sensitive: true,
                regex: true,
                multi_line: true,
                ..ModeSet::default()
            })
        );
    }

    #[test]
    fn test_in_place_requires_replace() {
        assert!(Cli::try_parse_from(["findbar", "--in-place", "f", "q"]).is_err());
        let cli =
            Cli::try_parse_from(["findbar", "--in-place", "--replace", "x", "f", "q"]).unwrap();
        assert!(cli.in_place);
        assert_eq!(cli.replace.as_deref(), Some("x"));
    }
}

//! End-to-end integration tests for the findbar pipeline.
//!
//! These tests exercise the handoff between modules that unit tests
//! cannot cover: a find bar session against an in-memory editor, history
//! persistence across sessions, and the match listing of a real file.

use tempfile::TempDir;

use findbar::controller::{KeyIntent, SearchController};
use findbar::history::ModeHistory;
use findbar::host::{BufferEditor, HostEditor};
use findbar::modes::{Mode, ModeSet};
use findbar::output::{describe_matches, render_plain};
use findbar::prefs::{load_prefs, SearchPrefs, DEFAULT_HISTORY_DEPTH};
use findbar::replace::decode;
use findbar::search::{recompute, MatchSpan};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session(prefs: SearchPrefs, text: &str) -> SearchController<BufferEditor> {
    let mut controller = SearchController::new(prefs, ModeSet::default());
    controller.bind(BufferEditor::new(text), false);
    controller.activate("", true);
    controller
}

fn text_of(controller: &SearchController<BufferEditor>) -> &str {
    controller.host().unwrap().text()
}

// ---------------------------------------------------------------------------
// Test 1: Search, navigate and replace in one session
// ---------------------------------------------------------------------------

#[test]
fn test_search_then_replace_all() {
    let mut c = session(SearchPrefs::default(), "foo bar foo");

    c.on_query_edited("foo");
    assert_eq!(
        c.result().spans,
        vec![MatchSpan::new(0, 3), MatchSpan::new(8, 11)]
    );
    let report = c.report().unwrap();
    assert!(report.replace_enabled());
    assert_eq!(report.status_message().as_deref(), Some("2 strings found"));

    c.on_key_intent(KeyIntent::Enter);
    assert_eq!(c.host().unwrap().selected_text(), Some("foo"));
    assert_eq!(c.host().unwrap().selection(), Some(MatchSpan::new(8, 11)));

    c.replace(&decode("baz"));
    assert_eq!(text_of(&c), "baz bar baz");
    assert!(!c.is_visible());
    assert!(!c.report().unwrap().replace_enabled());
}

#[test]
fn test_regex_case_modes_per_line() {
    let mut c = session(SearchPrefs::default(), "foo\nFOO");
    c.on_mode_toggled(Mode::Regex);
    c.on_query_edited("foo");
    assert_eq!(c.result().hit_count(), 2);

    c.on_mode_toggled(Mode::CaseSensitive);
    assert_eq!(c.result().spans, vec![MatchSpan::new(0, 3)]);
}

#[test]
fn test_regex_replace_joins_lines() {
    let mut c = session(SearchPrefs::default(), "one\ntwo\nthree");
    c.on_mode_toggled(Mode::Regex);
    c.on_query_edited("\\n");
    assert!(c.modes().multi_line, "typing \\n switches multi-line on");
    assert_eq!(c.result().hit_count(), 2);

    c.replace("\\t");
    assert_eq!(text_of(&c), "one\ttwo\tthree");
    assert_eq!(c.host().unwrap().edit_count(), 1);
}

// ---------------------------------------------------------------------------
// Test 2: History persists across sessions
// ---------------------------------------------------------------------------

#[test]
fn test_mode_history_round_trip_through_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("history.toml");

    // First session: search two terms with different modes.
    let mut c = session(load_prefs(&path, DEFAULT_HISTORY_DEPTH), "Alpha alpha beta");
    c.on_query_edited("alpha");
    c.on_mode_toggled(Mode::CaseSensitive);
    c.on_key_intent(KeyIntent::Enter);

    c.on_query_edited("b.t");
    c.on_mode_toggled(Mode::CaseSensitive);
    c.on_mode_toggled(Mode::Regex);
    c.deactivate(true);
    c.prefs().save(&path).unwrap();

    // Second session: the last term and its modes come back.
    let prefs = load_prefs(&path, DEFAULT_HISTORY_DEPTH);
    assert_eq!(prefs.searched, vec!["b.t", "alpha"]);
    assert_eq!(prefs.search_modes, "..!.,!...");

    let mut c = session(prefs, "Alpha alpha beta");
    assert_eq!(c.query(), "b.t");
    assert!(c.modes().regex);
    assert_eq!(c.result().hit_count(), 1);

    c.on_key_intent(KeyIntent::HistoryPrevious);
    assert_eq!(c.query(), "alpha");
    assert_eq!(
        c.modes(),
        ModeSet {
            case_sensitive: true,
            ..ModeSet::default()
        }
    );
    assert_eq!(c.result().spans, vec![MatchSpan::new(6, 11)]);
}

#[test]
fn test_corrupt_history_recovers_per_entry() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("history.toml");
    std::fs::write(
        &path,
        "searched = [\"a\", \"b\"]\nreplaced = []\nsearch_modes = \"!!,..!.\"\n",
    )
    .unwrap();

    let prefs = load_prefs(&path, DEFAULT_HISTORY_DEPTH);
    let history = ModeHistory::deserialize(&prefs.search_modes, &prefs.searched);
    assert_eq!(history.lookup("a"), Some(ModeSet::default()));
    assert!(history.lookup("b").unwrap().regex);

    let c = session(prefs, "aaa");
    assert_eq!(c.modes(), ModeSet::default());
    assert_eq!(c.result().hit_count(), 3);
}

#[test]
fn test_history_depth_caps_searched_terms() {
    let mut c = session(SearchPrefs::with_depth(2), "x");
    for term in ["one", "two", "three"] {
        c.on_query_edited(term);
        c.on_key_intent(KeyIntent::Enter);
    }
    assert_eq!(c.prefs().searched, vec!["three", "two"]);
    assert_eq!(c.prefs().search_modes.split(',').count(), 2);
}

// ---------------------------------------------------------------------------
// Test 3: Rebinding and listing
// ---------------------------------------------------------------------------

#[test]
fn test_rebinding_to_another_editor() {
    let mut c = session(SearchPrefs::default(), "cat");
    c.on_query_edited("cat");
    c.on_mode_toggled(Mode::WholeWord);

    c.bind(BufferEditor::new("concat cat category"), true);
    assert_eq!(c.result().spans, vec![MatchSpan::new(7, 10)]);
    assert_eq!(c.history().lookup("cat"), Some(c.modes()));
}

#[test]
fn test_listing_matches_of_a_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.txt");
    std::fs::write(&path, "TODO: one\nnothing\n  todo two\n").unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let result = recompute(&text, "todo", &ModeSet::default());
    let listing = render_plain(&describe_matches(&text, &result));
    assert_eq!(listing, "1:1: TODO\n3:3: todo\n");
}

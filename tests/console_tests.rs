//! Integration tests for the console front-end
//!
//! These tests verify:
//! - Status lines for browsing, matches and empty results
//! - Add/remove feedback wording
//! - Wordlist listing and selection commands

use camino::Utf8PathBuf;
use pictor::config::JsonSettingsStore;
use pictor::ui::{Command, ConsoleController};
use pictor::{SessionManager, WordBank};
use std::fs;
use tempfile::TempDir;

fn controller(lists: &[(&str, &str)]) -> (TempDir, ConsoleController) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let wordlists = root.join("wordlists");
    fs::create_dir_all(&wordlists).unwrap();
    for (name, contents) in lists {
        fs::write(wordlists.join(name), contents).unwrap();
    }

    let bank = WordBank::open(&wordlists, JsonSettingsStore::new(root.join("settings.json"))).unwrap();
    (temp_dir, ConsoleController::new(bank, SessionManager::new()))
}

#[test]
fn test_ready_status_counts_words() {
    let (_tmp, console) = controller(&[("game.txt", "draw\ndrawn\n")]);
    assert_eq!(console.ready_status(), "Ready - 2 words loaded");
}

#[test]
fn test_empty_line_browses_everything() {
    let (_tmp, mut console) = controller(&[("game.txt", "drawn\ndraw\ncat\n")]);

    let response = console.handle_line("");
    assert_eq!(response.lines, vec!["cat", "draw", "drawn"]);
    assert_eq!(response.status, "Showing all 3 words loaded");
}

#[test]
fn test_search_reports_match_count() {
    let (_tmp, mut console) = controller(&[("game.txt", "draw\ndrawn\ndrab\ndr\n")]);

    let response = console.handle_line("dr");
    assert_eq!(response.lines, vec!["dr", "drab", "draw", "drawn"]);
    assert_eq!(response.status, "Selected 1 of 4 items");
    assert_eq!(console.session().read(|s| s.pattern.clone()), "dr");
}

#[test]
fn test_toggle_exact_length_reruns_pattern() {
    let (_tmp, mut console) = controller(&[("game.txt", "draw\ndrawn\ndrab\ndr\n")]);
    console.handle_line("dr");

    let response = console.handle_line("/");
    assert_eq!(response.lines, vec!["dr"]);
    assert_eq!(
        response.status,
        "Exact length match on - Selected 1 of 1 items (exact length)"
    );
}

#[test]
fn test_no_matches_status() {
    let (_tmp, mut console) = controller(&[("game.txt", "draw\n")]);

    let response = console.handle_line("zz");
    assert!(response.lines.is_empty());
    assert_eq!(response.status, "No matches found");
}

#[test]
fn test_add_and_remove_feedback() {
    let (_tmp, mut console) = controller(&[("game.txt", "draw\n")]);

    let added = console.handle_line("+Zephyr");
    assert_eq!(added.status, "Added 'Zephyr' to wordlist");
    assert_eq!(added.lines, vec!["zephyr"]);

    let duplicate = console.handle_line("+zephyr");
    assert_eq!(duplicate.status, "'zephyr' already exists in wordlist");

    let read_only = console.handle_line("-draw");
    assert_eq!(
        read_only.status,
        "'draw' comes from a read-only wordlist and cannot be removed"
    );

    let missing = console.handle_line("-ghost");
    assert_eq!(missing.status, "'ghost' not found in user wordlist");

    let removed = console.handle_line("-zephyr");
    assert_eq!(removed.status, "Removed 'zephyr' from wordlist");
    assert!(!console.bank().contains("zephyr"));
}

#[test]
fn test_list_and_use_sources() {
    let (_tmp, mut console) = controller(&[("a.txt", "apple\n"), ("b.txt", "berry\nbean\n")]);

    let listing = console.execute(Command::ListSources);
    assert_eq!(
        listing.lines,
        vec![
            "[x] a.txt (1 words)",
            "[x] b.txt (2 words)",
            "[x] user_added_words.txt (0 words) *editable*",
        ]
    );
    assert_eq!(listing.status, "Total selected words: 3");

    let updated = console.handle_line(":use b.txt");
    assert_eq!(updated.status, "Wordlists updated - 2 words loaded");
    assert!(!console.bank().contains("apple"));
}

#[test]
fn test_set_unknown_editable_source() {
    let (_tmp, mut console) = controller(&[]);

    let response = console.handle_line(":edit nope.txt");
    assert_eq!(response.status, "Unknown wordlist: nope.txt");
}

#[test]
fn test_help_lists_commands() {
    let (_tmp, mut console) = controller(&[]);

    let response = console.handle_line(":help");
    assert!(response.lines.iter().any(|l| l.starts_with(":lists")));
    assert!(response.status.is_empty());
}

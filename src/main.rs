//! Pictor - word-guessing assistant
//!
//! Console entry point.
//!
//! # Execution Flow
//!
//! 1. Resolve the data directory (first argument, default `Pictor Data`)
//! 2. Read settings and initialize logging → `<data_dir>/logs/pictor.<date>`
//! 3. Open the word bank from `<data_dir>/wordlists/`
//! 4. Restore the session (last pattern, exact-length flag, capture config)
//! 5. Read commands from stdin until EOF, printing results and a status line
//! 6. Persist the session back into `settings.json`
//!
//! # Data Directory
//!
//! - `settings.json`: selected word lists, editable word list, session and capture settings
//! - `wordlists/*.txt`: one word per line; `user_added_words.txt` is created if missing

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use pictor::config::{load_or_default, update_settings};
use pictor::logging::{LogOptions, init_logging};
use pictor::ui::ConsoleController;
use pictor::{APP_NAME, ConfigManager, SessionManager, VERSION, WordBank};
use std::io::{self, BufRead, Write};

const DEFAULT_DATA_DIR: &str = "Pictor Data";

fn main() -> Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR));

    let config = ConfigManager::new(&data_dir)?;
    let store = config.settings_store();
    let settings = load_or_default(&store);

    let _guard = init_logging(&LogOptions {
        log_dir: config.logs_dir(),
        prefix: "pictor",
        debug: settings.debug_mode,
        console: false,
    })?;

    tracing::info!("Starting {} v{} with data dir {}", APP_NAME, VERSION, data_dir);

    let bank = WordBank::open(config.wordlists_dir(), store.clone())
        .context("Failed to open word lists")?;
    let session = SessionManager::from_settings(&settings);
    let mut controller = ConsoleController::new(bank, session.clone());

    run_console(&mut controller)?;

    if let Err(e) = update_settings(&store, |s| session.store_into(s)) {
        tracing::error!("Failed to save session: {:#}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn run_console(controller: &mut ConsoleController) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "{} v{} - type :help for commands", APP_NAME, VERSION)?;
    writeln!(stdout, "{}", controller.ready_status())?;
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let response = controller.handle_line(&line);

        for result in &response.lines {
            writeln!(stdout, "  {}", result)?;
        }
        if !response.status.is_empty() {
            writeln!(stdout, "-- {}", response.status)?;
        }
        prompt(&mut stdout)?;
    }

    writeln!(stdout)?;
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

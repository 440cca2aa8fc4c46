//! The word bank: file-backed word lists merged into one queryable vocabulary.
//!
//! A word-list directory holds flat `*.txt` files, one word per line. Each file
//! is a [`WordSource`]. The user picks which sources are merged (the
//! selection), and exactly one source is the editable target for additions
//! and removals. Selection and editable target live in the settings store.
//!
//! The vocabulary is always the lowercase, deduplicated union of the selected
//! sources. It is rebuilt from disk on every selection change and after every
//! removal; additions append to the editable file first and only then touch
//! memory, so a failed write never leaves a word that is not on disk.

use super::pattern::{Pattern, by_length_then_alpha, filter_ordered, sort_words};
use crate::config::{SettingsStore, load_or_default, update_settings};
use crate::models::DEFAULT_EDITABLE_WORDLIST;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Extension a file needs to be picked up as a word list.
pub const WORDLIST_EXTENSION: &str = "txt";

/// One file-backed word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSource {
    pub name: String,
    pub path: Utf8PathBuf,
    pub editable: bool,
}

/// Listing metadata for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Non-empty lines in the file right now.
    pub count: usize,
    pub selected: bool,
    pub editable: bool,
}

/// Why an add/remove/selection operation was refused.
#[derive(Error, Debug)]
pub enum WordBankError {
    #[error("Word is empty")]
    EmptyWord,

    #[error("Word must fit on a single line")]
    MultiLine,

    #[error("'{0}' already exists in wordlist")]
    Duplicate(String),

    #[error("'{0}' not found in wordlist")]
    NotFound(String),

    #[error("'{0}' is not in the editable wordlist and cannot be removed")]
    NotRemovable(String),

    #[error("Unknown wordlist: {0}")]
    UnknownSource(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WordBankError {
    fn io(path: &Utf8Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Trim and lowercase a word the way every source line is normalized.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Normalize a word typed by the user. It must stay one line once written.
fn normalize_input(word: &str) -> Result<String, WordBankError> {
    let word = normalize_word(word);
    if word.is_empty() {
        return Err(WordBankError::EmptyWord);
    }
    if word.contains(['\n', '\r']) {
        return Err(WordBankError::MultiLine);
    }
    Ok(word)
}

/// Owns the sources, the selection and the merged vocabulary.
pub struct WordBank {
    dir: Utf8PathBuf,
    sources: IndexMap<String, WordSource>,
    selected: IndexSet<String>,
    editable: String,
    /// True while no explicit selection has been made or restored; newly
    /// discovered files then join the selection automatically.
    select_all: bool,
    vocabulary: HashSet<String>,
    /// `vocabulary` in presentation order.
    ordered: Vec<String>,
    store: Box<dyn SettingsStore>,
}

impl WordBank {
    /// Open the word-list directory `dir`.
    ///
    /// Creates the directory and an empty editable list when missing, restores
    /// the selection and editable target from `store` (falling back to "all
    /// sources" and the default editable list), and loads the vocabulary.
    pub fn open<P, S>(dir: P, store: S) -> Result<Self, WordBankError>
    where
        P: AsRef<Utf8Path>,
        S: SettingsStore + 'static,
    {
        let dir = dir.as_ref().to_path_buf();
        let settings = load_or_default(&store);

        let editable = if is_valid_source_name(&settings.editable_wordlist) {
            settings.editable_wordlist.clone()
        } else {
            tracing::warn!(
                "Ignoring invalid editable wordlist name '{}', using {}",
                settings.editable_wordlist,
                DEFAULT_EDITABLE_WORDLIST
            );
            DEFAULT_EDITABLE_WORDLIST.to_string()
        };

        let mut bank = Self {
            dir,
            sources: IndexMap::new(),
            selected: IndexSet::new(),
            editable,
            select_all: settings.selected_wordlists.is_none(),
            vocabulary: HashSet::new(),
            ordered: Vec::new(),
            store: Box::new(store),
        };

        bank.ensure_layout()?;
        bank.discover()?;

        bank.selected = match settings.selected_wordlists {
            Some(names) => bank.known_names(names),
            None => bank.sources.keys().cloned().collect(),
        };

        bank.reload();

        tracing::info!(
            "Word bank opened at {}: {} sources, {} selected, {} words, editable={}",
            bank.dir,
            bank.sources.len(),
            bank.selected.len(),
            bank.vocabulary.len(),
            bank.editable
        );

        Ok(bank)
    }

    // ------------------------------------------------------------------
    // Queries

    /// Words matching `pattern`, shortest first then alphabetical.
    ///
    /// An empty pattern matches nothing; use [`combined_vocabulary`](Self::combined_vocabulary)
    /// to browse everything.
    pub fn query(&self, pattern: &str, exact_length: bool) -> Vec<String> {
        let parsed = Pattern::parse(pattern);
        let matches = filter_ordered(&self.ordered, &parsed, exact_length);
        tracing::debug!(
            "query '{}' (exact_length={}) -> {} matches",
            pattern,
            exact_length,
            matches.len()
        );
        matches
    }

    /// Every word in the vocabulary, shortest first then alphabetical.
    pub fn combined_vocabulary(&self) -> Vec<String> {
        self.ordered.clone()
    }

    pub fn word_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocabulary.contains(&normalize_word(word))
    }

    // ------------------------------------------------------------------
    // Selection

    /// Replace the selection, persist it and rebuild the vocabulary from disk.
    ///
    /// Names that do not correspond to a discovered source are dropped. An
    /// empty selection is valid and empties the vocabulary.
    pub fn set_selected_sources<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = self.known_names(names.into_iter().map(Into::into));
        self.select_all = false;

        let persisted: Vec<String> = self.selected.iter().cloned().collect();
        if let Err(e) = update_settings(self.store.as_ref(), |s| {
            s.selected_wordlists = Some(persisted)
        }) {
            tracing::error!("Failed to persist wordlist selection: {:#}", e);
        }

        self.reload();
        tracing::info!(
            "Wordlist selection updated: {:?} ({} words)",
            self.selected,
            self.vocabulary.len()
        );
    }

    /// Ordered vocabulary a candidate selection would produce. Nothing is
    /// changed or persisted.
    pub fn preview_selection<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = self.known_names(names.into_iter().map(Into::into));
        let mut words: Vec<String> = self.union_of(&names).into_iter().collect();
        sort_words(&mut words);
        words
    }

    /// Make another discovered source the add/remove target and persist it.
    pub fn set_editable_source(&mut self, name: &str) -> Result<(), WordBankError> {
        if !self.sources.contains_key(name) {
            return Err(WordBankError::UnknownSource(name.to_string()));
        }

        self.editable = name.to_string();
        for source in self.sources.values_mut() {
            source.editable = source.name == name;
        }

        let editable = self.editable.clone();
        if let Err(e) = update_settings(self.store.as_ref(), |s| s.editable_wordlist = editable) {
            tracing::error!("Failed to persist editable wordlist: {:#}", e);
        }

        tracing::info!("Editable wordlist set to {}", name);
        Ok(())
    }

    /// Re-enumerate the directory, e.g. after files were added or deleted by hand.
    pub fn rescan_sources(&mut self) -> Result<(), WordBankError> {
        self.ensure_layout()?;
        self.discover()?;

        if self.select_all {
            self.selected = self.sources.keys().cloned().collect();
        } else {
            let sources = &self.sources;
            self.selected.retain(|name| sources.contains_key(name));
        }

        self.reload();
        tracing::info!(
            "Rescanned {}: {} sources, {} words",
            self.dir,
            self.sources.len(),
            self.vocabulary.len()
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Editing

    /// Add `word` to the editable source.
    ///
    /// Returns `false` for empty or multi-line words, duplicates and write failures.
    pub fn add_word(&mut self, word: &str) -> bool {
        match self.try_add_word(word) {
            Ok(()) => true,
            Err(e) => {
                log_refusal("add", &e);
                false
            }
        }
    }

    /// Add `word` to the editable source, reporting why it was refused.
    pub fn try_add_word(&mut self, word: &str) -> Result<(), WordBankError> {
        let word = normalize_input(word)?;
        if self.vocabulary.contains(&word) {
            return Err(WordBankError::Duplicate(word));
        }

        let path = self.editable_path();
        let editable_selected = self.selected.contains(&self.editable);
        if !editable_selected && read_words(&path).iter().any(|w| *w == word) {
            return Err(WordBankError::Duplicate(word));
        }

        append_line(&path, &word).map_err(|e| WordBankError::io(&path, e))?;

        if editable_selected {
            let pos = self
                .ordered
                .binary_search_by(|existing| by_length_then_alpha(existing, &word))
                .unwrap_or_else(|p| p);
            self.ordered.insert(pos, word.clone());
            self.vocabulary.insert(word.clone());
        }

        tracing::info!("Added '{}' to {}", word, self.editable);
        Ok(())
    }

    /// Remove `word` from the editable source.
    ///
    /// Returns `false` when the word is not in the vocabulary, is only present
    /// through a non-editable source, or the rewrite failed.
    pub fn remove_word(&mut self, word: &str) -> bool {
        match self.try_remove_word(word) {
            Ok(()) => true,
            Err(e) => {
                log_refusal("remove", &e);
                false
            }
        }
    }

    /// Remove `word` from the editable source, reporting why it was refused.
    pub fn try_remove_word(&mut self, word: &str) -> Result<(), WordBankError> {
        let word = normalize_input(word)?;
        if !self.vocabulary.contains(&word) {
            return Err(WordBankError::NotFound(word));
        }

        let path = self.editable_path();
        let contents = read_lossy(&path).map_err(|e| WordBankError::io(&path, e))?;

        let mut removed = false;
        let kept: String = contents
            .split_inclusive('\n')
            .filter(|line| {
                let hit = normalize_word(line) == word;
                removed |= hit;
                !hit
            })
            .collect();

        if !removed {
            return Err(WordBankError::NotRemovable(word));
        }

        rewrite_file(&self.dir, &path, &kept).map_err(|e| WordBankError::io(&path, e))?;
        self.reload();

        tracing::info!("Removed '{}' from {}", word, self.editable);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Listing

    /// Per-source word counts read from disk now, plus selection flags.
    pub fn source_info(&self) -> IndexMap<String, SourceInfo> {
        self.sources
            .values()
            .map(|source| {
                let info = SourceInfo {
                    count: read_words(&source.path).len(),
                    selected: self.selected.contains(&source.name),
                    editable: source.editable,
                };
                (source.name.clone(), info)
            })
            .collect()
    }

    /// Sum of the per-source counts over the selected sources.
    pub fn selected_word_total(&self) -> usize {
        self.source_info()
            .values()
            .filter(|info| info.selected)
            .map(|info| info.count)
            .sum()
    }

    pub fn sources(&self) -> impl Iterator<Item = &WordSource> {
        self.sources.values()
    }

    pub fn source(&self, name: &str) -> Option<&WordSource> {
        self.sources.get(name)
    }

    pub fn selected_sources(&self) -> &IndexSet<String> {
        &self.selected
    }

    pub fn editable_source(&self) -> &str {
        &self.editable
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    // ------------------------------------------------------------------
    // Internals

    fn editable_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.editable)
    }

    /// Create the directory and the editable list if either is missing.
    fn ensure_layout(&self) -> Result<(), WordBankError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| WordBankError::io(&self.dir, e))?;
            tracing::info!("Created wordlist directory {}", self.dir);
        }

        let path = self.editable_path();
        if !path.is_file() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| WordBankError::io(&path, e))?;
            tracing::info!("Created empty editable wordlist {}", path);
        }
        Ok(())
    }

    fn discover(&mut self) -> Result<(), WordBankError> {
        let mut names = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| WordBankError::io(&self.dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| WordBankError::io(&self.dir, e))?;
            let Ok(path) = Utf8PathBuf::try_from(entry.path()) else {
                tracing::warn!("Skipping non UTF-8 path {:?}", entry.path());
                continue;
            };
            if !path.is_file() || path.extension() != Some(WORDLIST_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name() {
                names.push(name.to_string());
            }
        }
        names.sort();

        self.sources = names
            .into_iter()
            .map(|name| {
                let source = WordSource {
                    path: self.dir.join(&name),
                    editable: name == self.editable,
                    name: name.clone(),
                };
                (name, source)
            })
            .collect();

        tracing::debug!("Discovered wordlists: {:?}", self.sources.keys());
        Ok(())
    }

    fn known_names<I>(&self, names: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = String>,
    {
        names
            .into_iter()
            .filter(|name| {
                let known = self.sources.contains_key(name);
                if !known {
                    tracing::warn!("Ignoring unknown wordlist '{}'", name);
                }
                known
            })
            .collect()
    }

    fn union_of(&self, names: &IndexSet<String>) -> HashSet<String> {
        names
            .iter()
            .filter_map(|name| self.sources.get(name))
            .flat_map(|source| read_words(&source.path))
            .collect()
    }

    /// Rebuild the vocabulary from the selected sources on disk.
    fn reload(&mut self) {
        self.vocabulary = self.union_of(&self.selected);
        self.ordered = self.vocabulary.iter().cloned().collect();
        sort_words(&mut self.ordered);
    }
}

fn log_refusal(op: &str, err: &WordBankError) {
    match err {
        WordBankError::Io { .. } => tracing::error!("Failed to {} word: {}", op, err),
        _ => tracing::debug!("Refused to {} word: {}", op, err),
    }
}

/// A plain `*.txt` file name with no directory components.
fn is_valid_source_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && Utf8Path::new(name).extension() == Some(WORDLIST_EXTENSION)
}

fn read_lossy(path: &Utf8Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Normalized, non-empty lines of a word file. Unreadable files count as empty.
fn read_words(path: &Utf8Path) -> Vec<String> {
    match read_lossy(path) {
        Ok(contents) => contents
            .lines()
            .map(normalize_word)
            .filter(|w| !w.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to read wordlist {}: {}", path, e);
            Vec::new()
        }
    }
}

/// Append `word` as its own line, adding a newline first if the file lacks a trailing one.
fn append_line(path: &Utf8Path, word: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().read(true).append(true).create(true).open(path)?;
    let needs_newline = ends_without_newline(&mut file)?;

    let mut line = String::with_capacity(word.len() + 2);
    if needs_newline {
        line.push('\n');
    }
    line.push_str(word);
    line.push('\n');

    file.write_all(line.as_bytes())?;
    file.flush()
}

fn ends_without_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Replace `path` with `contents` without ever leaving a half-written file.
fn rewrite_file(dir: &Utf8Path, path: &Utf8Path, contents: &str) -> io::Result<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

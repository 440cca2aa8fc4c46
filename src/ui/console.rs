//! Line-oriented front-end over the word bank.
//!
//! Each line typed by the user is parsed into a [`Command`], executed against
//! the [`WordBank`] and the [`SessionManager`], and rendered into a
//! [`Response`]: the result lines plus a one-line status message in the same
//! wording the desktop status bar uses.

use crate::services::{WordBank, WordBankError};
use crate::state::SessionManager;

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Filter with a pattern; an empty pattern browses everything
    Search(String),
    Add(String),
    Remove(String),
    ToggleExactLength,
    ListSources,
    UseSources(Vec<String>),
    SetEditable(String),
    Refresh,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed == "/" {
            return Self::ToggleExactLength;
        }
        if let Some(word) = trimmed.strip_prefix('+') {
            return Self::Add(word.trim().to_string());
        }
        if let Some(word) = trimmed.strip_prefix('-') {
            return Self::Remove(word.trim().to_string());
        }
        if let Some(rest) = trimmed.strip_prefix(':') {
            let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let arg = arg.trim();
            match name {
                "lists" => return Self::ListSources,
                "use" => {
                    return Self::UseSources(
                        arg.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect(),
                    );
                }
                "edit" => return Self::SetEditable(arg.to_string()),
                "refresh" => return Self::Refresh,
                "help" => return Self::Help,
                _ => {}
            }
        }

        Self::Search(trimmed.to_string())
    }
}

/// Output of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub lines: Vec<String>,
    pub status: String,
}

impl Response {
    fn status(status: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            status: status.into(),
        }
    }
}

/// Drives a [`WordBank`] from typed commands.
pub struct ConsoleController {
    bank: WordBank,
    session: SessionManager,
}

impl ConsoleController {
    pub fn new(bank: WordBank, session: SessionManager) -> Self {
        Self { bank, session }
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Status line shown before any input.
    pub fn ready_status(&self) -> String {
        format!("Ready - {} words loaded", self.bank.word_count())
    }

    pub fn handle_line(&mut self, line: &str) -> Response {
        self.execute(Command::parse(line))
    }

    pub fn execute(&mut self, command: Command) -> Response {
        match command {
            Command::Search(pattern) => {
                self.session.set_pattern(pattern);
                self.refresh_results()
            }
            Command::Add(word) => self.add(&word),
            Command::Remove(word) => self.remove(&word),
            Command::ToggleExactLength => {
                self.session.toggle_exact_length();
                let mut response = self.refresh_results();
                let mode = if self.session.read(|s| s.exact_length) {
                    "on"
                } else {
                    "off"
                };
                response.status = format!("Exact length match {} - {}", mode, response.status);
                response
            }
            Command::ListSources => self.list_sources(),
            Command::UseSources(names) => {
                self.bank.set_selected_sources(names);
                let mut response = self.refresh_results();
                response.status = format!("Wordlists updated - {} words loaded", self.bank.word_count());
                response
            }
            Command::SetEditable(name) => match self.bank.set_editable_source(&name) {
                Ok(()) => Response::status(format!("Now adding words to {}", name)),
                Err(e) => Response::status(e.to_string()),
            },
            Command::Refresh => match self.bank.rescan_sources() {
                Ok(()) => self.list_sources(),
                Err(e) => Response::status(format!("Refresh failed: {}", e)),
            },
            Command::Help => Response {
                lines: HELP.lines().map(String::from).collect(),
                status: String::new(),
            },
        }
    }

    /// Re-run the current pattern.
    pub fn refresh_results(&self) -> Response {
        let (pattern, exact_length) = self.session.read(|s| (s.pattern.clone(), s.exact_length));

        if pattern.is_empty() {
            let words = self.bank.combined_vocabulary();
            let status = format!("Showing all {} words loaded", words.len());
            return Response {
                lines: words,
                status,
            };
        }

        let matches = self.bank.query(&pattern, exact_length);
        let mode = if exact_length { " (exact length)" } else { "" };
        let status = if matches.is_empty() {
            format!("No matches found{}", mode)
        } else {
            format!("Selected 1 of {} items{}", matches.len(), mode)
        };
        Response {
            lines: matches,
            status,
        }
    }

    fn add(&mut self, word: &str) -> Response {
        let shown = word.trim();
        match self.bank.try_add_word(word) {
            Ok(()) => {
                self.session.set_pattern(shown);
                let mut response = self.refresh_results();
                response.status = format!("Added '{}' to wordlist", shown);
                response
            }
            Err(WordBankError::EmptyWord) => Response::status("Nothing to add"),
            Err(WordBankError::Duplicate(_)) => {
                Response::status(format!("'{}' already exists in wordlist", shown))
            }
            Err(e) => Response::status(format!("Could not add '{}': {}", shown, e)),
        }
    }

    fn remove(&mut self, word: &str) -> Response {
        let shown = word.trim();
        match self.bank.try_remove_word(word) {
            Ok(()) => {
                let mut response = self.refresh_results();
                response.status = format!("Removed '{}' from wordlist", shown);
                response
            }
            Err(WordBankError::EmptyWord) => Response::status("Nothing to remove"),
            Err(WordBankError::NotFound(_)) => {
                Response::status(format!("'{}' not found in user wordlist", shown))
            }
            Err(WordBankError::NotRemovable(_)) => Response::status(format!(
                "'{}' comes from a read-only wordlist and cannot be removed",
                shown
            )),
            Err(e) => Response::status(format!("Could not remove '{}': {}", shown, e)),
        }
    }

    fn list_sources(&self) -> Response {
        let info = self.bank.source_info();
        let lines = info
            .iter()
            .map(|(name, info)| {
                format!(
                    "[{}] {} ({} words){}",
                    if info.selected { "x" } else { " " },
                    name,
                    info.count,
                    if info.editable { " *editable*" } else { "" }
                )
            })
            .collect();
        let total: usize = info.values().filter(|i| i.selected).map(|i| i.count).sum();
        Response {
            lines,
            status: format!("Total selected words: {}", total),
        }
    }
}

const HELP: &str = "\
<pattern>        search; '_' stands for one unknown letter (dr_w_ng)
<empty line>     show every loaded word
/                toggle exact length matching
+word            add word to the editable wordlist
-word            remove word from the editable wordlist
:lists           show wordlists
:use a.txt,b.txt select wordlists
:edit name.txt   choose the editable wordlist
:refresh         rescan the wordlist folder";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("dr_w\n"), Command::Search("dr_w".to_string()));
        assert_eq!(Command::parse(""), Command::Search(String::new()));
        assert_eq!(Command::parse("/"), Command::ToggleExactLength);
        assert_eq!(Command::parse("+ Zephyr"), Command::Add("Zephyr".to_string()));
        assert_eq!(Command::parse("-zephyr"), Command::Remove("zephyr".to_string()));
        assert_eq!(Command::parse(":lists"), Command::ListSources);
        assert_eq!(
            Command::parse(":use a.txt, b.txt"),
            Command::UseSources(vec!["a.txt".to_string(), "b.txt".to_string()])
        );
        assert_eq!(Command::parse(":use"), Command::UseSources(Vec::new()));
        assert_eq!(Command::parse(":edit mine.txt"), Command::SetEditable("mine.txt".to_string()));
        assert_eq!(Command::parse(":refresh"), Command::Refresh);
    }

    #[test]
    fn test_unknown_colon_command_is_a_search() {
        assert_eq!(Command::parse(":nope"), Command::Search(":nope".to_string()));
    }
}

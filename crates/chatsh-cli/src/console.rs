//! Console transport: a line editor standing in for a chat.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use uuid::Uuid;

use chatsh_core::dispatch::GRAMMAR;
use chatsh_core::{InboundMessage, Reply, SessionId};

/// Prefix that delivers a line as an edited message.
pub const EDIT_PREFIX: &str = ":edit ";

const CONTROL_VERBS: &[&str] = &["login", "logout", "exit", "quit", "restart", "reset", "hi"];

/// Completion and hints over the verb vocabulary.
#[derive(Clone)]
pub struct ConsoleHelper {
    verbs: Vec<String>,
}

impl ConsoleHelper {
    pub fn new() -> Self {
        let mut verbs: Vec<String> = GRAMMAR
            .iter()
            .flat_map(|rule| rule.keywords.iter())
            .chain(CONTROL_VERBS.iter())
            .map(|verb| verb.to_string())
            .collect();
        verbs.sort();
        verbs.dedup();
        Self { verbs }
    }

    fn matching<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.verbs
            .iter()
            .filter(move |verb| !prefix.is_empty() && verb.starts_with(prefix))
    }
}

impl Helper for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = self
            .matching(line)
            .map(|verb| Pair {
                display: verb.clone(),
                replacement: verb.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ConsoleHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with(EDIT_PREFIX.trim_end()) {
            Owned(line.bright_yellow().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.contains(' ') {
            return None;
        }
        self.matching(line)
            .find(|verb| verb.len() > line.len())
            .map(|verb| verb[line.len()..].to_string())
    }
}

impl Validator for ConsoleHelper {}

/// Turns a console line into an inbound event for `session`.
pub fn inbound(session: &SessionId, line: &str) -> InboundMessage {
    match line.strip_prefix(EDIT_PREFIX) {
        Some(text) => InboundMessage::edited(session.clone(), text),
        None => InboundMessage::new(session.clone(), line),
    }
}

/// Writes an image reply into `dir` and returns its path.
pub fn save_image(dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(format!("chatsh-reply-{}.jpg", Uuid::new_v4()));
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Prints a reply the way a chat client would show it.
pub fn render(reply: &Reply, image_dir: &Path) {
    match reply {
        Reply::Text(text) => {
            for line in text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        Reply::Image(bytes) => match save_image(image_dir, bytes) {
            Ok(path) => println!("{}", format!("[image] {}", path.display()).bright_magenta()),
            Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
        },
        Reply::Silent => {}
    }
}

/// Prints a lifecycle notice addressed to `session`.
pub fn notice(session: &SessionId, text: &str) {
    println!("{}", format!("[{}] {}", session, text).bright_green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_edit_prefix_marks_edited() {
        let session = SessionId::from("console");

        let plain = inbound(&session, "sys uptime");
        assert!(!plain.edited);
        assert_eq!(plain.text, "sys uptime");

        let edited = inbound(&session, ":edit sys uptime");
        assert!(edited.edited);
        assert_eq!(edited.text, "sys uptime");
        assert_eq!(edited.session, session);
    }

    #[test]
    fn test_save_image_writes_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = save_image(&temp_dir.path().join("replies"), b"\xff\xd8jpeg").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"\xff\xd8jpeg");
    }

    #[test]
    fn test_completion_covers_grammar_and_control_verbs() {
        let helper = ConsoleHelper::new();
        let candidates: Vec<&String> = helper.matching("s").collect();
        assert!(candidates.iter().any(|v| v.as_str() == "sys"));
        assert!(candidates.iter().any(|v| v.as_str() == "sudo"));
        assert!(candidates.iter().any(|v| v.as_str() == "screen"));
        assert!(helper.matching("log").any(|v| v == "logout"));
        assert_eq!(helper.matching("").count(), 0);
    }
}

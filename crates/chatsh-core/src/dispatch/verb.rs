//! The verb grammar.
//!
//! A resolved line is matched against [`GRAMMAR`], an ordered list of rules;
//! the first rule whose keyword equals the line's first token (ignoring case)
//! and whose shape fits wins. Lines that match nothing fall through to
//! [`Verb::Fallback`].

use crate::collaborator::{Language, SystemAction};
use crate::error::{ChatshError, Result};

/// How a rule consumes the text after its keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The keyword must be the whole line
    Exact,
    /// The keyword must be followed by an argument
    Prefix,
    /// The keyword may be followed by an argument
    Optional,
}

/// What a matched rule means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbKind {
    Alias,
    Describe,
    LoadAliases,
    Help,
    Sys,
    Sudo,
    System(SystemAction),
    Notify,
    Say(Language),
    Photo,
    Screen,
}

/// One grammar rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub shape: Shape,
    pub kind: VerbKind,
    pub usage: &'static str,
}

/// The grammar, in match order.
pub const GRAMMAR: &[Rule] = &[
    Rule {
        keywords: &["alias"],
        shape: Shape::Optional,
        kind: VerbKind::Alias,
        usage: "alias [<name> <command>]",
    },
    Rule {
        keywords: &["describe"],
        shape: Shape::Prefix,
        kind: VerbKind::Describe,
        usage: "describe <name> <text>",
    },
    Rule {
        keywords: &["load_aliases"],
        shape: Shape::Exact,
        kind: VerbKind::LoadAliases,
        usage: "load_aliases",
    },
    Rule {
        keywords: &["help", "menu"],
        shape: Shape::Exact,
        kind: VerbKind::Help,
        usage: "help",
    },
    Rule {
        keywords: &["sys"],
        shape: Shape::Prefix,
        kind: VerbKind::Sys,
        usage: "sys <command>",
    },
    Rule {
        keywords: &["sudo"],
        shape: Shape::Prefix,
        kind: VerbKind::Sudo,
        usage: "sudo <command>",
    },
    Rule {
        keywords: &["reboot"],
        shape: Shape::Exact,
        kind: VerbKind::System(SystemAction::Reboot),
        usage: "reboot",
    },
    Rule {
        keywords: &["shutdown"],
        shape: Shape::Exact,
        kind: VerbKind::System(SystemAction::Shutdown),
        usage: "shutdown",
    },
    Rule {
        keywords: &["lock"],
        shape: Shape::Exact,
        kind: VerbKind::System(SystemAction::Lock),
        usage: "lock",
    },
    Rule {
        keywords: &["unlock"],
        shape: Shape::Exact,
        kind: VerbKind::System(SystemAction::Unlock),
        usage: "unlock",
    },
    Rule {
        keywords: &["notify"],
        shape: Shape::Prefix,
        kind: VerbKind::Notify,
        usage: "notify <text>",
    },
    Rule {
        keywords: &["say"],
        shape: Shape::Prefix,
        kind: VerbKind::Say(Language::English),
        usage: "say <text>",
    },
    Rule {
        keywords: &["decir"],
        shape: Shape::Prefix,
        kind: VerbKind::Say(Language::Spanish),
        usage: "decir <texto>",
    },
    Rule {
        keywords: &["picture", "photo", "foto"],
        shape: Shape::Exact,
        kind: VerbKind::Photo,
        usage: "photo",
    },
    Rule {
        keywords: &["screen", "screenshot", "pantalla", "captura"],
        shape: Shape::Exact,
        kind: VerbKind::Screen,
        usage: "screen",
    },
];

/// A parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb<'a> {
    ListAliases,
    DefineAlias { name: &'a str, template: &'a str },
    Describe { name: &'a str, text: &'a str },
    LoadAliases,
    Help,
    Sys(&'a str),
    Sudo(&'a str),
    System(SystemAction),
    Notify(&'a str),
    Say { text: &'a str, language: Language },
    Photo,
    Screen,
    /// No rule matched; carries the whole line
    Fallback(&'a str),
}

/// Splits a line into its lower-cased first token and the trimmed remainder,
/// whose case is preserved.
pub fn split_head(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(at) => (line[..at].to_lowercase(), line[at..].trim()),
        None => (line.to_lowercase(), ""),
    }
}

impl<'a> Verb<'a> {
    /// Parses a resolved line.
    ///
    /// A line whose keyword matches a rule but whose arguments are malformed
    /// is a usage error rather than a fallback.
    pub fn parse(line: &'a str) -> Result<Verb<'a>> {
        let (head, rest) = split_head(line);
        let Some(rule) = GRAMMAR
            .iter()
            .find(|rule| rule.keywords.contains(&head.as_str()) && fits(rule.shape, rest))
        else {
            if let Some(rule) = GRAMMAR
                .iter()
                .find(|rule| rule.shape == Shape::Prefix && rule.keywords.contains(&head.as_str()))
            {
                return Err(ChatshError::usage(rule.usage));
            }
            return Ok(Verb::Fallback(line.trim()));
        };

        let verb = match rule.kind {
            VerbKind::Alias if rest.is_empty() => Verb::ListAliases,
            VerbKind::Alias => {
                let (name, template) = split_pair(rest).ok_or_else(|| ChatshError::usage(rule.usage))?;
                Verb::DefineAlias { name, template }
            }
            VerbKind::Describe => {
                let (name, text) = split_pair(rest).ok_or_else(|| ChatshError::usage(rule.usage))?;
                Verb::Describe { name, text }
            }
            VerbKind::LoadAliases => Verb::LoadAliases,
            VerbKind::Help => Verb::Help,
            VerbKind::Sys => Verb::Sys(rest),
            VerbKind::Sudo => Verb::Sudo(rest),
            VerbKind::System(action) => Verb::System(action),
            VerbKind::Notify => Verb::Notify(rest),
            VerbKind::Say(language) => Verb::Say { text: rest, language },
            VerbKind::Photo => Verb::Photo,
            VerbKind::Screen => Verb::Screen,
        };
        Ok(verb)
    }
}

fn fits(shape: Shape, rest: &str) -> bool {
    match shape {
        Shape::Exact => rest.is_empty(),
        Shape::Prefix => !rest.is_empty(),
        Shape::Optional => true,
    }
}

/// Splits `name rest...` where both halves are required.
fn split_pair(text: &str) -> Option<(&str, &str)> {
    let at = text.find(char::is_whitespace)?;
    let (name, rest) = (&text[..at], text[at..].trim());
    if rest.is_empty() { None } else { Some((name, rest)) }
}

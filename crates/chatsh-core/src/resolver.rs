//! Alias expansion of inbound command lines.
//!
//! The first whitespace-separated token of a line is looked up as an alias
//! name. On a hit, the alias template replaces it and the remaining tokens are
//! substituted into the template's placeholder, or appended when the template
//! has none. A line whose first token is not an alias passes through as is.

use tracing::debug;

use crate::alias::AliasStore;

/// Current placeholder syntax.
pub const PLACEHOLDER: &str = "${*}";

/// Legacy placeholder: a bare `?` token.
pub const LEGACY_PLACEHOLDER: &str = "?";

/// Placeholder syntax found in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `${*}` anywhere in the template
    Current,
    /// a standalone `?` token
    Legacy,
}

impl Placeholder {
    /// Detects which placeholder a template uses. `${*}` takes precedence.
    pub fn detect(template: &str) -> Option<Self> {
        if template.contains(PLACEHOLDER) {
            Some(Self::Current)
        } else if template.split_whitespace().any(|w| w == LEGACY_PLACEHOLDER) {
            Some(Self::Legacy)
        } else {
            None
        }
    }
}

/// Expands `line` through the alias tables.
///
/// Never fails: a line that names no alias is returned unchanged.
pub fn resolve(store: &AliasStore, line: &str) -> String {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return line.to_string();
    };
    let args: Vec<&str> = tokens.collect();

    match store.lookup(command) {
        Some((entry, source)) => {
            let expanded = expand_template(&entry.command, &args);
            debug!(alias = %command.to_lowercase(), ?source, expanded = %expanded, "Expanded alias");
            expanded
        }
        None => line.to_string(),
    }
}

/// Substitutes `args` into `template`.
///
/// The placeholder is replaced by the space-joined arguments, which may be
/// empty. Without a placeholder, arguments are appended after a space.
pub fn expand_template(template: &str, args: &[&str]) -> String {
    let joined = args.join(" ");
    match Placeholder::detect(template) {
        Some(Placeholder::Current) => template.replace(PLACEHOLDER, &joined),
        Some(Placeholder::Legacy) => replace_bare_token(template, LEGACY_PLACEHOLDER, &joined),
        None if args.is_empty() => template.to_string(),
        None => format!("{} {}", template, joined),
    }
}

/// Replaces whitespace-delimited occurrences of `token`, keeping the
/// template's original spacing.
fn replace_bare_token(template: &str, token: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(template.len() + replacement.len());
    let mut rest = template;
    while !rest.is_empty() {
        let space_end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        out.push_str(&rest[..space_end]);
        rest = &rest[space_end..];

        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        out.push_str(if word == token { replacement } else { word });
        rest = &rest[word_end..];
    }
    out
}

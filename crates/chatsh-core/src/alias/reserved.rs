//! Reserved verb names.
//!
//! These keywords belong to the command grammar and can never be used as
//! alias names, in either table.

use super::model::normalize_name;

/// Keywords that may not be assigned as alias names.
pub const RESERVED_VERBS: &[&str] = &[
    "alias",
    "describe",
    "exit",
    "quit",
    "logout",
    "reset",
    "restart",
    "sys",
    "sudo",
    "load_aliases",
    "help",
    "menu",
    "hi",
];

/// Returns true if `name` is a reserved verb, ignoring case.
pub fn is_reserved(name: &str) -> bool {
    let name = normalize_name(name);
    RESERVED_VERBS.contains(&name.as_str())
}

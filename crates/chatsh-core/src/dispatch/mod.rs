//! Verb grammar and dispatch of resolved lines to external actions.

pub mod dispatcher;
pub mod reply;
pub mod verb;

pub use dispatcher::{Dispatcher, UNKNOWN_COMMAND};
pub use reply::{DONE, Reply, truncate_utf8};
pub use verb::{GRAMMAR, Verb};

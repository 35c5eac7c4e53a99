//! Session repository trait.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::session::SessionId;

/// Persistent storage for the authorized set.
///
/// Implementations must accept both the single-identifier legacy form and
/// the set form when loading; an empty set is the "no session" state.
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted authorized set.
    fn load(&self) -> Result<BTreeSet<SessionId>>;

    /// Replaces the persisted authorized set.
    fn save(&self, sessions: &BTreeSet<SessionId>) -> Result<()>;
}

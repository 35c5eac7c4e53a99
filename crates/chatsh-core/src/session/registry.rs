//! The session registry: which identities are currently authorized.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::session::{SessionId, SessionRepository};

/// The set of authorized session identities.
///
/// Membership is the only privilege gate in the system. Every mutation is
/// written through to the repository; write failures are logged and the
/// in-memory set stays authoritative.
pub struct SessionRegistry {
    authorized: BTreeSet<SessionId>,
    repository: Arc<dyn SessionRepository>,
}

impl SessionRegistry {
    /// Creates an empty registry. Call [`restore`](Self::restore) to load
    /// sessions persisted by a previous run.
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            authorized: BTreeSet::new(),
            repository,
        }
    }

    /// Repopulates the set from persisted state.
    ///
    /// Returns the restored identities. A failed load leaves the set empty.
    pub fn restore(&mut self) -> Vec<SessionId> {
        match self.repository.load() {
            Ok(sessions) => {
                info!(count = sessions.len(), "Restored authorized sessions");
                self.authorized = sessions;
            }
            Err(e) => {
                warn!(error = %e, "Failed to restore authorized sessions");
                self.authorized.clear();
            }
        }
        self.sessions()
    }

    pub fn is_authorized(&self, id: &SessionId) -> bool {
        self.authorized.contains(id)
    }

    /// Adds `id` to the authorized set. Idempotent.
    pub fn authorize(&mut self, id: &SessionId) {
        if self.authorized.insert(id.clone()) {
            info!(session = %id, "Session authorized");
        }
        self.persist();
    }

    /// Removes `id` from the authorized set. Revoking an unknown identity is
    /// a no-op.
    pub fn revoke(&mut self, id: &SessionId) {
        if self.authorized.remove(id) {
            info!(session = %id, "Session revoked");
        }
        self.persist();
    }

    /// Clears the authorized set and persists the "no session" state.
    pub fn revoke_all(&mut self) {
        info!(count = self.authorized.len(), "Revoking all sessions");
        self.authorized.clear();
        self.persist();
    }

    /// Currently authorized identities, in order.
    pub fn sessions(&self) -> Vec<SessionId> {
        self.authorized.iter().cloned().collect()
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.authorized) {
            warn!(error = %e, "Failed to persist authorized sessions; continuing in memory");
        }
    }
}

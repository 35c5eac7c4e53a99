//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::collaborator::Credential;
use crate::dispatch::reply::DEFAULT_MAX_REPLY_BYTES;

/// What happens to an authorized line that matches no verb.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Ask the AI collaborator, or report an unknown command when none is configured
    #[default]
    Ai,
    /// Always report an unknown command
    Unknown,
}

/// Settings the engine needs at construction time.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Secret expected by `login`
    pub password: Credential,
    /// Credential for privileged actions; `sudo` and system actions are
    /// refused without it
    pub sudo_password: Option<Credential>,
    pub max_reply_bytes: usize,
    pub fallback: FallbackPolicy,
    /// Operator-provided help text; generated from the grammar when absent
    pub help_text: Option<String>,
}

impl EngineConfig {
    pub fn new(password: Credential) -> Self {
        Self {
            password,
            sudo_password: None,
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
            fallback: FallbackPolicy::default(),
            help_text: None,
        }
    }
}

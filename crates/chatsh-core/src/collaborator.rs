//! Interfaces of the external actions the dispatcher drives.
//!
//! Each collaborator exposes one narrow async operation and reports failure
//! through [`CollaboratorError`]. The dispatcher is the single place where
//! those errors become reply text.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Failure of an external action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The action needs configuration that is absent
    #[error("{0} is not configured.")]
    NotConfigured(&'static str),

    /// A required tool or device is missing
    #[error("{0}")]
    Unavailable(String),

    /// The action ran and failed
    #[error("{0}")]
    Failed(String),

    /// I/O failure while preparing or collecting the action's result
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CollaboratorError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::Unavailable(err.to_string())
        } else {
            Self::Io(err.to_string())
        }
    }
}

pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

/// A secret handed to privileged actions.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret for handing to a privileged channel.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Compares against a candidate in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Fixed privileged system actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    Reboot,
    Shutdown,
    Lock,
    Unlock,
}

impl SystemAction {
    /// Argument vector run under elevation.
    pub fn argv(&self) -> &'static [&'static str] {
        match self {
            SystemAction::Reboot => &["shutdown", "-r", "now"],
            SystemAction::Shutdown => &["shutdown", "now"],
            SystemAction::Lock => &["loginctl", "lock-sessions"],
            SystemAction::Unlock => &["loginctl", "unlock-sessions"],
        }
    }
}

/// Language of a speech request, implied by the verb that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
}

/// Runs external commands.
///
/// A non-zero exit is not an error: the combined stdout and stderr is
/// returned as ordinary output. Errors are reserved for failing to run at all.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Runs a command line without privileges.
    async fn run(&self, command: &str) -> CollaboratorResult<String>;

    /// Runs a command line with elevated privileges, passing `credential`
    /// through a side channel rather than the command line.
    async fn run_elevated(&self, command: &str, credential: &Credential)
    -> CollaboratorResult<String>;

    /// Runs one of the fixed privileged actions.
    async fn run_system_action(
        &self,
        action: SystemAction,
        credential: &Credential,
    ) -> CollaboratorResult<String>;
}

/// Shows desktop notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> CollaboratorResult<String>;
}

/// Speaks text aloud.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str, language: Language) -> CollaboratorResult<String>;
}

/// Captures a still image (camera frame or screenshot) as encoded bytes.
#[async_trait]
pub trait ImageCapture: Send + Sync {
    async fn capture(&self) -> CollaboratorResult<Vec<u8>>;
}

/// Answers free-form questions.
#[async_trait]
pub trait AiQuery: Send + Sync {
    async fn ask(&self, prompt: &str) -> CollaboratorResult<String>;
}

/// The set of collaborators available to the dispatcher.
///
/// Optional entries are absent when their channel is not configured.
#[derive(Clone)]
pub struct Collaborators {
    pub executor: Arc<dyn ProcessExecutor>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    pub camera: Option<Arc<dyn ImageCapture>>,
    pub screen: Option<Arc<dyn ImageCapture>>,
    pub ai: Option<Arc<dyn AiQuery>>,
}

impl Collaborators {
    /// Only a process executor; every optional channel is absent.
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            executor,
            notifier: None,
            speech: None,
            camera: None,
            screen: None,
            ai: None,
        }
    }
}

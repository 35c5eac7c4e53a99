//! Core of chatsh: a remote command interpreter driven over a chat transport.
//!
//! An operator sends short text lines. The [`Engine`] authenticates the
//! sender, expands aliases through the [`AliasStore`], and maps the resulting
//! line onto a fixed vocabulary of actions performed by external
//! [`collaborator`]s.

pub mod alias;
pub mod collaborator;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod session;

pub use alias::{AliasEntry, AliasRepository, AliasStore, AliasTable};
pub use collaborator::{Collaborators, CollaboratorError, Credential};
pub use config::{EngineConfig, FallbackPolicy};
pub use dispatch::Reply;
pub use engine::{Engine, InboundMessage, LoopControl, Outcome};
pub use error::ChatshError;
pub use session::{SessionId, SessionRegistry, SessionRepository};

//! Alias definitions and management.
//!
//! Aliases are short names that expand into full command lines. Two tables
//! hold them: a built-in table provisioned by the operator (read-only at
//! runtime) and a user table that authorized sessions create and describe
//! from the chat. The built-in table always wins a name collision.

pub mod model;
pub mod repository;
pub mod reserved;
pub mod store;

pub use model::{AliasEntry, AliasSource, AliasTable, normalize_name};
pub use repository::AliasRepository;
pub use reserved::{RESERVED_VERBS, is_reserved};
pub use store::AliasStore;

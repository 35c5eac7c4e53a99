//! Session identities and the registry of authorized sessions.

pub mod model;
pub mod registry;
pub mod repository;

pub use model::SessionId;
pub use registry::SessionRegistry;
pub use repository::SessionRepository;

//! Storage layer for atomic file operations.

mod atomic_file;
mod secret_storage;

pub use atomic_file::{AtomicFileError, AtomicTextFile, AtomicTomlFile};
pub use secret_storage::{SecretStorage, SecretStorageError};

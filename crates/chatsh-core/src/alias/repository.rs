//! Alias repository trait.

use crate::alias::AliasTable;
use crate::error::Result;

/// Persistent storage for the two alias tables.
///
/// The built-in table is read-only at runtime and has no save operation.
pub trait AliasRepository: Send + Sync {
    /// Loads the operator-provisioned alias table.
    fn load_builtin(&self) -> Result<AliasTable>;

    /// Loads the user alias table.
    fn load_user(&self) -> Result<AliasTable>;

    /// Replaces the persisted user table with `table`.
    fn save_user(&self, table: &AliasTable) -> Result<()>;
}

use std::sync::Arc;

use crate::context::MutationContext;
use crate::error::ValidationError;
use crate::types::Fields;

/// Pre-commit check attached to one table's create and update paths.
///
/// Hosts call these synchronously, inside the critical section of the write,
/// before any effect of the mutation is visible. Returning `Err` aborts the
/// mutation (and its enclosing transaction); the host must propagate the
/// error to the caller unchanged.
///
/// Used as `Arc<dyn MutationHook>`.
pub trait MutationHook: Send + Sync {
    /// Called before a new record is created. `record` is the proposed body.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] to reject the creation.
    fn creating(&self, ctx: &MutationContext<'_>, record: &Fields) -> Result<(), ValidationError>;

    /// Called before an existing record is updated.
    ///
    /// `delta` holds only the modified fields; `existing` is the stored record
    /// as seen by the writing operation.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] to reject the update.
    fn updating(
        &self,
        ctx: &MutationContext<'_>,
        delta: &Fields,
        existing: &Fields,
    ) -> Result<(), ValidationError>;
}

/// Capability a host store exposes so hooks can be attached to its tables.
pub trait HookHost {
    /// Names of the tables that exist right now.
    fn table_names(&self) -> Vec<String>;

    /// Attaches `hook` to the create and update paths of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or the host refuses the hook.
    fn register_hook(&self, table: &str, hook: Arc<dyn MutationHook>) -> anyhow::Result<()>;
}

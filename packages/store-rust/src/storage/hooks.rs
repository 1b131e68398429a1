//! Composite pre-commit hook.
//!
//! [`CompositeMutationHook`] fans a create/update check out to every hook
//! registered on a table, in registration order.

use std::sync::Arc;

use parking_lot::RwLock;
use tablegate_core::{Fields, MutationContext, MutationHook, ValidationError};

/// Composite hook that runs all registered hooks for one table.
///
/// Hooks run in registration order. The first rejection stops the chain and
/// is returned as-is; later hooks are not consulted for that mutation.
#[derive(Default)]
pub struct CompositeMutationHook {
    hooks: RwLock<Vec<Arc<dyn MutationHook>>>,
}

impl CompositeMutationHook {
    /// Appends a hook; it runs after those already registered.
    pub fn add(&self, hook: Arc<dyn MutationHook>) {
        self.hooks.write().push(hook);
    }

    /// Number of registered hooks.
    pub(crate) fn len(&self) -> usize {
        self.hooks.read().len()
    }

    // Cloned so no lock is held while hooks run.
    fn snapshot(&self) -> Vec<Arc<dyn MutationHook>> {
        self.hooks.read().clone()
    }
}

impl MutationHook for CompositeMutationHook {
    fn creating(&self, ctx: &MutationContext<'_>, record: &Fields) -> Result<(), ValidationError> {
        for hook in self.snapshot() {
            hook.creating(ctx, record)?;
        }
        Ok(())
    }

    fn updating(
        &self,
        ctx: &MutationContext<'_>,
        delta: &Fields,
        existing: &Fields,
    ) -> Result<(), ValidationError> {
        for hook in self.snapshot() {
            hook.updating(ctx, delta, existing)?;
        }
        Ok(())
    }
}

//! Mutation interceptor: binds record validation into a host's write path.
//!
//! [`install`] attaches one shared [`MutationInterceptor`] to every table the
//! host knows about at call time and hands that interceptor back. Tables
//! created afterwards are not covered until [`install_table`] attaches the
//! same interceptor to them. Calling [`install`] a second time on the same
//! host stacks a second interceptor on every table.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::context::MutationContext;
use crate::error::{SchemaError, ValidationError};
use crate::registry::SchemaRegistry;
use crate::traits::{HookHost, MutationHook};
use crate::types::Fields;
use crate::validator::{merge, RecordValidator, ValidationOutcome};

/// [`MutationHook`] that validates every create and update against a
/// [`SchemaRegistry`].
///
/// Performs exactly one validation per call and never modifies the record.
#[derive(Debug, Clone)]
pub struct MutationInterceptor {
    validator: RecordValidator,
}

impl MutationInterceptor {
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            validator: RecordValidator::new(registry),
        }
    }

    #[must_use]
    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    fn decide(
        &self,
        ctx: &MutationContext<'_>,
        op: &'static str,
        candidate: &Fields,
    ) -> Result<(), ValidationError> {
        let outcome = self.validator.validate(ctx.table, candidate);
        if let ValidationOutcome::Invalid { field, reason, .. } = &outcome {
            warn!(
                table = ctx.table,
                key = ctx.key,
                txn_id = ctx.transaction,
                op,
                field = field.as_str(),
                reason = reason.as_str(),
                "mutation rejected"
            );
        } else {
            debug!(table = ctx.table, key = ctx.key, txn_id = ctx.transaction, op, "mutation accepted");
        }
        outcome.into_result()
    }
}

impl MutationHook for MutationInterceptor {
    fn creating(&self, ctx: &MutationContext<'_>, record: &Fields) -> Result<(), ValidationError> {
        self.decide(ctx, "create", record)
    }

    fn updating(
        &self,
        ctx: &MutationContext<'_>,
        delta: &Fields,
        existing: &Fields,
    ) -> Result<(), ValidationError> {
        let candidate = merge(existing, delta);
        self.decide(ctx, "update", &candidate)
    }
}

/// Installs schema validation on every table currently present in `host`.
///
/// Returns the interceptor that was registered. Keep it to cover tables
/// created later with [`install_table`]; it is the only handle that does so
/// without validating existing tables twice.
///
/// Rule sets naming tables the host does not have are kept in the registry
/// but logged, since they will never be consulted unless such a table is
/// created and the interceptor registered on it.
///
/// # Errors
///
/// Returns [`SchemaError::Registration`] if the host refuses a hook. Tables
/// registered before the failure keep their hook.
pub fn install<H>(
    host: &H,
    registry: SchemaRegistry,
) -> Result<Arc<MutationInterceptor>, SchemaError>
where
    H: HookHost + ?Sized,
{
    let tables = host.table_names();

    let known: HashSet<&str> = tables.iter().map(String::as_str).collect();
    for table in registry.tables() {
        if !known.contains(table) {
            warn!(table, "rule set declared for a table the store does not have");
        }
    }

    let interceptor = Arc::new(MutationInterceptor::new(Arc::new(registry)));
    for table in &tables {
        register(host, table, &interceptor)?;
    }

    info!(tables = tables.len(), "schema validation installed");
    Ok(interceptor)
}

/// Attaches an interceptor returned by [`install`] to one more table, usually
/// one created after [`install`] ran.
///
/// Tables that already carry the interceptor must not be passed again; the
/// host would then run it twice per mutation.
///
/// # Errors
///
/// Returns [`SchemaError::Registration`] if the host refuses the hook.
pub fn install_table<H>(
    host: &H,
    table: &str,
    interceptor: &Arc<MutationInterceptor>,
) -> Result<(), SchemaError>
where
    H: HookHost + ?Sized,
{
    if interceptor.validator().registry().lookup(table).is_none() {
        debug!(table, "no rule set for table; interceptor will accept everything");
    }
    register(host, table, interceptor)?;
    info!(table, "schema validation installed on table");
    Ok(())
}

fn register<H>(
    host: &H,
    table: &str,
    interceptor: &Arc<MutationInterceptor>,
) -> Result<(), SchemaError>
where
    H: HookHost + ?Sized,
{
    let hook: Arc<dyn MutationHook> = Arc::clone(interceptor) as Arc<dyn MutationHook>;
    host.register_hook(table, hook).map_err(|source| SchemaError::Registration {
        table: table.to_string(),
        source,
    })
}

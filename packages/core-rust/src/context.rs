/// Identifier of a host-store transaction.
pub type TransactionId = u64;

/// Per-mutation context a host passes to every [`MutationHook`](crate::MutationHook) call.
///
/// Borrowed for the duration of the hook call only; hooks must not retain it.
#[derive(Debug, Clone, Copy)]
pub struct MutationContext<'a> {
    /// Table the mutation targets.
    pub table: &'a str,
    /// Primary key of the record being created or updated.
    pub key: &'a str,
    /// Enclosing transaction, if the mutation is part of one.
    pub transaction: Option<TransactionId>,
}

impl<'a> MutationContext<'a> {
    #[must_use]
    pub fn new(table: &'a str, key: &'a str, transaction: Option<TransactionId>) -> Self {
        Self {
            table,
            key,
            transaction,
        }
    }
}

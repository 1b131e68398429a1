use tablegate_core::ValidationError;

/// Errors returned by [`Database`](crate::Database) and
/// [`Transaction`](crate::Transaction) operations.
///
/// A hook rejection arrives as [`StoreError::Validation`] with the hook's
/// error unchanged, through the same channel as every other write failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("table already exists: {0}")]
    TableExists(String),
    #[error("key already exists in table '{table}': {key}")]
    KeyExists { table: String, key: String },
    #[error("key not found in table '{table}': {key}")]
    KeyNotFound { table: String, key: String },
    #[error("record changed outside the transaction in table '{table}': {key}")]
    WriteConflict { table: String, key: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transaction aborted: {reason}")]
    TransactionAborted { reason: String },
}

impl StoreError {
    /// The validation failure behind this error, if it was a hook rejection.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_unchanged() {
        let inner = ValidationError::new("users", "name", "name must be a string");
        let err = StoreError::from(inner.clone());

        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.validation(), Some(&inner));
    }

    #[test]
    fn other_errors_have_no_validation() {
        let err = StoreError::KeyExists {
            table: "users".into(),
            key: "1".into(),
        };
        assert!(err.validation().is_none());
        assert_eq!(err.to_string(), "key already exists in table 'users': 1");
    }
}

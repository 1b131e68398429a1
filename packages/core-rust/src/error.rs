//! Error types for the validation layer.
//!
//! [`ValidationError`] is the only error raised while a mutation is being
//! checked. [`SchemaError`] covers setup: building rule sets, loading schema
//! documents, and installing the interceptor on a host.

use std::path::PathBuf;

/// A mutation was rejected because its candidate record violates the
/// table's rule set.
///
/// Carries the table, the first failing field, and the field validator's
/// reason. Hosts surface it unchanged through their write-error channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation error in table '{table}', field '{field}': {reason}")]
pub struct ValidationError {
    /// Table the rejected mutation targeted.
    pub table: String,
    /// First field (in declaration order) that failed its constraint.
    pub field: String,
    /// Human-readable reason from the field validator.
    pub reason: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        table: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or installing schemas.
///
/// All of these are returned at setup time; none is deferred to the first
/// mutation.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("field name must not be empty")]
    EmptyFieldName,
    #[error("field '{field}' declared more than once")]
    DuplicateField { field: String },
    #[error("field '{field}': invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
    #[error("field '{field}': integer range min {min} exceeds max {max}")]
    InvalidRange { field: String, min: i64, max: i64 },
    #[error("field '{field}': unknown constraint kind '{kind}'")]
    UnknownKind { field: String, kind: String },
    #[error("field '{field}': malformed constraint: {reason}")]
    MalformedConstraint { field: String, reason: String },
    #[error("table '{table}': rule set must be a JSON object")]
    MalformedTable { table: String },
    #[error("table '{table}': {source}")]
    Table {
        table: String,
        #[source]
        source: Box<SchemaError>,
    },
    #[error("schema document must be a JSON object keyed by table name")]
    MalformedDocument,
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to register validation hook on table '{table}': {source}")]
    Registration {
        table: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SchemaError {
    /// Attaches the table name to an error produced while building its rule set.
    #[must_use]
    pub fn in_table(self, table: impl Into<String>) -> Self {
        SchemaError::Table {
            table: table.into(),
            source: Box::new(self),
        }
    }
}

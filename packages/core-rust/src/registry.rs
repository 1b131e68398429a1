//! Per-table schema registry.
//!
//! Built once at setup and read-only afterwards. A table without an entry is
//! not validated at all.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value as JsonValue;

use crate::error::SchemaError;
use crate::schema::{FieldConstraint, RuleSet};

/// Immutable mapping from table name to [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: HashMap<String, RuleSet>,
}

impl SchemaRegistry {
    /// Builds a registry from `(table, rule set)` pairs. A later entry for the
    /// same table replaces an earlier one.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (S, RuleSet)>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(|(t, r)| (t.into(), r)).collect(),
        }
    }

    /// Returns the rule set for `table`, or `None` if the table is not validated.
    #[must_use]
    pub fn lookup(&self, table: &str) -> Option<&RuleSet> {
        self.tables.get(table)
    }

    /// Names of all tables with a rule set, sorted.
    #[must_use]
    pub fn tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Parses a schema document.
    ///
    /// The document is an object keyed by table name; each table maps field
    /// names to either a kind keyword (`"string"`, `"number"`, `"boolean"`)
    /// or an object with a `kind` key:
    ///
    /// ```json
    /// {
    ///   "users": {
    ///     "name": "string",
    ///     "age": "number",
    ///     "email": { "kind": "pattern", "pattern": "^[^@]+@[^@]+$" },
    ///     "level": { "kind": "integer_range", "min": 1, "max": 99 }
    ///   }
    /// }
    /// ```
    ///
    /// Field order inside a table is kept as written.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for invalid JSON or any malformed table or
    /// field entry. Errors for a specific table are wrapped in
    /// [`SchemaError::Table`].
    pub fn from_json_str(document: &str) -> Result<Self, SchemaError> {
        let value: JsonValue = serde_json::from_str(document)?;
        Self::from_json(&value)
    }

    /// Reads and parses a schema document from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`SchemaRegistry::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&document)
    }

    /// Builds a registry from an already-parsed schema document.
    ///
    /// # Errors
    ///
    /// See [`SchemaRegistry::from_json_str`].
    pub fn from_json(document: &JsonValue) -> Result<Self, SchemaError> {
        let tables = document.as_object().ok_or(SchemaError::MalformedDocument)?;

        let mut out = HashMap::with_capacity(tables.len());
        for (table, fields) in tables {
            let fields = fields.as_object().ok_or_else(|| SchemaError::MalformedTable {
                table: table.clone(),
            })?;

            let rules = fields
                .iter()
                .map(|(field, entry)| Ok((field.clone(), parse_constraint(field, entry)?)))
                .collect::<Result<Vec<_>, SchemaError>>()
                .and_then(RuleSet::new::<_, String>)
                .map_err(|e| e.in_table(table.as_str()))?;

            out.insert(table.clone(), rules);
        }

        Ok(Self { tables: out })
    }
}

fn parse_constraint(field: &str, entry: &JsonValue) -> Result<FieldConstraint, SchemaError> {
    match entry {
        JsonValue::String(kind) => keyword_constraint(field, kind),
        JsonValue::Object(obj) => {
            let kind = obj.get("kind").and_then(JsonValue::as_str).ok_or_else(|| {
                SchemaError::MalformedConstraint {
                    field: field.to_string(),
                    reason: "object form requires a string \"kind\"".into(),
                }
            })?;

            match kind {
                "pattern" => {
                    let pattern = obj.get("pattern").and_then(JsonValue::as_str).ok_or_else(
                        || SchemaError::MalformedConstraint {
                            field: field.to_string(),
                            reason: "pattern requires a string \"pattern\"".into(),
                        },
                    )?;
                    FieldConstraint::pattern(pattern).map_err(|source| {
                        SchemaError::InvalidPattern {
                            field: field.to_string(),
                            source,
                        }
                    })
                }
                "integer_range" => {
                    let bound = |key: &str| {
                        obj.get(key).and_then(JsonValue::as_i64).ok_or_else(|| {
                            SchemaError::MalformedConstraint {
                                field: field.to_string(),
                                reason: format!("integer_range requires an integer \"{key}\""),
                            }
                        })
                    };
                    Ok(FieldConstraint::IntegerRange {
                        min: bound("min")?,
                        max: bound("max")?,
                    })
                }
                other => keyword_constraint(field, other),
            }
        }
        other => Err(SchemaError::MalformedConstraint {
            field: field.to_string(),
            reason: format!("expected a kind keyword or object, got {other}"),
        }),
    }
}

fn keyword_constraint(field: &str, kind: &str) -> Result<FieldConstraint, SchemaError> {
    match kind {
        "string" => Ok(FieldConstraint::RequiredString),
        "number" => Ok(FieldConstraint::PositiveNumber),
        "boolean" => Ok(FieldConstraint::RequiredBool),
        _ => Err(SchemaError::UnknownKind {
            field: field.to_string(),
            kind: kind.to_string(),
        }),
    }
}

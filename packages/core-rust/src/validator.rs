//! Record validation and candidate reconstruction.
//!
//! [`RecordValidator`] checks a complete candidate record against the table's
//! rule set, stopping at the first failing field. [`merge`] builds the
//! candidate for an update from the stored record and the modification delta.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::registry::SchemaRegistry;
use crate::types::Fields;
use crate::validators::FieldCheck;

/// Outcome of validating one candidate record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid {
        table: String,
        field: String,
        reason: String,
    },
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Converts into a `Result`, turning `Invalid` into a [`ValidationError`].
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] carried by an `Invalid` outcome.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid {
                table,
                field,
                reason,
            } => Err(ValidationError {
                table,
                field,
                reason,
            }),
        }
    }
}

/// Validates candidate records against a shared [`SchemaRegistry`].
#[derive(Debug, Clone)]
pub struct RecordValidator {
    registry: Arc<SchemaRegistry>,
}

impl RecordValidator {
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validates `candidate` against the rule set registered for `table`.
    ///
    /// Tables without a rule set are always `Valid`. Otherwise fields are
    /// checked in declaration order and the first failure is returned.
    #[must_use]
    pub fn validate(&self, table: &str, candidate: &Fields) -> ValidationOutcome {
        let Some(rules) = self.registry.lookup(table) else {
            return ValidationOutcome::Valid;
        };

        for (field, constraint) in rules.iter() {
            if let FieldCheck::Fail(reason) = constraint.check(field, candidate.get(field)) {
                return ValidationOutcome::Invalid {
                    table: table.to_string(),
                    field: field.to_string(),
                    reason,
                };
            }
        }

        ValidationOutcome::Valid
    }
}

/// Overlays `delta` onto `existing`, producing the post-update record.
///
/// Every field of `existing` is carried over unless `delta` redefines it, in
/// which case the delta's value wins. Neither input is modified.
#[must_use]
pub fn merge(existing: &Fields, delta: &Fields) -> Fields {
    let mut candidate = existing.clone();
    for (field, value) in delta {
        candidate.insert(field.clone(), value.clone());
    }
    candidate
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::schema::{FieldConstraint, RuleSet};
    use crate::types::Value;

    fn fields(value: serde_json::Value) -> Fields {
        Value::from(value).into_fields().unwrap()
    }

    fn users_validator() -> RecordValidator {
        let rules = RuleSet::new([
            ("name", FieldConstraint::RequiredString),
            ("age", FieldConstraint::PositiveNumber),
        ])
        .unwrap();
        RecordValidator::new(Arc::new(SchemaRegistry::new([("users", rules)])))
    }

    #[test]
    fn unregistered_table_is_valid() {
        let validator = users_validator();
        let outcome = validator.validate("orders", &fields(json!({"total": "oops"})));
        assert_eq!(outcome, ValidationOutcome::Valid);
    }

    #[test]
    fn valid_record_passes() {
        let validator = users_validator();
        let outcome = validator.validate("users", &fields(json!({"name": "Charlie", "age": 30})));
        assert!(outcome.is_valid());
    }

    #[test]
    fn string_age_is_rejected_on_age() {
        let validator = users_validator();
        let outcome =
            validator.validate("users", &fields(json!({"name": "David", "age": "twenty"})));

        assert_eq!(
            outcome,
            ValidationOutcome::Invalid {
                table: "users".into(),
                field: "age".into(),
                reason: "age must be a positive number".into(),
            }
        );
    }

    #[test]
    fn first_declared_failure_wins() {
        let validator = users_validator();
        let outcome = validator.validate("users", &fields(json!({"age": -1})));

        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.reason, "name must be a string");
    }

    #[test]
    fn undeclared_fields_are_ignored() {
        let validator = users_validator();
        let outcome = validator.validate(
            "users",
            &fields(json!({"name": "Eve", "age": 41, "nickname": 7})),
        );
        assert!(outcome.is_valid());
    }

    #[test]
    fn merge_overlays_delta() {
        let existing = fields(json!({"name": "Alice", "age": 30}));
        let delta = fields(json!({"age": -5}));

        let candidate = merge(&existing, &delta);

        assert_eq!(candidate, fields(json!({"name": "Alice", "age": -5})));
        // inputs untouched
        assert_eq!(existing, fields(json!({"name": "Alice", "age": 30})));
    }

    #[test]
    fn merge_adds_new_fields() {
        let existing = fields(json!({"name": "Alice"}));
        let delta = fields(json!({"email": "alice@example.com"}));

        let candidate = merge(&existing, &delta);
        assert_eq!(candidate.len(), 2);
        assert_eq!(candidate.get("email"), Some(&Value::from("alice@example.com")));
    }

    fn small_fields() -> impl Strategy<Value = Fields> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        prop::collection::btree_map("[a-e]{1,2}", leaf, 0..6)
    }

    proptest! {
        /// Fields absent from the delta are carried over unchanged; delta fields win.
        #[test]
        fn merge_preserves_and_overrides(existing in small_fields(), delta in small_fields()) {
            let candidate = merge(&existing, &delta);

            for (field, value) in &delta {
                prop_assert_eq!(candidate.get(field), Some(value));
            }
            for (field, value) in &existing {
                if !delta.contains_key(field) {
                    prop_assert_eq!(candidate.get(field), Some(value));
                }
            }
            for field in candidate.keys() {
                prop_assert!(existing.contains_key(field) || delta.contains_key(field));
            }
        }

        /// A table with no rule set accepts any record shape.
        #[test]
        fn unregistered_tables_fail_open(record in small_fields()) {
            let validator = users_validator();
            prop_assert!(validator.validate("audit_log", &record).is_valid());
        }
    }
}

//! Field validators: one pure function per [`FieldConstraint`] kind.
//!
//! Each validator sees a single field of the candidate record. An absent
//! field arrives as `None`; every baseline kind treats that as a failure.

use crate::schema::FieldConstraint;
use crate::types::Value;

/// Result of checking one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Pass,
    /// The field failed; carries the human-readable reason.
    Fail(String),
}

impl FieldCheck {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, FieldCheck::Pass)
    }
}

impl FieldConstraint {
    /// Runs this constraint's validator against `value`.
    #[must_use]
    pub fn check(&self, field: &str, value: Option<&Value>) -> FieldCheck {
        match self {
            FieldConstraint::RequiredString => required_string(field, value),
            FieldConstraint::PositiveNumber => positive_number(field, value),
            FieldConstraint::RequiredBool => required_bool(field, value),
            FieldConstraint::Pattern(re) => pattern(field, re, value),
            FieldConstraint::IntegerRange { min, max } => integer_range(field, *min, *max, value),
        }
    }
}

/// Passes iff the value is a string.
#[must_use]
pub fn required_string(field: &str, value: Option<&Value>) -> FieldCheck {
    match value {
        Some(Value::String(_)) => FieldCheck::Pass,
        _ => FieldCheck::Fail(format!("{field} must be a string")),
    }
}

/// Passes iff the value is numeric and strictly greater than zero.
///
/// NaN compares false against zero and therefore fails.
#[must_use]
pub fn positive_number(field: &str, value: Option<&Value>) -> FieldCheck {
    match value.and_then(Value::as_f64) {
        Some(n) if n > 0.0 => FieldCheck::Pass,
        _ => FieldCheck::Fail(format!("{field} must be a positive number")),
    }
}

/// Passes iff the value is a boolean.
#[must_use]
pub fn required_bool(field: &str, value: Option<&Value>) -> FieldCheck {
    match value {
        Some(Value::Bool(_)) => FieldCheck::Pass,
        _ => FieldCheck::Fail(format!("{field} must be a boolean")),
    }
}

/// Passes iff the value is a string matched by `re`.
#[must_use]
pub fn pattern(field: &str, re: &regex::Regex, value: Option<&Value>) -> FieldCheck {
    match value.and_then(Value::as_str) {
        Some(s) if re.is_match(s) => FieldCheck::Pass,
        _ => FieldCheck::Fail(format!(
            "{field} must be a string matching /{}/",
            re.as_str()
        )),
    }
}

/// Passes iff the value is an `Int` within `min..=max`.
///
/// Floats are rejected even when integral.
#[must_use]
pub fn integer_range(field: &str, min: i64, max: i64, value: Option<&Value>) -> FieldCheck {
    match value {
        Some(Value::Int(i)) if (min..=max).contains(i) => FieldCheck::Pass,
        _ => FieldCheck::Fail(format!(
            "{field} must be an integer between {min} and {max}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(reason: &str) -> FieldCheck {
        FieldCheck::Fail(reason.to_string())
    }

    #[test]
    fn required_string_accepts_any_string() {
        assert_eq!(required_string("name", Some(&Value::from("Alice"))), FieldCheck::Pass);
        assert_eq!(required_string("name", Some(&Value::from(""))), FieldCheck::Pass);
    }

    #[test]
    fn required_string_rejects_other_kinds_and_absent() {
        let expected = fail("name must be a string");
        assert_eq!(required_string("name", None), expected);
        assert_eq!(required_string("name", Some(&Value::Null)), expected);
        assert_eq!(required_string("name", Some(&Value::Int(1))), expected);
        assert_eq!(required_string("name", Some(&Value::Bytes(b"x".to_vec()))), expected);
    }

    #[test]
    fn positive_number_accepts_positive_int_and_float() {
        assert!(positive_number("age", Some(&Value::Int(30))).is_pass());
        assert!(positive_number("age", Some(&Value::Float(0.01))).is_pass());
    }

    #[test]
    fn positive_number_rejects_zero_negative_and_non_numeric() {
        let expected = fail("age must be a positive number");
        assert_eq!(positive_number("age", Some(&Value::Int(0))), expected);
        assert_eq!(positive_number("age", Some(&Value::Int(-5))), expected);
        assert_eq!(positive_number("age", Some(&Value::Float(-0.0))), expected);
        assert_eq!(positive_number("age", Some(&Value::Float(f64::NAN))), expected);
        assert_eq!(positive_number("age", Some(&Value::from("twenty"))), expected);
        assert_eq!(positive_number("age", None), expected);
    }

    #[test]
    fn required_bool_only_accepts_bool() {
        assert!(required_bool("active", Some(&Value::Bool(false))).is_pass());
        assert_eq!(
            required_bool("active", Some(&Value::Int(1))),
            fail("active must be a boolean")
        );
    }

    #[test]
    fn pattern_requires_matching_string() {
        let re = regex::Regex::new("^[a-z]+@[a-z]+$").unwrap();
        assert!(pattern("email", &re, Some(&Value::from("bob@example"))).is_pass());
        assert_eq!(
            pattern("email", &re, Some(&Value::from("not an email"))),
            fail("email must be a string matching /^[a-z]+@[a-z]+$/")
        );
        assert!(!pattern("email", &re, Some(&Value::Int(3))).is_pass());
    }

    #[test]
    fn integer_range_is_inclusive() {
        assert!(integer_range("level", 1, 10, Some(&Value::Int(1))).is_pass());
        assert!(integer_range("level", 1, 10, Some(&Value::Int(10))).is_pass());
        assert!(!integer_range("level", 1, 10, Some(&Value::Int(11))).is_pass());
        assert!(!integer_range("level", 1, 10, Some(&Value::Float(5.0))).is_pass());
    }

    #[test]
    fn check_dispatches_on_kind() {
        let value = Value::Int(7);
        assert!(FieldConstraint::PositiveNumber.check("n", Some(&value)).is_pass());
        assert!(!FieldConstraint::RequiredString.check("n", Some(&value)).is_pass());
        assert!(FieldConstraint::IntegerRange { min: 0, max: 7 }
            .check("n", Some(&value))
            .is_pass());
    }
}

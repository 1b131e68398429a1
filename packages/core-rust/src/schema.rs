use std::fmt;

use regex::Regex;

use crate::error::SchemaError;

/// One kind of per-field check.
///
/// The set of kinds is closed per release; adding one means adding a variant
/// here and its validator in [`validators`](crate::validators). Neither the
/// registry nor the interceptor needs to change.
#[derive(Debug, Clone)]
pub enum FieldConstraint {
    /// Value must be a string. Absent fails.
    RequiredString,
    /// Value must be numeric and strictly greater than zero.
    PositiveNumber,
    /// Value must be a boolean.
    RequiredBool,
    /// Value must be a string matching the pattern.
    Pattern(Regex),
    /// Value must be an integer within `min..=max`.
    IntegerRange {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl FieldConstraint {
    /// Compiles `pattern` into a [`FieldConstraint::Pattern`].
    ///
    /// # Errors
    ///
    /// Returns the regex compile error if `pattern` is not a valid expression.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(FieldConstraint::Pattern)
    }

    /// Stable name of the constraint kind, matching the schema document keyword.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FieldConstraint::RequiredString => "string",
            FieldConstraint::PositiveNumber => "number",
            FieldConstraint::RequiredBool => "boolean",
            FieldConstraint::Pattern(_) => "pattern",
            FieldConstraint::IntegerRange { .. } => "integer_range",
        }
    }
}

impl fmt::Display for FieldConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldConstraint::Pattern(re) => write!(f, "pattern /{}/", re.as_str()),
            FieldConstraint::IntegerRange { min, max } => {
                write!(f, "integer_range {min}..={max}")
            }
            other => f.write_str(other.kind()),
        }
    }
}

/// Field-level constraints declared for one table.
///
/// Rules are kept in declaration order, which is also the order the record
/// validator checks them in.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, FieldConstraint)>,
}

impl RuleSet {
    /// Builds a rule set from `(field, constraint)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyFieldName`] for an empty field name,
    /// [`SchemaError::DuplicateField`] if a field is declared twice, and
    /// [`SchemaError::InvalidRange`] for an integer range with `min > max`.
    pub fn new<I, S>(rules: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, FieldConstraint)>,
        S: Into<String>,
    {
        let mut out: Vec<(String, FieldConstraint)> = Vec::new();
        for (field, constraint) in rules {
            let field = field.into();
            if field.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if out.iter().any(|(existing, _)| *existing == field) {
                return Err(SchemaError::DuplicateField { field });
            }
            if let FieldConstraint::IntegerRange { min, max } = &constraint {
                if min > max {
                    return Err(SchemaError::InvalidRange {
                        field,
                        min: *min,
                        max: *max,
                    });
                }
            }
            out.push((field, constraint));
        }
        Ok(Self { rules: out })
    }

    /// Returns the constraint declared for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldConstraint> {
        self.rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, constraint)| constraint)
    }

    /// Iterates declared fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldConstraint)> {
        self.rules.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declaration_order() {
        let rules = RuleSet::new([
            ("name", FieldConstraint::RequiredString),
            ("age", FieldConstraint::PositiveNumber),
            ("active", FieldConstraint::RequiredBool),
        ])
        .unwrap();

        let names: Vec<&str> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "age", "active"]);
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn rejects_duplicate_field() {
        let err = RuleSet::new([
            ("name", FieldConstraint::RequiredString),
            ("name", FieldConstraint::PositiveNumber),
        ])
        .unwrap_err();

        assert!(matches!(err, SchemaError::DuplicateField { field } if field == "name"));
    }

    #[test]
    fn rejects_empty_field_name() {
        let err = RuleSet::new([("", FieldConstraint::RequiredString)]).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyFieldName));
    }

    #[test]
    fn rejects_inverted_range() {
        let err =
            RuleSet::new([("level", FieldConstraint::IntegerRange { min: 10, max: 1 })])
                .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidRange { min: 10, max: 1, .. }
        ));
    }

    #[test]
    fn get_finds_declared_field() {
        let rules = RuleSet::new([("age", FieldConstraint::PositiveNumber)]).unwrap();
        assert!(matches!(
            rules.get("age"),
            Some(FieldConstraint::PositiveNumber)
        ));
        assert!(rules.get("name").is_none());
    }

    #[test]
    fn invalid_pattern_fails_to_compile() {
        assert!(FieldConstraint::pattern("(unclosed").is_err());
        assert!(FieldConstraint::pattern("^[a-z]+$").is_ok());
    }

    #[test]
    fn display_includes_parameters() {
        let pattern = FieldConstraint::pattern("^a+$").unwrap();
        assert_eq!(pattern.to_string(), "pattern /^a+$/");
        assert_eq!(
            FieldConstraint::IntegerRange { min: 1, max: 5 }.to_string(),
            "integer_range 1..=5"
        );
        assert_eq!(FieldConstraint::RequiredString.to_string(), "string");
    }
}

//! Declarative field validation
//!
//! A `Rules` set describes, per field, whether a value is required and which
//! format checks apply to it. `validate` evaluates every configured field and
//! collects all failures into a `ValidationResult`. Invalid input is never an
//! error: the outcome is always data.

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

/// Address syntax accepted for email fields
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// A plain record whose fields can be looked up by name
pub trait Record {
    /// Returns the field's value, or `None` when the field is absent
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Record for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Predicate used by a custom check
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
struct CustomCheck {
    message: String,
    predicate: Predicate,
}

/// Checks applied to a single field
#[derive(Clone)]
pub struct FieldRule {
    required: bool,
    label: Option<String>,
    pattern: Option<Regex>,
    pattern_message: Option<String>,
    min_length: Option<usize>,
    custom: Option<CustomCheck>,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("label", &self.label)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min_length", &self.min_length)
            .field("custom", &self.custom.as_ref().map(|c| c.message.as_str()))
            .finish()
    }
}

impl FieldRule {
    /// A field that must be present and non-blank
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::optional()
        }
    }

    /// A field that may be absent; checks only run on present values
    pub fn optional() -> Self {
        Self {
            required: false,
            label: None,
            pattern: None,
            pattern_message: None,
            min_length: None,
            custom: None,
        }
    }

    /// Human-readable name used in messages
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Message reported when the pattern does not match
    pub fn pattern_message(mut self, message: impl Into<String>) -> Self {
        self.pattern_message = Some(message.into());
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Adds a custom predicate; `message` is reported when it returns false
    pub fn check<F>(mut self, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(CustomCheck {
            message: message.into(),
            predicate: Arc::new(predicate),
        });
        self
    }

    fn display_label<'a>(&'a self, field: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(field)
    }

    /// Runs the checks in order and returns the first failure message
    fn evaluate(&self, field: &str, raw: Option<&str>) -> Option<String> {
        let value = raw.map(str::trim).filter(|v| !v.is_empty());

        let Some(value) = value else {
            return self
                .required
                .then(|| format!("{} is required", self.display_label(field)));
        };

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Some(match &self.pattern_message {
                    Some(message) => message.clone(),
                    None => format!("{} is not valid", self.display_label(field)),
                });
            }
        }

        if let Some(min) = self.min_length {
            if value.chars().count() < min {
                return Some(format!(
                    "{} must be at least {} characters",
                    self.display_label(field),
                    min
                ));
            }
        }

        if let Some(custom) = &self.custom {
            if !(custom.predicate)(value) {
                return Some(custom.message.clone());
            }
        }

        None
    }
}

/// Errors in a rule set definition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("rule set has no fields")]
    Empty,
    #[error("field '{0}' is configured more than once")]
    DuplicateField(String),
}

/// A validated, immutable set of field rules
#[derive(Debug, Clone)]
pub struct Rules {
    fields: Vec<(String, FieldRule)>,
}

impl Rules {
    pub fn builder() -> RulesBuilder {
        RulesBuilder::default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Default)]
pub struct RulesBuilder {
    fields: Vec<(String, FieldRule)>,
}

impl RulesBuilder {
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    pub fn build(self) -> Result<Rules, RulesError> {
        if self.fields.is_empty() {
            return Err(RulesError::Empty);
        }
        for (i, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|(other, _)| other == name) {
                return Err(RulesError::DuplicateField(name.clone()));
            }
        }
        Ok(Rules {
            fields: self.fields,
        })
    }
}

/// Outcome of validating one record
///
/// Holds one message per failing field. Never mutated after `validate`
/// returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    /// True iff no field failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}

/// Validate `record` against `rules`, collecting failures for every field
pub fn validate<R: Record + ?Sized>(record: &R, rules: &Rules) -> ValidationResult {
    let errors = rules
        .fields
        .iter()
        .filter_map(|(name, rule)| {
            let value = record.field(name);
            rule.evaluate(name, value.as_deref())
                .map(|message| (name.clone(), message))
        })
        .collect();

    ValidationResult { errors }
}

static USER_RULES: LazyLock<Rules> = LazyLock::new(|| {
    Rules::builder()
        .field(
            "email",
            FieldRule::required()
                .label("Email")
                .pattern(EMAIL_REGEX.clone())
                .pattern_message("Please enter a valid email address"),
        )
        .field("first_name", FieldRule::required().label("First name"))
        .field("last_name", FieldRule::required().label("Last name"))
        .build()
        .expect("user rules are statically well-formed")
});

/// Rules applied to user records before they are committed
pub fn user_rules() -> &'static Rules {
    &USER_RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_email_is_reported() {
        let result = validate(
            &record(&[("first_name", "A"), ("last_name", "B")]),
            user_rules(),
        );
        assert!(!result.is_valid());
        assert_eq!(result.error("email"), Some("Email is required"));
    }

    #[test]
    fn test_invalid_emails_fail() {
        for email in ["foo", "foo@", "@bar.com", "a b@c.com", "a@b"] {
            let result = validate(
                &record(&[("email", email), ("first_name", "A"), ("last_name", "B")]),
                user_rules(),
            );
            assert!(!result.is_valid(), "expected '{}' to be rejected", email);
            assert_eq!(
                result.error("email"),
                Some("Please enter a valid email address")
            );
        }
    }

    #[test]
    fn test_valid_user_passes() {
        let result = validate(
            &record(&[("email", "a@b.com"), ("first_name", "A"), ("last_name", "B")]),
            user_rules(),
        );
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_all_fields_are_collected() {
        let result = validate(&record(&[("email", "nope")]), user_rules());
        assert_eq!(result.errors().len(), 3);
        assert!(result.error("first_name").is_some());
        assert!(result.error("last_name").is_some());
    }

    #[test]
    fn test_whitespace_only_fails_required() {
        let result = validate(
            &record(&[("email", "a@b.com"), ("first_name", "   "), ("last_name", "B")]),
            user_rules(),
        );
        assert_eq!(result.error("first_name"), Some("First name is required"));
    }

    #[test]
    fn test_validate_is_deterministic() {
        let input = record(&[("email", "foo@"), ("first_name", "A")]);
        assert_eq!(validate(&input, user_rules()), validate(&input, user_rules()));
    }

    #[test]
    fn test_absent_optional_field_never_fails() {
        let rules = Rules::builder()
            .field(
                "nickname",
                FieldRule::optional()
                    .min_length(3)
                    .pattern(Regex::new("^[a-z]+$").unwrap()),
            )
            .build()
            .unwrap();

        assert!(validate(&record(&[]), &rules).is_valid());
        assert!(validate(&record(&[("nickname", "  ")]), &rules).is_valid());
        assert!(!validate(&record(&[("nickname", "ab")]), &rules).is_valid());
        assert!(!validate(&record(&[("nickname", "ABC")]), &rules).is_valid());
    }

    #[test]
    fn test_min_length_and_custom_check() {
        let rules = Rules::builder()
            .field(
                "password",
                FieldRule::required()
                    .label("Password")
                    .min_length(8)
                    .check("Password needs a digit", |v| v.chars().any(|c| c.is_ascii_digit())),
            )
            .build()
            .unwrap();

        let short = validate(&record(&[("password", "abc")]), &rules);
        assert_eq!(
            short.error("password"),
            Some("Password must be at least 8 characters")
        );

        let no_digit = validate(&record(&[("password", "abcdefgh")]), &rules);
        assert_eq!(no_digit.error("password"), Some("Password needs a digit"));

        assert!(validate(&record(&[("password", "abcdefg1")]), &rules).is_valid());
    }

    #[test]
    fn test_json_record() {
        let value: Value = serde_json::json!({
            "email": "a@b.com",
            "first_name": "A",
            "last_name": null,
        });
        let map = value.as_object().unwrap();
        let result = validate(map, user_rules());
        assert_eq!(result.error("last_name"), Some("Last name is required"));
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_rules_builder_rejects_bad_configuration() {
        assert_eq!(Rules::builder().build().unwrap_err(), RulesError::Empty);

        let err = Rules::builder()
            .field("email", FieldRule::required())
            .field("email", FieldRule::optional())
            .build()
            .unwrap_err();
        assert_eq!(err, RulesError::DuplicateField("email".to_string()));
    }
}

//! Static field configuration and form validation.
//!
//! [`USER_FIELDS`] drives both the table columns and the create/update form.
//! Validation runs in the inbound adapter before a mutation is submitted;
//! stores never validate.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::user::UserFields;

/// Input kind of a configured field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Email address.
    Email,
    /// Telephone number.
    Tel,
    /// Numeric value.
    Number,
    /// Calendar date as `YYYY-MM-DD`.
    Date,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Number => "number",
            Self::Date => "date",
        })
    }
}

/// Presentation and validation rules for one user attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Attribute name on the wire.
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Whether the form refuses to submit without a value.
    pub required: bool,
    /// Hint shown in an empty input.
    pub placeholder: &'static str,
}

/// The user attributes the dashboard displays and edits, in column order.
pub const USER_FIELDS: &[FieldConfig] = &[
    FieldConfig {
        name: "name",
        label: "Name",
        kind: FieldKind::Text,
        required: true,
        placeholder: "Enter name",
    },
    FieldConfig {
        name: "username",
        label: "Username",
        kind: FieldKind::Text,
        required: true,
        placeholder: "Enter username",
    },
    FieldConfig {
        name: "email",
        label: "Email Address",
        kind: FieldKind::Email,
        required: true,
        placeholder: "Enter email address",
    },
    FieldConfig {
        name: "phone",
        label: "Phone Number",
        kind: FieldKind::Tel,
        required: true,
        placeholder: "Enter phone number",
    },
    FieldConfig {
        name: "website",
        label: "Website",
        kind: FieldKind::Text,
        required: false,
        placeholder: "Enter website",
    },
];

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Wire name of the field.
    pub field: String,
    /// Message shown next to the input.
    pub message: String,
}

/// Every field that failed validation, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", self.summary())]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Failing fields.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message.as_str())
    }

    /// Every message joined with `"; "`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // local@domain.tld, no whitespace, exactly one `@`.
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validate `fields` against [`USER_FIELDS`].
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every failing field.
///
/// # Examples
/// ```
/// use dashboard::domain::{UserFields, validate_fields};
///
/// let mut fields = UserFields::default();
/// fields.set("name", "Ada");
/// fields.set("email", "not-an-email");
///
/// let error = validate_fields(&fields).expect_err("incomplete form");
/// assert_eq!(error.message_for("email"), Some("Invalid email format"));
/// assert_eq!(error.message_for("username"), Some("Username is required"));
/// ```
pub fn validate_fields(fields: &UserFields) -> Result<(), ValidationError> {
    validate_against(USER_FIELDS, fields)
}

/// Validate `fields` against an arbitrary field configuration.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every failing field.
pub fn validate_against(config: &[FieldConfig], fields: &UserFields) -> Result<(), ValidationError> {
    let issues: Vec<FieldIssue> = config
        .iter()
        .filter_map(|field| {
            check_field(field, fields.text(field.name).as_deref()).map(|message| FieldIssue {
                field: field.name.to_owned(),
                message,
            })
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn check_field(field: &FieldConfig, value: Option<&str>) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let Some(value) = value else {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    };

    match field.kind {
        FieldKind::Email if !email_regex().is_match(value) => {
            Some("Invalid email format".to_owned())
        }
        FieldKind::Number if value.parse::<f64>().map_or(true, |n| !n.is_finite()) => {
            Some(format!("{} must be a number", field.label))
        }
        FieldKind::Date if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => {
            Some(format!("{} must be a date (YYYY-MM-DD)", field.label))
        }
        _ => None,
    }
}

//! User record model.
//!
//! The users endpoint owns identifiers and may return attributes this crate
//! does not model. Known fields are typed; anything else is carried in
//! [`UserFields::extra`] so a round trip never drops server data.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned user identifier.
///
/// Identifiers keep the JSON kind they arrived with, so `1` and `"1"` are
/// different identifiers and serialise back unchanged.
///
/// # Examples
/// ```
/// use dashboard::domain::UserId;
///
/// let numeric: UserId = serde_json::from_str("7").expect("number id");
/// let textual: UserId = serde_json::from_str("\"7\"").expect("string id");
/// assert_ne!(numeric, textual);
/// assert_eq!(numeric.to_string(), textual.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Integer identifier.
    Number(i64),
    /// Opaque string identifier.
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Parses command-line input: integers become [`UserId::Number`], anything
/// else [`UserId::Text`].
impl FromStr for UserId {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(raw
            .parse::<i64>()
            .map_or_else(|_| Self::Text(raw.to_owned()), Self::Number))
    }
}

/// Editable user attributes.
///
/// Every known field is optional on the wire; which ones a form must fill in
/// is decided by [`crate::domain::USER_FIELDS`], not by this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFields {
    /// Full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Login handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Contact email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Personal website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Attributes the dashboard does not model, such as nested `address`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Create payload: a user without an identifier.
pub type UserDraft = UserFields;

/// Partial update; present fields override the stored record.
pub type UserPatch = UserFields;

impl UserFields {
    fn known_slot(&self, name: &str) -> Option<&Option<String>> {
        match name {
            "name" => Some(&self.name),
            "username" => Some(&self.username),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "website" => Some(&self.website),
            _ => None,
        }
    }

    fn known_slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "name" => Some(&mut self.name),
            "username" => Some(&mut self.username),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "website" => Some(&mut self.website),
            _ => None,
        }
    }

    /// Text form of the field called `name`, looking in `extra` for unknown
    /// names. Non-string extra values render as compact JSON.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        match self.known_slot(name) {
            Some(slot) => slot.clone(),
            None => self.extra.get(name).map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
        }
    }

    /// Set the field called `name` to a string value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.known_slot_mut(name) {
            Some(slot) => *slot = Some(value),
            None => {
                self.extra.insert(name.to_owned(), Value::String(value));
            }
        }
    }

    /// Whether no field at all is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.website.is_none()
            && self.extra.is_empty()
    }

    /// Overlay `patch` onto these fields.
    #[must_use]
    pub fn overlaid_with(&self, patch: &UserPatch) -> Self {
        let mut extra = self.extra.clone();
        extra.extend(patch.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            name: patch.name.clone().or_else(|| self.name.clone()),
            username: patch.username.clone().or_else(|| self.username.clone()),
            email: patch.email.clone().or_else(|| self.email.clone()),
            phone: patch.phone.clone().or_else(|| self.phone.clone()),
            website: patch.website.clone().or_else(|| self.website.clone()),
            extra,
        }
    }
}

/// A persisted user.
///
/// ## Invariants
/// - `id` is unique within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Everything except the identifier.
    #[serde(flatten)]
    pub fields: UserFields,
}

impl User {
    /// Build a user from an identifier and its fields.
    #[must_use]
    pub const fn new(id: UserId, fields: UserFields) -> Self {
        Self { id, fields }
    }

    /// Full field set to send when applying `patch` to this user.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{User, UserFields, UserId};
    ///
    /// let mut fields = UserFields::default();
    /// fields.set("name", "Ada");
    /// fields.set("email", "ada@example.org");
    /// let user = User::new(UserId::Number(1), fields);
    ///
    /// let mut patch = UserFields::default();
    /// patch.set("name", "Ada Lovelace");
    ///
    /// let merged = user.merged_with(&patch);
    /// assert_eq!(merged.name.as_deref(), Some("Ada Lovelace"));
    /// assert_eq!(merged.email.as_deref(), Some("ada@example.org"));
    /// ```
    #[must_use]
    pub fn merged_with(&self, patch: &UserPatch) -> UserFields {
        self.fields.overlaid_with(patch)
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;

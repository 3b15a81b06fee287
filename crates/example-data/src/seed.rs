//! Generated user draft type.
//!
//! Drafts carry no identifier; the users endpoint assigns one on create.

use serde::{Deserialize, Serialize};

/// A generated example user ready to be sent as a create payload.
///
/// # Example
///
/// ```
/// use example_data::ExampleUserDraft;
///
/// let user = ExampleUserDraft {
///     name: "Ada Lovelace".to_owned(),
///     username: "ada.lovelace".to_owned(),
///     email: "ada.lovelace@example.org".to_owned(),
///     phone: "555-201-0000".to_owned(),
///     website: None,
/// };
///
/// assert_eq!(user.username, "ada.lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleUserDraft {
    /// Full name.
    pub name: String,
    /// Unique login handle.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Personal website, absent for some users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

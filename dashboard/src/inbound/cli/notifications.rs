//! User-facing notifications for completed and failed operations.

use serde::Serialize;

use crate::domain::{Error, ErrorCode, UsersOperation};

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// The operation completed.
    Success,
    /// The operation failed.
    Error,
}

/// A one-line message shown after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    kind: NotificationKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

fn fallback_message(operation: UsersOperation) -> &'static str {
    match operation {
        UsersOperation::Load => "Failed to load users",
        UsersOperation::Create => "Failed to create user",
        UsersOperation::Update => "Failed to update user",
        UsersOperation::Delete => "Failed to delete user",
    }
}

impl Notification {
    /// Success notice for `operation`; loading has none.
    #[must_use]
    pub fn success(operation: UsersOperation) -> Option<Self> {
        let message = match operation {
            UsersOperation::Load => return None,
            UsersOperation::Create => "User created successfully",
            UsersOperation::Update => "User updated successfully",
            UsersOperation::Delete => "User deleted successfully",
        };
        Some(Self {
            kind: NotificationKind::Success,
            message: message.to_owned(),
            code: None,
        })
    }

    /// Failure notice for `operation`.
    ///
    /// Prefers the server's own message, then the validation summary, then
    /// the per-operation fallback.
    #[must_use]
    pub fn failure(operation: UsersOperation, error: &Error) -> Self {
        let message = match error {
            Error::Validation(validation) => validation.to_string(),
            other => other
                .server_message()
                .map_or_else(|| fallback_message(operation).to_owned(), str::to_owned),
        };
        Self {
            kind: NotificationKind::Error,
            message,
            code: Some(error.code()),
        }
    }

    /// Outcome class.
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error code for failures.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::UsersRemoteError;
    use crate::domain::{UserFields, UserId, validate_fields};

    #[rstest]
    #[case(UsersOperation::Create, "User created successfully")]
    #[case(UsersOperation::Update, "User updated successfully")]
    #[case(UsersOperation::Delete, "User deleted successfully")]
    fn success_messages(#[case] operation: UsersOperation, #[case] expected: &str) {
        let notice = Notification::success(operation).expect("mutations notify");
        assert_eq!(notice.kind(), NotificationKind::Success);
        assert_eq!(notice.message(), expected);
    }

    #[test]
    fn loading_has_no_success_notice() {
        assert_eq!(Notification::success(UsersOperation::Load), None);
    }

    #[rstest]
    #[case(UsersOperation::Load, "Failed to load users")]
    #[case(UsersOperation::Create, "Failed to create user")]
    #[case(UsersOperation::Update, "Failed to update user")]
    #[case(UsersOperation::Delete, "Failed to delete user")]
    fn falls_back_per_operation(#[case] operation: UsersOperation, #[case] expected: &str) {
        let error = Error::Remote(UsersRemoteError::remote(500, None));
        let notice = Notification::failure(operation, &error);
        assert_eq!(notice.message(), expected);
        assert_eq!(notice.code(), Some(ErrorCode::Remote));
    }

    #[test]
    fn prefers_the_server_message() {
        let error = Error::Remote(UsersRemoteError::remote(
            409,
            Some("Email already taken".to_owned()),
        ));
        let notice = Notification::failure(UsersOperation::Create, &error);
        assert_eq!(notice.message(), "Email already taken");
    }

    #[test]
    fn network_failures_use_the_fallback() {
        let error = Error::Remote(UsersRemoteError::network("connection refused"));
        let notice = Notification::failure(UsersOperation::Load, &error);
        assert_eq!(notice.message(), "Failed to load users");
        assert_eq!(notice.code(), Some(ErrorCode::Network));
    }

    #[test]
    fn validation_failures_list_the_issues() {
        let mut fields = UserFields::default();
        fields.set("name", "Ada");
        fields.set("username", "ada");
        fields.set("phone", "555");
        fields.set("email", "nope");
        let error = Error::from(validate_fields(&fields).expect_err("bad email"));

        let notice = Notification::failure(UsersOperation::Create, &error);
        assert_eq!(notice.message(), "Invalid email format");
    }

    #[test]
    fn unknown_users_use_the_fallback() {
        let error = Error::UnknownUser {
            id: UserId::Number(9),
        };
        let notice = Notification::failure(UsersOperation::Update, &error);
        assert_eq!(notice.message(), "Failed to update user");
    }
}

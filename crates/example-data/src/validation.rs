//! Username and email checks mirroring the dashboard's form rules.
//!
//! Generated drafts are submitted through the same validation the dashboard
//! applies to hand-entered users, so these rules must stay at least as strict.
//!
//! # Validation Rules
//!
//! - Usernames are 3 to 32 characters of lowercase ASCII letters, digits,
//!   dots, or underscores, and start with a letter
//! - Emails have the shape `local@domain.tld` with no whitespace

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Validates a generated username.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_username;
///
/// assert!(is_valid_username("ada.lovelace"));
/// assert!(is_valid_username("grace_h2"));
/// assert!(!is_valid_username("ab"));           // Too short
/// assert!(!is_valid_username("O'Brien"));      // Invalid characters
/// assert!(!is_valid_username("9lives"));       // Must start with a letter
/// ```
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    let length = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
        return false;
    }
    if !username.starts_with(|c: char| c.is_ascii_lowercase()) {
        return false;
    }
    username.chars().all(is_valid_username_char)
}

/// Checks that `email` looks like `local@domain.tld`.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_email;
///
/// assert!(is_valid_email("ada@example.org"));
/// assert!(!is_valid_email("ada@example"));
/// assert!(!is_valid_email("ada lovelace@example.org"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

const fn is_valid_username_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_'
}

/// Reduces a name fragment to characters allowed in a username.
#[must_use]
pub(crate) fn slugify(fragment: &str) -> String {
    fragment
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    //! Covers username and email validation plus slugging.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ada", true)]
    #[case("ada.lovelace", true)]
    #[case("user_123", true)]
    #[case("ab", false)] // Too short
    #[case("", false)] // Empty
    #[case("Ada", false)] // Uppercase
    #[case("o'brien", false)] // Apostrophe
    #[case("_ada", false)] // Leading underscore
    #[case("ada lovelace", false)] // Space
    fn validates_usernames(#[case] username: &str, #[case] expected: bool) {
        assert_eq!(is_valid_username(username), expected);
    }

    #[test]
    fn rejects_usernames_exceeding_max_length() {
        assert!(!is_valid_username(&"a".repeat(USERNAME_MAX + 1)));
        assert!(is_valid_username(&"a".repeat(USERNAME_MAX)));
    }

    #[rstest]
    #[case("ada@example.org", true)]
    #[case("a.b+c@mail.example.co.uk", true)]
    #[case("ada@example", false)]
    #[case("@example.org", false)]
    #[case("ada@.org", false)]
    #[case("ada@example.", false)]
    #[case("ada@@example.org", false)]
    #[case("ada @example.org", false)]
    fn validates_emails(#[case] email: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(email), expected);
    }

    #[rstest]
    #[case("O'Brien", "obrien")]
    #[case("Marie-Claire", "marieclaire")]
    #[case("Ada", "ada")]
    fn slugify_keeps_lowercase_alphanumerics(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(slugify(raw), expected);
    }
}

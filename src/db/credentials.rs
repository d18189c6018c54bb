//! Username/password store.
//!
//! Passwords are kept and compared in clear text, matching the behaviour this
//! service replaces. Salted hashing is required before any real deployment.

use crate::db::models::DbUser;
use crate::db::sqlite::SqlitePool;
use crate::error::{SentimindError, ValidationError};
use regex::Regex;
use std::sync::LazyLock;
use subtle::ConstantTimeEq;
use tracing::info;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("static username regex"));

/// Accepted special characters; a password needs at least one of them.
pub const SPECIAL_CHARS: &str = r#"!@#$%^&*(),.?":{}|<>"#;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Check signup input, reporting the first rule that fails.
pub fn validate_signup(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::Username);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password.chars().any(char::is_whitespace) {
        return Err(ValidationError::PasswordWhitespace);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(ValidationError::PasswordMissingSpecial);
    }
    Ok(())
}

#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate, then upsert. Re-registering a username silently replaces its password.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), SentimindError> {
        validate_signup(username, password)?;
        sqlx::query(
            r#"
            INSERT INTO users (username, password) VALUES (?, ?)
            ON CONFLICT(username) DO UPDATE SET password = excluded.password
            "#,
        )
        .bind(username)
        .bind(password)
        .execute(&self.pool)
        .await?;
        info!(username = %username, "account registered");
        Ok(())
    }

    /// True when a record with exactly this username and password exists.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, SentimindError> {
        let user: Option<DbUser> =
            sqlx::query_as("SELECT username, password FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user.is_some_and(|u| bool::from(u.password.as_bytes().ct_eq(password.as_bytes()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_signup() {
        assert_eq!(validate_signup("Alice1", "Secret!1"), Ok(()));
        assert_eq!(validate_signup("b", "a,b,c,"), Ok(()));
    }

    #[test]
    fn empty_fields_are_reported_first() {
        assert_eq!(validate_signup("", "Secret!1"), Err(ValidationError::MissingFields));
        assert_eq!(validate_signup("1bad", ""), Err(ValidationError::MissingFields));
    }

    #[test]
    fn usernames_must_start_with_a_letter_and_stay_alphanumeric() {
        for bad in ["1alice", "al ice", "alice_", "élise", " alice"] {
            assert_eq!(
                validate_signup(bad, "Secret!1"),
                Err(ValidationError::Username),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn password_rules_are_checked_in_order() {
        assert_eq!(validate_signup("alice", "a!b"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_signup("alice", "Sec ret!1"),
            Err(ValidationError::PasswordWhitespace)
        );
        assert_eq!(
            validate_signup("alice", "Secret11"),
            Err(ValidationError::PasswordMissingSpecial)
        );
        assert_eq!(
            validate_signup("alice", "Secret_-1"),
            Err(ValidationError::PasswordMissingSpecial)
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(validate_signup("alice", "éé!éé"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_signup("alice", "ééé!éé"), Ok(()));
    }
}

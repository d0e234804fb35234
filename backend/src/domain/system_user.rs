//! System users: the people who sign in and act on service orders.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::access_policy::AccessLevel;
use super::order::non_blank;
use super::password::{PasswordDigest, PasswordDigestError};
use super::Error;

/// Validation errors for user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("userName must not be empty")]
    EmptyUserName,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("password must not be empty")]
    MissingPassword,
}

impl UserValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyUserName => "userName",
            Self::InvalidEmail => "email",
            Self::MissingPassword => "password",
        }
    }
}

impl From<UserValidationError> for Error {
    fn from(error: UserValidationError) -> Self {
        Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
    }
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct SystemUserId(Uuid);

impl SystemUserId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SystemUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SystemUserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login identity of a user.
///
/// Stored trimmed and lower-cased so lookups ignore the case the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ana@example.com")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an address.
    ///
    /// # Examples
    /// ```
    /// use ordens::domain::Email;
    ///
    /// let email = Email::new("  Ana@Example.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ana@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if email_regex().is_match(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(UserValidationError::InvalidEmail)
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Validated user input for create and edit.
///
/// A blank password means "keep the current one" on edit and is rejected on
/// create by the user service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub user_name: String,
    pub email: Email,
    pub password: Option<Zeroizing<String>>,
    pub access_level: AccessLevel,
    pub is_active: bool,
    pub phone_number: Option<String>,
}

impl UserDraft {
    /// Validate the required fields; the rest take their defaults.
    pub fn try_new(
        user_name: &str,
        email: &str,
        password: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        Ok(Self {
            user_name: user_name.to_owned(),
            email: Email::new(email)?,
            password: password
                .filter(|value| !value.is_empty())
                .map(|value| Zeroizing::new(value.to_owned())),
            access_level: AccessLevel::default(),
            is_active: true,
            phone_number: None,
        })
    }

    #[must_use]
    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = access_level;
        self
    }

    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    #[must_use]
    pub fn with_phone_number(mut self, phone_number: Option<String>) -> Self {
        self.phone_number = non_blank(phone_number);
        self
    }
}

/// A user as held by the record store.
///
/// Not `Serialize`: the credential digest stays in the backend. Adapters
/// project the public fields into their own DTOs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemUser {
    pub id: SystemUserId,
    pub user_name: String,
    pub email: Email,
    pub password_hash: PasswordDigest,
    pub access_level: AccessLevel,
    pub is_active: bool,
    pub phone_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SystemUser {
    /// Build a new, not yet stored user.
    #[must_use]
    pub fn new(id: SystemUserId, draft: UserDraft, password_hash: PasswordDigest) -> Self {
        Self {
            id,
            user_name: draft.user_name,
            email: draft.email,
            password_hash,
            access_level: draft.access_level,
            is_active: draft.is_active,
            phone_number: draft.phone_number,
            created_at: None,
            updated_at: None,
        }
    }

    /// Copy of this user with `draft` applied.
    ///
    /// The digest is replaced only when `draft` carries a password.
    pub fn with_draft(&self, draft: UserDraft) -> Result<Self, PasswordDigestError> {
        let password_hash = match draft.password.as_deref() {
            Some(password) => PasswordDigest::hash(password)?,
            None => self.password_hash.clone(),
        };
        Ok(Self {
            id: self.id,
            user_name: draft.user_name,
            email: draft.email,
            password_hash,
            access_level: draft.access_level,
            is_active: draft.is_active,
            phone_number: draft.phone_number,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "a@b.co", UserValidationError::EmptyUserName)]
    #[case("  ", "a@b.co", UserValidationError::EmptyUserName)]
    #[case("Ana", "", UserValidationError::InvalidEmail)]
    #[case("Ana", "ana@", UserValidationError::InvalidEmail)]
    #[case("Ana", "ana silva@example.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_drafts(
        #[case] name: &str,
        #[case] email: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = UserDraft::try_new(name, email, Some("pw")).expect_err("invalid draft");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn drafts_default_to_active_user() {
        let draft = UserDraft::try_new(" Ana ", "ANA@example.com", Some("")).expect("valid draft");
        assert_eq!(draft.user_name, "Ana");
        assert_eq!(draft.email.as_ref(), "ana@example.com");
        assert_eq!(draft.access_level, AccessLevel::User);
        assert!(draft.is_active);
        assert!(draft.password.is_none(), "blank password is absent");
    }

    #[rstest]
    fn with_draft_keeps_digest_without_new_password() {
        let draft = UserDraft::try_new("Ana", "ana@example.com", Some("first")).expect("draft");
        let user = SystemUser::new(
            SystemUserId::random(),
            draft,
            PasswordDigest::hash("first").expect("digest"),
        );

        let rename = UserDraft::try_new("Ana Paula", "ana@example.com", None).expect("draft");
        let renamed = user.with_draft(rename).expect("renamed");
        assert_eq!(renamed.user_name, "Ana Paula");
        assert!(renamed.password_hash.verify("first"));

        let rotate = UserDraft::try_new("Ana", "ana@example.com", Some("second")).expect("draft");
        let rotated = user.with_draft(rotate).expect("rotated");
        assert!(rotated.password_hash.verify("second"));
        assert!(!rotated.password_hash.verify("first"));
    }

    #[rstest]
    fn phone_number_is_trimmed() {
        let draft = UserDraft::try_new("Ana", "ana@example.com", None)
            .expect("draft")
            .with_phone_number(Some("  ".into()));
        assert_eq!(draft.phone_number, None);
    }
}

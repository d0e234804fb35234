//! Authentication primitives: login credentials and credential checks.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use tracing::trace;
use zeroize::Zeroizing;

use super::password::PasswordDigest;
use super::system_user::SystemUser;
use super::Error;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and must not be empty.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use ordens::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Gestor@Example.com ", "senha").unwrap();
/// assert_eq!(creds.email(), "gestor@example.com");
/// assert_eq!(creds.password(), "senha");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Why a login attempt was refused.
///
/// The variants exist for logging only; callers see one uniform message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationFailure {
    #[error("no user with that email")]
    UnknownEmail,
    #[error("password does not match")]
    PasswordMismatch,
    #[error("account is inactive")]
    InactiveAccount,
}

impl From<AuthenticationFailure> for Error {
    fn from(_: AuthenticationFailure) -> Self {
        Error::unauthorized("invalid credentials")
    }
}

/// Find the user matching `credentials` among `users`.
///
/// The password is checked before the active flag so an inactive account
/// is only reported to someone who knows its password. An unknown email
/// still pays for one digest check against [`PasswordDigest::decoy`].
pub fn verify_login<'a>(
    users: &'a [SystemUser],
    credentials: &LoginCredentials,
) -> Result<&'a SystemUser, AuthenticationFailure> {
    check_credentials(users, credentials, PasswordDigest::decoy())
}

fn check_credentials<'a>(
    users: &'a [SystemUser],
    credentials: &LoginCredentials,
    decoy: Option<&PasswordDigest>,
) -> Result<&'a SystemUser, AuthenticationFailure> {
    let Some(user) = users
        .iter()
        .find(|user| user.email.as_ref() == credentials.email())
    else {
        // Unknown emails still pay for one digest check.
        let matched_decoy = decoy.is_some_and(|decoy| decoy.verify(credentials.password()));
        trace!(matched_decoy, "login names no known account");
        return Err(AuthenticationFailure::UnknownEmail);
    };
    if !user.password_hash.verify(credentials.password()) {
        return Err(AuthenticationFailure::PasswordMismatch);
    }
    if !user.is_active {
        return Err(AuthenticationFailure::InactiveAccount);
    }
    Ok(user)
}

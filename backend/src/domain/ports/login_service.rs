//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! record store. Handler tests substitute the generated mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SessionPrincipal};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the principal to store in the session.
    ///
    /// Every refusal surfaces as [`crate::domain::ErrorCode::Unauthorized`]
    /// with the same message.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<SessionPrincipal, Error>;
}

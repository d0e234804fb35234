//! Credential login over the system user collection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::auth::verify_login;
use crate::domain::ports::{LoginService, SystemUserRepository};
use crate::domain::{Error, LoginCredentials, SessionPrincipal};

/// `LoginService` checking email, password digest and the active flag.
#[derive(Clone)]
pub struct CredentialLoginService<R> {
    users: Arc<R>,
}

impl<R> CredentialLoginService<R> {
    /// Create a new service over the given user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> LoginService for CredentialLoginService<R>
where
    R: SystemUserRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionPrincipal, Error> {
        let users = self.users.list().await?;
        match verify_login(&users, credentials) {
            Ok(user) => {
                info!(user_id = %user.id, "login succeeded");
                Ok(SessionPrincipal::from_user(user))
            }
            Err(failure) => {
                warn!(reason = %failure, "login refused");
                Err(failure.into())
            }
        }
    }
}

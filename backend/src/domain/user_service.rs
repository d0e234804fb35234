//! System user domain service.
//!
//! Reading users is open to any signed-in principal; creating, editing and
//! removing them requires the manage-users capability. Only a MANAGER may
//! create a MANAGER, promote someone to MANAGER or edit a MANAGER account.
//! Emails are unique across the collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::access_policy::{Action, require_grant};
use crate::domain::ports::{SystemUserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    AccessLevel, Email, Error, PasswordDigest, SessionPrincipal, SystemUser, SystemUserId,
    UserDraft, UserFilter, UserValidationError,
};

/// User service implementing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct SystemUserService<R> {
    users: Arc<R>,
}

impl<R> SystemUserService<R> {
    /// Create a new service over the given user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn email_taken(email: &Email) -> Error {
    Error::conflict(format!("email {email} is already in use")).with_details(json!({
        "field": "email",
        "code": "email_taken",
    }))
}

impl<R> SystemUserService<R>
where
    R: SystemUserRepository,
{
    async fn load(&self, id: &SystemUserId) -> Result<SystemUser, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Reject `email` when another user already owns it.
    async fn ensure_email_free(
        &self,
        email: &Email,
        owner: Option<&SystemUserId>,
    ) -> Result<(), Error> {
        let clash = self
            .users
            .list()
            .await?
            .into_iter()
            .any(|user| &user.email == email && Some(&user.id) != owner);
        if clash {
            return Err(email_taken(email));
        }
        Ok(())
    }
}

fn manage(principal: &SessionPrincipal) -> Result<(), Error> {
    principal.require(Action::ManageUsers).map_err(|denied| {
        debug!(user_id = %principal.id, "user management denied");
        Error::from(denied)
    })
}

fn grant(principal: &SessionPrincipal, target: AccessLevel) -> Result<(), Error> {
    require_grant(principal.access_level, target).map_err(|denied| {
        debug!(user_id = %principal.id, %target, "manager access change denied");
        Error::from(denied)
    })
}

#[async_trait]
impl<R> UsersQuery for SystemUserService<R>
where
    R: SystemUserRepository,
{
    async fn resolve_principal(
        &self,
        id: &SystemUserId,
    ) -> Result<Option<SessionPrincipal>, Error> {
        let user = self.users.find_by_id(id).await?;
        Ok(user
            .filter(|user| user.is_active)
            .map(|user| SessionPrincipal::from_user(&user)))
    }

    async fn list_users(
        &self,
        _principal: &SessionPrincipal,
        filter: &UserFilter,
    ) -> Result<Vec<SystemUser>, Error> {
        let users = self.users.list().await?;
        Ok(filter.apply(users))
    }

    async fn get_user(
        &self,
        _principal: &SessionPrincipal,
        id: &SystemUserId,
    ) -> Result<SystemUser, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<R> UsersCommand for SystemUserService<R>
where
    R: SystemUserRepository,
{
    async fn create_user(
        &self,
        principal: &SessionPrincipal,
        draft: UserDraft,
    ) -> Result<SystemUser, Error> {
        manage(principal)?;
        grant(principal, draft.access_level)?;
        let Some(password) = draft.password.as_deref() else {
            return Err(UserValidationError::MissingPassword.into());
        };
        self.ensure_email_free(&draft.email, None).await?;
        let digest = PasswordDigest::hash(password)?;

        let created = self
            .users
            .create(SystemUser::new(SystemUserId::random(), draft, digest))
            .await?;
        info!(
            user_id = %created.id,
            access_level = %created.access_level,
            actor = %principal.id,
            "system user created"
        );
        Ok(created)
    }

    async fn update_user(
        &self,
        principal: &SessionPrincipal,
        id: &SystemUserId,
        draft: UserDraft,
    ) -> Result<SystemUser, Error> {
        manage(principal)?;
        grant(principal, draft.access_level)?;
        let current = self.load(id).await?;
        grant(principal, current.access_level)?;
        if draft.email != current.email {
            self.ensure_email_free(&draft.email, Some(id)).await?;
        }

        let updated = self.users.update(current.with_draft(draft)?).await?;
        info!(user_id = %id, actor = %principal.id, "system user updated");
        Ok(updated)
    }

    async fn delete_user(
        &self,
        principal: &SessionPrincipal,
        id: &SystemUserId,
    ) -> Result<(), Error> {
        manage(principal)?;
        self.users.delete(id).await?;
        info!(user_id = %id, actor = %principal.id, "system user deleted");
        Ok(())
    }
}

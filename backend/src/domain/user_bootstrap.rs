//! First-run seeding of an administrator account.
//!
//! A fresh record store has no users, so nobody could sign in to create one.
//! When configured, a MANAGER account is created at startup, but only while
//! the user collection is still empty.

use zeroize::Zeroizing;

use crate::domain::ports::SystemUserRepository;
use crate::domain::{
    AccessLevel, Error, PasswordDigest, SystemUser, SystemUserId, UserDraft,
};

/// Credentials for the seeded account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub user_name: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

/// What [`ensure_bootstrap_admin`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The collection already had users; nothing was written.
    Skipped { existing_users: usize },
    /// The administrator was created.
    Created { id: SystemUserId },
}

/// Seed `admin` as a MANAGER when `users` is empty.
pub async fn ensure_bootstrap_admin<R>(
    users: &R,
    admin: &BootstrapAdmin,
) -> Result<BootstrapOutcome, Error>
where
    R: SystemUserRepository + ?Sized,
{
    let existing_users = users.list().await?.len();
    if existing_users > 0 {
        return Ok(BootstrapOutcome::Skipped { existing_users });
    }
    if admin.password.is_empty() {
        return Err(Error::invalid_request(
            "bootstrap administrator password must not be empty",
        ));
    }

    let draft = UserDraft::try_new(&admin.user_name, &admin.email, None)?
        .with_access_level(AccessLevel::Manager);
    let user = SystemUser::new(
        SystemUserId::random(),
        draft,
        PasswordDigest::hash(&admin.password)?,
    );
    let created = users.create(user).await?;
    Ok(BootstrapOutcome::Created { id: created.id })
}

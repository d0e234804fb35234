//! Authentication helpers used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! principal resolution here. The session only proves which user signed in;
//! whether that user may still act is decided against the user store on
//! every request.

use tracing::debug;

use crate::domain::ports::UsersQuery;
use crate::domain::{Error, SessionPrincipal};

use super::ApiResult;
use super::session::SessionContext;

/// Resolve the signed-in principal or fail with `401 Unauthorized`.
///
/// A session pointing at a deleted or deactivated user is purged so the
/// browser stops presenting it.
pub async fn require_principal(
    session: &SessionContext,
    users: &dyn UsersQuery,
) -> ApiResult<SessionPrincipal> {
    let user_id = session.require_user_id()?;
    match users.resolve_principal(&user_id).await? {
        Some(principal) => Ok(principal),
        None => {
            debug!(%user_id, "session user no longer active; purging session");
            session.purge();
            Err(Error::unauthorized("login required"))
        }
    }
}

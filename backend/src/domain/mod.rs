//! Domain primitives, policies and services.
//!
//! Purpose: define the strongly typed service order and user model, the
//! access policy and order lifecycle rules, and the services that apply them
//! before touching the record store. Types document their invariants and
//! serialisation contracts (serde) in their own Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic error payload.
//! - ServiceOrder, OrderFields, OrderStatus, Priority: order model.
//! - SystemUser, UserDraft, Email: user model.
//! - access_policy / order_lifecycle: pure decision functions.
//! - ServiceOrderService, SystemUserService, CredentialLoginService: driving
//!   port implementations.

pub mod access_policy;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod login_service;
pub mod order;
pub mod order_lifecycle;
pub mod order_service;
pub mod password;
pub mod ports;
pub mod search;
pub mod session;
pub mod system_user;
pub mod trace_id;
pub mod user_bootstrap;
pub mod user_service;

pub use self::access_policy::{
    AccessLevel, Action, Capabilities, GrantDenied, PermissionDenied,
};
pub use self::auth::{AuthenticationFailure, LoginCredentials, LoginValidationError};
pub use self::dashboard::OrderSummary;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::login_service::CredentialLoginService;
pub use self::order::{
    OrderFields, OrderId, OrderStatus, OrderValidationError, Priority, ServiceOrder,
};
pub use self::order_lifecycle::OrderLocked;
pub use self::order_service::ServiceOrderService;
pub use self::password::{HashCost, PasswordDigest, PasswordDigestError};
pub use self::search::{OrderFilter, UserFilter};
pub use self::session::SessionPrincipal;
pub use self::system_user::{Email, SystemUser, SystemUserId, UserDraft, UserValidationError};
pub use self::trace_id::TraceId;
pub use self::user_bootstrap::{BootstrapAdmin, BootstrapOutcome, ensure_bootstrap_admin};
pub use self::user_service::SystemUserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ordens::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

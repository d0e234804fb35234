//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod orders;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

//! Service order tracking backend.
//!
//! Field maintenance teams open, schedule and execute service orders; the
//! access level of the signed-in user decides which of those actions are
//! available. The crate follows a hexagonal layout: `domain` holds the model,
//! policies and services, `inbound` the HTTP adapter, `outbound` the record
//! store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

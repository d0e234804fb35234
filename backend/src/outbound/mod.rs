//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **record_store**: in-process collections backing the order and user
//!   repositories.
//!
//! Adapters are thin translators between domain types and the storage
//! representation. They contain no business logic.

pub mod record_store;

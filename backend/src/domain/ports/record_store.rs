//! Errors shared by the record store ports.
//!
//! Each collection has its own typed port; all of them fail the same way.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Failures raised by record store adapters.
    pub enum RecordStoreError {
        /// The store could not be reached.
        Connection { message: String } => "record store connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } => "record store query failed: {message}",
        /// No record exists under the identifier.
        NotFound { id: String } => "record {id} not found",
    }
}

impl From<RecordStoreError> for Error {
    fn from(error: RecordStoreError) -> Self {
        match error {
            RecordStoreError::Connection { message } => {
                Error::service_unavailable(format!("record store unavailable: {message}"))
            }
            RecordStoreError::Query { message } => {
                Error::internal(format!("record store error: {message}"))
            }
            RecordStoreError::NotFound { id } => Error::not_found(format!("record {id} not found")),
        }
    }
}

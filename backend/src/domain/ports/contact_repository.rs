//! Port for the local contact store.
//!
//! Local contacts mirror contacts already provisioned at the billing provider;
//! the provider id is stored as a foreign reference.

use async_trait::async_trait;

use crate::domain::Contact;

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact store adapters.
    pub enum ContactRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "contact store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "contact store query failed: {message}",
    }
}

/// Local contact persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a provider-linked contact.
    async fn insert(&self, contact: &Contact) -> Result<(), ContactRepositoryError>;
}

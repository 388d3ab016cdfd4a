//! Port for the local invoice store.
//!
//! The local store owns invoice identity. Adapters persist the canonical
//! [`Invoice`] record keyed by its locally generated [`InvoiceId`].

use async_trait::async_trait;

use crate::domain::{Invoice, InvoiceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by invoice store adapters.
    pub enum InvoiceRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "invoice store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "invoice store query failed: {message}",
    }
}

/// Local invoice persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert a new invoice.
    async fn insert(&self, invoice: &Invoice) -> Result<(), InvoiceRepositoryError>;

    /// Fetch an invoice by local id.
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError>;

    /// Overwrite an existing invoice.
    ///
    /// Returns `false` when no record with `invoice.id` exists.
    async fn update(&self, invoice: &Invoice) -> Result<bool, InvoiceRepositoryError>;

    /// Remove an invoice, returning the removed record.
    ///
    /// Returns `None` when nothing was deleted.
    async fn delete(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError>;

    /// Every stored invoice, oldest first.
    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError>;
}

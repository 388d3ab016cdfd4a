//! Driving port for invoice writes.
//!
//! Every write returns a [`Synced`] value so callers always see which store
//! holds the change.

use async_trait::async_trait;

use crate::domain::{BillingCredentials, Error, Invoice, InvoiceDraft, InvoiceId, Synced};

/// Invoice create, update and delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceCommand: Send + Sync {
    /// Create an invoice locally, then at the provider.
    async fn create(
        &self,
        credentials: &BillingCredentials,
        draft: InvoiceDraft,
    ) -> Result<Synced<Invoice>, Error>;

    /// Update an existing local invoice, then propagate to the provider.
    async fn update(
        &self,
        credentials: &BillingCredentials,
        id: &InvoiceId,
        draft: InvoiceDraft,
    ) -> Result<Synced<Invoice>, Error>;

    /// Delete a local invoice, then best-effort at the provider.
    async fn delete(
        &self,
        credentials: &BillingCredentials,
        id: &InvoiceId,
    ) -> Result<Synced<Invoice>, Error>;
}

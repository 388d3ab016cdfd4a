//! Driving port for invoice reads.

use async_trait::async_trait;

use super::CredentialProvider;
use crate::domain::{BillingCredentials, Error, InvoiceListing, InvoiceLookup};

/// Invoice reads with local-first fallback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceQuery: Send + Sync {
    /// Find one invoice by local id, falling back to the provider.
    ///
    /// `reference` is tried as a local id first and, failing that, as a
    /// provider id. Billing credentials are only resolved for the provider
    /// fallback, so a local hit never depends on the secret backend.
    async fn get<'a>(
        &self,
        credentials: &'a (dyn CredentialProvider + 'a),
        reference: &str,
    ) -> Result<InvoiceLookup, Error>;

    /// List both invoice collections without merging them.
    async fn list(&self, credentials: &BillingCredentials) -> Result<InvoiceListing, Error>;
}

//! Port for the remote billing provider.
//!
//! The provider is reachable only over HTTP and keys every document by its own
//! identifiers. Every call takes the [`BillingCredentials`] resolved for the
//! current request; adapters never look credentials up themselves.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    BillingCredentials, ContactDraft, Invoice, ProviderInvoiceId, RemoteContact, RemoteInvoice,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by billing provider adapters.
    pub enum BillingProviderError {
        /// Network failure or provider-side (5xx) error.
        Transport { message: String } =>
            "billing provider transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "billing provider timed out: {message}",
        /// The provider refused the request.
        Rejected { status: u16, message: String } =>
            "billing provider rejected the request ({status}): {message}",
        /// The requested document does not exist at the provider.
        NotFound { message: String } =>
            "billing provider document not found: {message}",
        /// The provider answered with a payload we could not read.
        Decode { message: String } =>
            "billing provider response could not be decoded: {message}",
    }
}

/// Remote billing service operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Provision a contact.
    async fn create_contact(
        &self,
        credentials: &BillingCredentials,
        contact: &ContactDraft,
    ) -> Result<RemoteContact, BillingProviderError>;

    /// Issue an invoice for a locally stored record.
    async fn create_invoice(
        &self,
        credentials: &BillingCredentials,
        invoice: &Invoice,
    ) -> Result<RemoteInvoice, BillingProviderError>;

    /// Replace the provider copy of an invoice.
    async fn update_invoice(
        &self,
        credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
        invoice: &Invoice,
    ) -> Result<RemoteInvoice, BillingProviderError>;

    /// Delete an invoice, returning the provider's acknowledgement payload.
    async fn delete_invoice(
        &self,
        credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
    ) -> Result<Value, BillingProviderError>;

    /// Fetch one invoice.
    async fn get_invoice(
        &self,
        credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
    ) -> Result<RemoteInvoice, BillingProviderError>;

    /// Fetch every invoice the provider reports.
    async fn list_invoices(
        &self,
        credentials: &BillingCredentials,
    ) -> Result<Vec<RemoteInvoice>, BillingProviderError>;
}

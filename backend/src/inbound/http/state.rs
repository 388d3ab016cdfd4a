//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CredentialProvider, InvoiceCommand, InvoiceQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Secret backend consulted once per request for provider credentials.
    pub credentials: Arc<dyn CredentialProvider>,
    pub invoices: Arc<dyn InvoiceCommand>,
    pub invoices_query: Arc<dyn InvoiceQuery>,
}

impl HttpState {
    /// Bundle the ports used by the invoice handlers.
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        invoices: Arc<dyn InvoiceCommand>,
        invoices_query: Arc<dyn InvoiceQuery>,
    ) -> Self {
        Self {
            credentials,
            invoices,
            invoices_query,
        }
    }
}

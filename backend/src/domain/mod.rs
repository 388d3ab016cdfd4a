//! Domain entities, ports, and the invoice coordination services.
//!
//! Purpose: keep the cross-store coordination rules free of transport and
//! storage detail. Adapters under `outbound` implement the driven ports;
//! `inbound::http` drives [`InvoiceSyncService`] through the driving ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`Invoice`], [`InvoiceDraft`], [`Contact`], [`ContactDraft`]: the data model.
//! - [`SyncOutcome`] / [`Synced`]: joint outcome of every coordinated write.
//! - [`InvoiceSyncService`] / [`ContactSyncService`]: the coordinators.

pub mod contact;
pub mod contact_sync;
pub mod credentials;
pub mod error;
pub mod invoice;
pub mod invoice_sync;
pub mod ports;
pub mod provider_id;
pub mod sync_outcome;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::contact::{
    Contact, ContactDraft, ContactId, Identification, PersonKind, RemoteContact,
};
pub use self::contact_sync::ContactSyncService;
pub use self::credentials::{
    BillingCredentials, CredentialResource, SecretBag, StoreCredentials, map_credential_error,
    resolve_billing_credentials,
};
pub use self::error::{Error, ErrorCode, FieldViolation, TRACE_ID_HEADER};
pub use self::invoice::{
    ClientReference, Invoice, InvoiceDraft, InvoiceId, InvoiceItem, InvoiceListing,
    InvoiceLookup, InvoiceTerms, Payment, PaymentMethod, RemoteInvoice, UnknownPaymentMethod,
};
pub use self::invoice_sync::InvoiceSyncService;
pub use self::provider_id::{ProviderContactId, ProviderIdError, ProviderInvoiceId};
pub use self::sync_outcome::{SyncOutcome, Synced};
pub use self::trace_id::TraceId;

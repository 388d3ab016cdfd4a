//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`InvoiceRepository`, `ContactRepository`, `BillingProvider`,
//! `CredentialProvider`) are implemented by outbound adapters. Driving ports
//! (`InvoiceCommand`, `InvoiceQuery`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod billing_provider;
mod contact_repository;
mod credential_provider;
mod invoice_command;
mod invoice_query;
mod invoice_repository;

#[cfg(test)]
pub use billing_provider::MockBillingProvider;
pub use billing_provider::{BillingProvider, BillingProviderError};
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{ContactRepository, ContactRepositoryError};
#[cfg(test)]
pub use credential_provider::MockCredentialProvider;
pub use credential_provider::{
    CredentialProvider, CredentialProviderError, FixtureCredentialProvider,
};
pub use invoice_command::InvoiceCommand;
#[cfg(test)]
pub use invoice_command::MockInvoiceCommand;
pub use invoice_query::InvoiceQuery;
#[cfg(test)]
pub use invoice_query::MockInvoiceQuery;
#[cfg(test)]
pub use invoice_repository::MockInvoiceRepository;
pub use invoice_repository::{InvoiceRepository, InvoiceRepositoryError};

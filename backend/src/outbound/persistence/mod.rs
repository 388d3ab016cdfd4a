//! PostgreSQL persistence adapters for the local store.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselInvoiceRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/billing")).await?;
//! let invoices = DieselInvoiceRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_contact_repository;
mod diesel_invoice_repository;
mod invoice_document;
mod models;
mod pool;
mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use pool::{DbPool, PoolConfig, PoolError, store_database_url};

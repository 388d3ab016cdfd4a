//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{contacts, invoices};

/// Row struct for reading from the invoices table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub provider_invoice_id: Option<String>,
    pub provider_number: Option<String>,
    pub client_provider_id: String,
    pub document: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new invoice records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub(crate) struct NewInvoiceRow<'a> {
    pub id: Uuid,
    pub provider_invoice_id: Option<&'a str>,
    pub provider_number: Option<&'a str>,
    pub client_provider_id: &'a str,
    pub document: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for overwriting an invoice.
///
/// `None` clears provider columns rather than leaving them untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = invoices)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct InvoiceUpdate<'a> {
    pub provider_invoice_id: Option<&'a str>,
    pub provider_number: Option<&'a str>,
    pub client_provider_id: &'a str,
    pub document: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for contact records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub id: Uuid,
    pub provider_contact_id: &'a str,
    pub name: &'a str,
    pub document: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

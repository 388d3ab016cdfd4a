//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Canonical invoice records.
    ///
    /// `id` is generated by the service before any provider call. Provider
    /// columns stay NULL until the billing provider has accepted the invoice.
    invoices (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Provider invoice id; foreign, non-owning reference.
        provider_invoice_id -> Nullable<Varchar>,
        /// Provider's human-facing invoice number.
        provider_number -> Nullable<Varchar>,
        /// Provider contact id of the client.
        client_provider_id -> Varchar,
        /// Items, payments, dates and total as JSONB.
        document -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Local copies of contacts provisioned at the billing provider.
    contacts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Provider contact id; unique.
        provider_contact_id -> Varchar,
        /// Contact name, duplicated out of `document` for lookups.
        name -> Varchar,
        /// Full contact payload as JSONB.
        document -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(invoices, contacts);

//! PostgreSQL-backed `InvoiceRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InvoiceRepository, InvoiceRepositoryError};
use crate::domain::{Invoice, InvoiceId, ProviderContactId, ProviderInvoiceId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::invoice_document::{decode_terms, encode_terms};
use super::models::{InvoiceRow, InvoiceUpdate, NewInvoiceRow};
use super::pool::{DbPool, PoolError};
use super::schema::invoices;

/// Diesel-backed implementation of the invoice repository port.
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvoiceRepositoryError {
    map_basic_pool_error(error, InvoiceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> InvoiceRepositoryError {
    map_basic_diesel_error(
        error,
        InvoiceRepositoryError::query,
        InvoiceRepositoryError::connection,
    )
}

fn encode_document(invoice: &Invoice) -> Result<serde_json::Value, InvoiceRepositoryError> {
    encode_terms(&invoice.terms)
        .map_err(|err| InvoiceRepositoryError::query(format!("serialise invoice terms: {err}")))
}

/// Convert a database row into a domain invoice.
fn row_to_invoice(row: InvoiceRow) -> Result<Invoice, InvoiceRepositoryError> {
    let InvoiceRow {
        id,
        provider_invoice_id,
        provider_number,
        client_provider_id,
        document,
        created_at,
        updated_at,
    } = row;

    let terms = decode_terms(document)
        .map_err(|err| InvoiceRepositoryError::query(format!("decode invoice {id}: {err}")))?;
    let provider_id = provider_invoice_id
        .map(ProviderInvoiceId::new)
        .transpose()
        .map_err(|err| InvoiceRepositoryError::query(format!("invoice {id}: {err}")))?;
    let client = ProviderContactId::new(client_provider_id)
        .map_err(|err| InvoiceRepositoryError::query(format!("invoice {id}: {err}")))?;

    Ok(Invoice {
        id: InvoiceId::from_uuid(id),
        provider_id,
        provider_number,
        client,
        terms,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn insert(&self, invoice: &Invoice) -> Result<(), InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let document = encode_document(invoice)?;

        let row = NewInvoiceRow {
            id: *invoice.id.as_uuid(),
            provider_invoice_id: invoice.provider_id.as_ref().map(ProviderInvoiceId::as_str),
            provider_number: invoice.provider_number.as_deref(),
            client_provider_id: invoice.client.as_str(),
            document: &document,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        };

        diesel::insert_into(invoices::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = invoices::table
            .filter(invoices::id.eq(id.as_uuid()))
            .select(InvoiceRow::as_select())
            .first::<InvoiceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invoice).transpose()
    }

    async fn update(&self, invoice: &Invoice) -> Result<bool, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let document = encode_document(invoice)?;

        let changes = InvoiceUpdate {
            provider_invoice_id: invoice.provider_id.as_ref().map(ProviderInvoiceId::as_str),
            provider_number: invoice.provider_number.as_deref(),
            client_provider_id: invoice.client.as_str(),
            document: &document,
            updated_at: invoice.updated_at,
        };

        let affected = diesel::update(invoices::table.filter(invoices::id.eq(invoice.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::delete(invoices::table.filter(invoices::id.eq(id.as_uuid())))
            .returning(InvoiceRow::as_returning())
            .get_result::<InvoiceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invoice).transpose()
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<InvoiceRow> = invoices::table
            .order((invoices::created_at.asc(), invoices::id.asc()))
            .select(InvoiceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_invoice).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    fn row(document: serde_json::Value, provider_invoice_id: Option<&str>) -> InvoiceRow {
        let now = DateTime::<Utc>::from_timestamp(1_767_225_600, 0).expect("timestamp");
        InvoiceRow {
            id: Uuid::nil(),
            provider_invoice_id: provider_invoice_id.map(str::to_owned),
            provider_number: None,
            client_provider_id: "7".to_owned(),
            document,
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_document() -> serde_json::Value {
        json!({
            "items": [{ "name": "Consulting", "quantity": 2, "price": "10" }],
            "issueDate": "2026-01-15",
            "dueDate": "2026-01-15",
            "total": "20"
        })
    }

    #[rstest]
    fn row_conversion_restores_provider_link() {
        let invoice = row_to_invoice(row(valid_document(), Some("101"))).expect("valid row");
        assert_eq!(invoice.provider_id.as_ref().map(ProviderInvoiceId::as_str), Some("101"));
        assert_eq!(invoice.client.as_str(), "7");
        assert_eq!(invoice.terms.items[0].quantity, 2);
    }

    #[rstest]
    #[case(json!({ "items": "nope" }), None)]
    #[case(valid_document(), Some(""))]
    fn malformed_rows_surface_as_query_errors(
        #[case] document: serde_json::Value,
        #[case] provider_id: Option<&str>,
    ) {
        let err = row_to_invoice(row(document, provider_id)).expect_err("malformed row");
        assert!(matches!(err, InvoiceRepositoryError::Query { .. }));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let err = map_diesel_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        ));
        assert!(matches!(err, InvoiceRepositoryError::Connection { .. }));
    }
}

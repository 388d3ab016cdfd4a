//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::Contact;
use crate::domain::ports::{ContactRepository, ContactRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewContactRow;
use super::pool::DbPool;
use super::schema::contacts;

/// Diesel-backed implementation of the contact repository port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn insert(&self, contact: &Contact) -> Result<(), ContactRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ContactRepositoryError::connection))?;
        let document = serde_json::to_value(&contact.details)
            .map_err(|err| ContactRepositoryError::query(format!("serialise contact: {err}")))?;

        let row = NewContactRow {
            id: *contact.id.as_uuid(),
            provider_contact_id: contact.provider_id.as_str(),
            name: &contact.details.name,
            document: &document,
            created_at: contact.created_at,
        };

        diesel::insert_into(contacts::table)
            .values(&row)
            .on_conflict(contacts::provider_contact_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    ContactRepositoryError::query,
                    ContactRepositoryError::connection,
                )
            })
    }
}

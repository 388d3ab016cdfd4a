//! Contact provisioning ahead of invoice creation.
//!
//! An invoice may only reference a client the billing provider knows. This
//! service creates the contact remotely first and mirrors it locally once the
//! provider has issued an id, so no local contact ever exists without one.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{BillingProvider, ContactRepository};
use crate::domain::{
    BillingCredentials, Contact, ContactDraft, ContactId, Error, SyncOutcome, Synced,
};

/// Ensures a contact exists at the billing provider.
#[derive(Clone)]
pub struct ContactSyncService<C, P> {
    contacts: Arc<C>,
    provider: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> ContactSyncService<C, P> {
    /// Create a new service over the given store and provider.
    pub fn new(contacts: Arc<C>, provider: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            contacts,
            provider,
            clock,
        }
    }
}

impl<C, P> ContactSyncService<C, P>
where
    C: ContactRepository,
    P: BillingProvider,
{
    /// Create `draft` at the provider, then store it locally.
    ///
    /// A local write failure after the provider accepted the contact yields
    /// [`SyncOutcome::RemoteOnly`]; the provider id is still usable.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::FailedDependency`] carrying a
    /// [`SyncOutcome::Failed`] in its details when the provider rejects the
    /// contact. Nothing is written locally in that case.
    pub async fn ensure_remote_contact(
        &self,
        credentials: &BillingCredentials,
        draft: ContactDraft,
    ) -> Result<Synced<Contact>, Error> {
        let remote = match self.provider.create_contact(credentials, &draft).await {
            Ok(remote) => remote,
            Err(err) => {
                warn!(error = %err, contact = %draft.name, "billing provider refused contact");
                let outcome = SyncOutcome::failed(err.to_string());
                return Err(Error::failed_dependency(format!(
                    "client contact could not be created at the billing provider: {err}"
                ))
                .with_details(json!({ "field": "client", "sync": outcome })));
            }
        };

        let contact = Contact {
            id: ContactId::random(),
            provider_id: remote.provider_id,
            details: draft,
            created_at: self.clock.utc(),
        };

        match self.contacts.insert(&contact).await {
            Ok(()) => {
                info!(
                    contact_id = %contact.id,
                    provider_contact_id = %contact.provider_id,
                    "contact synced"
                );
                Ok(Synced::fully_synced(contact, remote.document))
            }
            Err(err) => {
                warn!(
                    error = %err,
                    provider_contact_id = %contact.provider_id,
                    "contact created remotely but not stored locally"
                );
                let reason = format!("contact stored only at the billing provider: {err}");
                Ok(Synced::remote_only(contact, reason, remote.document))
            }
        }
    }
}

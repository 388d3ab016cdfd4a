//! Invoice coordination across the local store and the billing provider.
//!
//! Writes are strictly ordered and never retried:
//!
//! - create: contact (if embedded) → local insert → provider create → local
//!   link update;
//! - update: local lookup → contact (if embedded) → local update → provider
//!   update;
//! - delete: local delete → provider delete.
//!
//! The local store is the source of truth for existence. Once a local write
//! has committed, provider failures are folded into the returned
//! [`SyncOutcome`] instead of failing the call. Failures before the first
//! local write abort with no side effects.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::contact_sync::ContactSyncService;
use crate::domain::ports::{
    BillingProvider, ContactRepository, CredentialProvider, InvoiceCommand, InvoiceQuery,
    InvoiceRepository, InvoiceRepositoryError,
};
use crate::domain::{
    BillingCredentials, ClientReference, Error, Invoice, InvoiceDraft, InvoiceId, InvoiceListing,
    InvoiceLookup, ProviderContactId, ProviderInvoiceId, SyncOutcome, Synced,
    resolve_billing_credentials,
};

/// Invoice service implementing the driving ports.
#[derive(Clone)]
pub struct InvoiceSyncService<I, C, P> {
    invoices: Arc<I>,
    contacts: ContactSyncService<C, P>,
    provider: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<I, C, P> InvoiceSyncService<I, C, P> {
    /// Create a new service over the given stores and provider.
    pub fn new(
        invoices: Arc<I>,
        contacts: Arc<C>,
        provider: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invoices,
            contacts: ContactSyncService::new(contacts, Arc::clone(&provider), Arc::clone(&clock)),
            provider,
            clock,
        }
    }
}

fn map_repository_error(error: InvoiceRepositoryError) -> Error {
    match error {
        InvoiceRepositoryError::Connection { message } => {
            Error::failed_dependency(format!("invoice store unavailable: {message}"))
        }
        InvoiceRepositoryError::Query { message } => {
            Error::internal(format!("invoice store error: {message}"))
        }
    }
}

fn invoice_not_found(reference: impl std::fmt::Display) -> Error {
    Error::not_found(format!("invoice {reference} not found"))
}

impl<I, C, P> InvoiceSyncService<I, C, P>
where
    I: InvoiceRepository,
    C: ContactRepository,
    P: BillingProvider,
{
    async fn resolve_client(
        &self,
        credentials: &BillingCredentials,
        client: ClientReference,
    ) -> Result<ProviderContactId, Error> {
        match client {
            ClientReference::Linked(provider_id) => Ok(provider_id),
            ClientReference::Embedded(draft) => {
                let synced = self
                    .contacts
                    .ensure_remote_contact(credentials, draft)
                    .await?;
                if let Some(reason) = synced.outcome.reason() {
                    warn!(
                        provider_contact_id = %synced.record.provider_id,
                        reason,
                        "continuing with a contact missing from the local store"
                    );
                }
                Ok(synced.record.provider_id)
            }
        }
    }

    async fn link_created(
        &self,
        invoice: Invoice,
        provider_id: ProviderInvoiceId,
        provider_number: Option<String>,
        provider_payload: serde_json::Value,
    ) -> Synced<Invoice> {
        let linked = invoice.linked_to(provider_id, provider_number, self.clock.utc());
        match self.invoices.update(&linked).await {
            Ok(true) => {
                info!(invoice_id = %linked.id, "invoice fully synced");
                Synced::fully_synced(linked, provider_payload)
            }
            Ok(false) => {
                warn!(invoice_id = %invoice.id, "local invoice vanished before provider link");
                Synced::remote_only(
                    invoice,
                    "local invoice disappeared before the provider id could be recorded",
                    provider_payload,
                )
            }
            Err(err) => {
                warn!(invoice_id = %invoice.id, error = %err, "provider link not recorded");
                Synced::remote_only(
                    invoice,
                    format!("provider invoice created but the local link failed: {err}"),
                    provider_payload,
                )
            }
        }
    }
}

#[async_trait]
impl<I, C, P> InvoiceCommand for InvoiceSyncService<I, C, P>
where
    I: InvoiceRepository,
    C: ContactRepository,
    P: BillingProvider,
{
    async fn create(
        &self,
        credentials: &BillingCredentials,
        draft: InvoiceDraft,
    ) -> Result<Synced<Invoice>, Error> {
        draft.validate().map_err(Error::validation)?;
        let InvoiceDraft { client, terms } = draft;
        let client = self.resolve_client(credentials, client).await?;

        let invoice = Invoice::create(InvoiceId::random(), client, terms, self.clock.utc());
        self.invoices
            .insert(&invoice)
            .await
            .map_err(map_repository_error)?;
        debug!(invoice_id = %invoice.id, "invoice stored locally");

        match self.provider.create_invoice(credentials, &invoice).await {
            Ok(remote) => Ok(self
                .link_created(invoice, remote.provider_id, remote.number, remote.document)
                .await),
            Err(err) => {
                warn!(invoice_id = %invoice.id, error = %err, "invoice not created at provider");
                Ok(Synced::local_only(
                    invoice,
                    format!("billing provider create failed: {err}"),
                ))
            }
        }
    }

    async fn update(
        &self,
        credentials: &BillingCredentials,
        id: &InvoiceId,
        draft: InvoiceDraft,
    ) -> Result<Synced<Invoice>, Error> {
        draft.validate().map_err(Error::validation)?;
        let existing = self
            .invoices
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| invoice_not_found(id))?;

        let InvoiceDraft { client, terms } = draft;
        let client = self.resolve_client(credentials, client).await?;
        let revised = existing.revise(client, terms, self.clock.utc());
        let matched = self
            .invoices
            .update(&revised)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(invoice_not_found(id));
        }
        debug!(invoice_id = %revised.id, "invoice updated locally");

        let Some(provider_id) = revised.provider_id.clone() else {
            info!(invoice_id = %revised.id, "invoice never synced; provider update skipped");
            return Ok(Synced::local_only(
                revised,
                "invoice has no provider id; provider update skipped",
            ));
        };

        match self
            .provider
            .update_invoice(credentials, &provider_id, &revised)
            .await
        {
            Ok(remote) => {
                info!(invoice_id = %revised.id, provider_invoice_id = %provider_id, "invoice update synced");
                Ok(Synced::fully_synced(revised, remote.document))
            }
            Err(err) => {
                warn!(invoice_id = %revised.id, error = %err, "provider update failed");
                Ok(Synced::local_only(
                    revised,
                    format!("billing provider update failed: {err}"),
                ))
            }
        }
    }

    async fn delete(
        &self,
        credentials: &BillingCredentials,
        id: &InvoiceId,
    ) -> Result<Synced<Invoice>, Error> {
        let deleted = self
            .invoices
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| invoice_not_found(id))?;
        debug!(invoice_id = %deleted.id, "invoice deleted locally");

        let Some(provider_id) = deleted.provider_id.clone() else {
            return Ok(Synced::local_only(
                deleted,
                "invoice has no provider id; provider delete skipped",
            ));
        };

        match self.provider.delete_invoice(credentials, &provider_id).await {
            Ok(payload) => {
                info!(invoice_id = %deleted.id, provider_invoice_id = %provider_id, "invoice deleted at provider");
                Ok(Synced::fully_synced(deleted, payload))
            }
            Err(err) => {
                warn!(invoice_id = %deleted.id, error = %err, "provider delete failed");
                Ok(Synced::local_only(
                    deleted,
                    format!("billing provider delete failed: {err}"),
                ))
            }
        }
    }
}

#[async_trait]
impl<I, C, P> InvoiceQuery for InvoiceSyncService<I, C, P>
where
    I: InvoiceRepository,
    C: ContactRepository,
    P: BillingProvider,
{
    async fn get<'a>(
        &self,
        credentials: &'a (dyn CredentialProvider + 'a),
        reference: &str,
    ) -> Result<InvoiceLookup, Error> {
        if let Ok(id) = reference.parse::<InvoiceId>() {
            if let Some(invoice) = self
                .invoices
                .find_by_id(&id)
                .await
                .map_err(map_repository_error)?
            {
                return Ok(InvoiceLookup::Local(invoice));
            }
        }

        let provider_id =
            ProviderInvoiceId::new(reference).map_err(|_| invoice_not_found(reference))?;
        let credentials = resolve_billing_credentials(credentials).await?;
        match self.provider.get_invoice(&credentials, &provider_id).await {
            Ok(remote) => Ok(InvoiceLookup::Remote(remote)),
            Err(err) => {
                warn!(reference, error = %err, "invoice missing locally and at provider");
                Err(invoice_not_found(reference))
            }
        }
    }

    async fn list(&self, credentials: &BillingCredentials) -> Result<InvoiceListing, Error> {
        let local = self.invoices.list().await.map_err(map_repository_error)?;
        match self.provider.list_invoices(credentials).await {
            Ok(remote) => Ok(InvoiceListing {
                local,
                remote,
                outcome: SyncOutcome::FullySynced,
            }),
            Err(err) => {
                warn!(error = %err, "provider listing failed");
                Ok(InvoiceListing {
                    local,
                    remote: Vec::new(),
                    outcome: SyncOutcome::local_only(format!(
                        "billing provider listing failed: {err}"
                    )),
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "invoice_sync_tests.rs"]
mod tests;

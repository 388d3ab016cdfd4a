//! In-memory driven ports for exercising the real invoice service.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use backend::domain::ports::{
    BillingProvider, BillingProviderError, ContactRepository, ContactRepositoryError,
    InvoiceRepository, InvoiceRepositoryError,
};
use backend::domain::{
    BillingCredentials, Contact, ContactDraft, Invoice, InvoiceId, ProviderContactId,
    ProviderInvoiceId, RemoteContact, RemoteInvoice,
};
use serde_json::{Value, json};

/// Invoice store kept in insertion order.
#[derive(Default)]
pub struct InMemoryInvoices {
    rows: Mutex<Vec<Invoice>>,
}

impl InMemoryInvoices {
    pub fn snapshot(&self) -> Vec<Invoice> {
        self.rows.lock().expect("invoice rows lock").clone()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn insert(&self, invoice: &Invoice) -> Result<(), InvoiceRepositoryError> {
        self.rows
            .lock()
            .expect("invoice rows lock")
            .push(invoice.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("invoice rows lock")
            .iter()
            .find(|row| &row.id == id)
            .cloned())
    }

    async fn update(&self, invoice: &Invoice) -> Result<bool, InvoiceRepositoryError> {
        let mut rows = self.rows.lock().expect("invoice rows lock");
        match rows.iter_mut().find(|row| row.id == invoice.id) {
            Some(row) => {
                *row = invoice.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError> {
        let mut rows = self.rows.lock().expect("invoice rows lock");
        let position = rows.iter().position(|row| &row.id == id);
        Ok(position.map(|index| rows.remove(index)))
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepositoryError> {
        Ok(self.snapshot())
    }
}

#[derive(Default)]
pub struct InMemoryContacts {
    rows: Mutex<Vec<Contact>>,
}

impl InMemoryContacts {
    pub fn snapshot(&self) -> Vec<Contact> {
        self.rows.lock().expect("contact rows lock").clone()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContacts {
    async fn insert(&self, contact: &Contact) -> Result<(), ContactRepositoryError> {
        self.rows
            .lock()
            .expect("contact rows lock")
            .push(contact.clone());
        Ok(())
    }
}

/// Provider calls observed by [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    CreateContact(String),
    CreateInvoice,
    UpdateInvoice(String),
    DeleteInvoice(String),
    GetInvoice(String),
    ListInvoices,
}

/// Billing provider that keeps documents in memory, or fails every call
/// while `failing` is set.
#[derive(Default)]
pub struct ScriptedProvider {
    failing: Mutex<bool>,
    next_id: Mutex<u32>,
    documents: Mutex<BTreeMap<String, Value>>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl ScriptedProvider {
    pub fn failing() -> Self {
        let provider = Self::default();
        provider.set_failing(true);
        provider
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().expect("failing lock") = failing;
    }

    /// Store a document as if another client had created it.
    pub fn seed(&self, id: &str, document: Value) {
        self.documents
            .lock()
            .expect("documents lock")
            .insert(id.to_owned(), document);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.documents
            .lock()
            .expect("documents lock")
            .get(id)
            .cloned()
    }

    fn record(&self, call: ProviderCall) -> Result<(), BillingProviderError> {
        self.calls.lock().expect("calls lock").push(call);
        if *self.failing.lock().expect("failing lock") {
            return Err(BillingProviderError::rejected(
                500_u16,
                "provider unavailable",
            ));
        }
        Ok(())
    }

    fn issue_id(&self) -> String {
        let mut next = self.next_id.lock().expect("next id lock");
        *next += 1;
        (100 + *next).to_string()
    }

    fn invoice_document(id: &str, invoice: &Invoice) -> Value {
        json!({
            "id": id,
            "numberTemplate": { "fullNumber": format!("FE-{id}") },
            "client": { "id": invoice.client.as_str() },
            "total": invoice.terms.total.to_string(),
        })
    }

    fn remote(id: &str, document: Value) -> Result<RemoteInvoice, BillingProviderError> {
        let provider_id = ProviderInvoiceId::new(id)
            .map_err(|err| BillingProviderError::decode(err.to_string()))?;
        let number = document["numberTemplate"]["fullNumber"]
            .as_str()
            .map(str::to_owned);
        Ok(RemoteInvoice {
            provider_id,
            number,
            document,
        })
    }
}

#[async_trait]
impl BillingProvider for ScriptedProvider {
    async fn create_contact(
        &self,
        _credentials: &BillingCredentials,
        contact: &ContactDraft,
    ) -> Result<RemoteContact, BillingProviderError> {
        self.record(ProviderCall::CreateContact(contact.name.clone()))?;
        let id = format!("C-{}", self.issue_id());
        let provider_id = ProviderContactId::new(id.as_str())
            .map_err(|err| BillingProviderError::decode(err.to_string()))?;
        Ok(RemoteContact {
            provider_id,
            document: json!({ "id": id, "name": contact.name }),
        })
    }

    async fn create_invoice(
        &self,
        _credentials: &BillingCredentials,
        invoice: &Invoice,
    ) -> Result<RemoteInvoice, BillingProviderError> {
        self.record(ProviderCall::CreateInvoice)?;
        let id = self.issue_id();
        let document = Self::invoice_document(&id, invoice);
        self.seed(&id, document.clone());
        Self::remote(&id, document)
    }

    async fn update_invoice(
        &self,
        _credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
        invoice: &Invoice,
    ) -> Result<RemoteInvoice, BillingProviderError> {
        let id = provider_id.as_str();
        self.record(ProviderCall::UpdateInvoice(id.to_owned()))?;
        if self.document(id).is_none() {
            return Err(BillingProviderError::not_found(format!("invoice {id}")));
        }
        let document = Self::invoice_document(id, invoice);
        self.seed(id, document.clone());
        Self::remote(id, document)
    }

    async fn delete_invoice(
        &self,
        _credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
    ) -> Result<Value, BillingProviderError> {
        let id = provider_id.as_str();
        self.record(ProviderCall::DeleteInvoice(id.to_owned()))?;
        self.documents
            .lock()
            .expect("documents lock")
            .remove(id)
            .map(|_| json!({ "code": 200, "message": "deleted" }))
            .ok_or_else(|| BillingProviderError::not_found(format!("invoice {id}")))
    }

    async fn get_invoice(
        &self,
        _credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
    ) -> Result<RemoteInvoice, BillingProviderError> {
        let id = provider_id.as_str();
        self.record(ProviderCall::GetInvoice(id.to_owned()))?;
        let document = self
            .document(id)
            .ok_or_else(|| BillingProviderError::not_found(format!("invoice {id}")))?;
        Self::remote(id, document)
    }

    async fn list_invoices(
        &self,
        _credentials: &BillingCredentials,
    ) -> Result<Vec<RemoteInvoice>, BillingProviderError> {
        self.record(ProviderCall::ListInvoices)?;
        let documents = self.documents.lock().expect("documents lock").clone();
        documents
            .into_iter()
            .map(|(id, document)| Self::remote(&id, document))
            .collect()
    }
}

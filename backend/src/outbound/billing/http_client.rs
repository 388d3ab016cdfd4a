//! Reqwest-backed billing provider adapter.
//!
//! This adapter owns transport details only: endpoint construction, basic
//! authentication, timeout and HTTP error mapping, and JSON decoding into the
//! remote document types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::dto::{
    ContactRequestDto, InvoiceRequestDto, into_remote_contact, into_remote_invoice,
    into_remote_invoices,
};
use crate::domain::ports::{BillingProvider, BillingProviderError};
use crate::domain::{
    BillingCredentials, ContactDraft, Invoice, ProviderInvoiceId, RemoteContact, RemoteInvoice,
};

/// Production API root of the billing provider.
pub const DEFAULT_BILLING_BASE_URL: &str = "https://api.alegra.com/api/v1/";

/// Default request timeout.
pub const DEFAULT_BILLING_TIMEOUT: Duration = Duration::from_secs(10);

const CONTACTS: &str = "contacts";
const INVOICES: &str = "invoices";

/// Billing provider adapter performing JSON requests against one API root.
#[derive(Debug, Clone)]
pub struct HttpBillingProvider {
    client: Client,
    base_url: Url,
}

impl HttpBillingProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let provider = HttpBillingProvider::new(base_url, DEFAULT_BILLING_TIMEOUT)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BillingProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BillingProviderError::transport(format!(
                    "base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        credentials: &BillingCredentials,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(credentials.email(), Some(credentials.token()))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, BillingProviderError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_document(body.as_ref())
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        credentials: &BillingCredentials,
        body: &B,
    ) -> Result<Value, BillingProviderError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "billing provider request");
        self.send(self.request(method, url, credentials).json(body))
            .await
    }

    async fn send_empty(
        &self,
        method: Method,
        segments: &[&str],
        credentials: &BillingCredentials,
    ) -> Result<Value, BillingProviderError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "billing provider request");
        self.send(self.request(method, url, credentials)).await
    }
}

#[async_trait]
impl BillingProvider for HttpBillingProvider {
    async fn create_contact(
        &self,
        credentials: &BillingCredentials,
        contact: &ContactDraft,
    ) -> Result<RemoteContact, BillingProviderError> {
        let document = self
            .send_json(
                Method::POST,
                &[CONTACTS],
                credentials,
                &ContactRequestDto::from(contact),
            )
            .await?;
        into_remote_contact(document).map_err(BillingProviderError::decode)
    }

    async fn create_invoice(
        &self,
        credentials: &BillingCredentials,
        invoice: &Invoice,
    ) -> Result<RemoteInvoice, BillingProviderError> {
        let document = self
            .send_json(
                Method::POST,
                &[INVOICES],
                credentials,
                &InvoiceRequestDto::from(invoice),
            )
            .await?;
        into_remote_invoice(document).map_err(BillingProviderError::decode)
    }

    async fn update_invoice(
        &self,
        credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
        invoice: &Invoice,
    ) -> Result<RemoteInvoice, BillingProviderError> {
        let document = self
            .send_json(
                Method::PUT,
                &[INVOICES, provider_id.as_str()],
                credentials,
                &InvoiceRequestDto::from(invoice),
            )
            .await?;
        into_remote_invoice(document).map_err(BillingProviderError::decode)
    }

    async fn delete_invoice(
        &self,
        credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
    ) -> Result<Value, BillingProviderError> {
        self.send_empty(
            Method::DELETE,
            &[INVOICES, provider_id.as_str()],
            credentials,
        )
        .await
    }

    async fn get_invoice(
        &self,
        credentials: &BillingCredentials,
        provider_id: &ProviderInvoiceId,
    ) -> Result<RemoteInvoice, BillingProviderError> {
        let document = self
            .send_empty(Method::GET, &[INVOICES, provider_id.as_str()], credentials)
            .await?;
        into_remote_invoice(document).map_err(BillingProviderError::decode)
    }

    async fn list_invoices(
        &self,
        credentials: &BillingCredentials,
    ) -> Result<Vec<RemoteInvoice>, BillingProviderError> {
        let document = self
            .send_empty(Method::GET, &[INVOICES], credentials)
            .await?;
        into_remote_invoices(document).map_err(BillingProviderError::decode)
    }
}

fn parse_document(body: &[u8]) -> Result<Value, BillingProviderError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|error| {
        BillingProviderError::decode(format!(
            "invalid JSON payload ({error}): {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> BillingProviderError {
    if error.is_timeout() {
        BillingProviderError::timeout(error.to_string())
    } else {
        BillingProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BillingProviderError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => BillingProviderError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BillingProviderError::timeout(message)
        }
        _ if status.is_client_error() => BillingProviderError::rejected(status.as_u16(), message),
        _ => BillingProviderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

//! Turns coordinator results into HTTP responses.
//!
//! Every body carries a human-readable `message` and the joint `outcome`.
//! Provider payloads are nested under `provider` rather than merged into the
//! top level so they can never shadow local fields.

use actix_web::{HttpResponse, http::StatusCode, http::header};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Invoice, InvoiceListing, InvoiceLookup, SyncOutcome, Synced};
use crate::inbound::http::invoices_dto::InvoiceBody;

pub(crate) const INVOICE_CREATED: &str = "Invoice created successfully";
pub(crate) const INVOICE_UPDATED: &str = "Invoice updated successfully";
pub(crate) const INVOICE_DELETED: &str = "Invoice deleted successfully";
pub(crate) const INVOICE_RETRIEVED: &str = "Invoice retrieved successfully";
pub(crate) const INVOICES_RETRIEVED: &str = "Invoices retrieved successfully";

/// Result of a create, update or delete.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponseBody {
    #[schema(example = "Invoice created successfully")]
    pub message: String,
    /// `FullySynced`, `LocalOnly` or `RemoteOnly`.
    #[schema(example = "FullySynced")]
    pub outcome: String,
    /// Why the write is partial; absent when fully synced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub invoice: InvoiceBody,
    /// Payload returned by the billing provider, when it answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub provider: Option<Value>,
}

/// Where a single invoice read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceSource {
    /// The local store.
    Local,
    /// The billing provider, after a local miss.
    Remote,
}

/// Result of a single invoice read.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLookupBody {
    #[schema(example = "Invoice retrieved successfully")]
    pub message: String,
    pub source: InvoiceSource,
    /// Present when served locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceBody>,
    /// Provider invoice id, present when served remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Provider document, present when served remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub provider: Option<Value>,
}

/// Both invoice collections, unmerged.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListingBody {
    #[schema(example = "Invoices retrieved successfully")]
    pub message: String,
    #[schema(example = "FullySynced")]
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub local_invoices: Vec<InvoiceBody>,
    #[schema(value_type = Vec<Object>)]
    pub remote_invoices: Vec<Value>,
}

/// Maps coordinator results to status codes and bodies.
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// 201 when both stores hold the new invoice, 200 for a partial create.
    pub fn created(synced: Synced<Invoice>) -> HttpResponse {
        let status = if synced.outcome.is_fully_synced() {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        Self::sync(status, INVOICE_CREATED, synced)
    }

    /// 200 for every completed update.
    pub fn updated(synced: Synced<Invoice>) -> HttpResponse {
        Self::sync(StatusCode::OK, INVOICE_UPDATED, synced)
    }

    /// 200 for every completed delete.
    pub fn deleted(synced: Synced<Invoice>) -> HttpResponse {
        Self::sync(StatusCode::OK, INVOICE_DELETED, synced)
    }

    /// 200 with the invoice labelled by where it was found.
    pub fn lookup(lookup: InvoiceLookup) -> HttpResponse {
        let body = match lookup {
            InvoiceLookup::Local(invoice) => InvoiceLookupBody {
                message: INVOICE_RETRIEVED.to_owned(),
                source: InvoiceSource::Local,
                invoice: Some(InvoiceBody::from(&invoice)),
                provider_id: None,
                provider: None,
            },
            InvoiceLookup::Remote(remote) => InvoiceLookupBody {
                message: INVOICE_RETRIEVED.to_owned(),
                source: InvoiceSource::Remote,
                invoice: None,
                provider_id: Some(remote.provider_id.to_string()),
                provider: Some(remote.document),
            },
        };
        Self::json(StatusCode::OK, &body)
    }

    /// 200 with both collections.
    pub fn listing(listing: InvoiceListing) -> HttpResponse {
        let body = InvoiceListingBody {
            message: INVOICES_RETRIEVED.to_owned(),
            outcome: listing.outcome.label().to_owned(),
            reason: listing.outcome.reason().map(str::to_owned),
            local_invoices: listing.local.iter().map(InvoiceBody::from).collect(),
            remote_invoices: listing
                .remote
                .into_iter()
                .map(|remote| remote.document)
                .collect(),
        };
        Self::json(StatusCode::OK, &body)
    }

    fn sync(status: StatusCode, message: &str, synced: Synced<Invoice>) -> HttpResponse {
        let Synced {
            record,
            outcome,
            provider_payload,
        } = synced;
        let body = SyncResponseBody {
            message: message.to_owned(),
            outcome: outcome.label().to_owned(),
            reason: reason_of(&outcome),
            invoice: InvoiceBody::from(&record),
            provider: provider_payload,
        };
        Self::json(status, &body)
    }

    fn json(status: StatusCode, body: &impl Serialize) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(body)
    }
}

fn reason_of(outcome: &SyncOutcome) -> Option<String> {
    outcome.reason().map(str::to_owned)
}

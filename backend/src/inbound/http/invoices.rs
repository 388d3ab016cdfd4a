//! Invoice HTTP handlers.
//!
//! ```text
//! POST   /api/v1/invoices
//! GET    /api/v1/invoices
//! GET    /api/v1/invoices/{id}
//! PUT    /api/v1/invoices/{id}
//! DELETE /api/v1/invoices/{id}
//! ```
//!
//! Payloads are validated before credentials are resolved, so a malformed
//! request never reaches the secret backend or either store. Single-invoice
//! reads resolve credentials only when the local store misses.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Error, InvoiceId, resolve_billing_credentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::invoices_dto::{InvoiceRequestBody, parse_invoice_draft};
use crate::inbound::http::response::{
    InvoiceListingBody, InvoiceLookupBody, ResponseBuilder, SyncResponseBody,
};
use crate::inbound::http::state::HttpState;

fn parse_invoice_id(raw: &str) -> Result<InvoiceId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("invoice {raw} not found")))
}

/// Create an invoice locally, then at the billing provider.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = InvoiceRequestBody,
    responses(
        (status = 201, description = "Invoice stored locally and at the provider", body = SyncResponseBody),
        (status = 200, description = "Invoice stored on one side only; see outcome", body = SyncResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 424, description = "Credentials, local store or client contact unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let draft = parse_invoice_draft(&payload)?;
    let credentials = resolve_billing_credentials(state.credentials.as_ref()).await?;
    let synced = state.invoices.create(&credentials, draft).await?;
    debug!(invoice_id = %synced.record.id, outcome = synced.outcome.label(), "invoice created");
    Ok(ResponseBuilder::created(synced))
}

/// List local and provider invoices side by side.
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    responses(
        (status = 200, description = "Both collections; outcome is LocalOnly when the provider failed", body = InvoiceListingBody),
        (status = 424, description = "Credentials or local store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "listInvoices"
)]
#[get("/invoices")]
pub async fn list_invoices(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let credentials = resolve_billing_credentials(state.credentials.as_ref()).await?;
    let listing = state.invoices_query.list(&credentials).await?;
    Ok(ResponseBuilder::listing(listing))
}

/// Fetch one invoice by local id, falling back to the provider.
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Local invoice UUID or provider invoice id")),
    responses(
        (status = 200, description = "Invoice found", body = InvoiceLookupBody),
        (status = 404, description = "Invoice missing locally and at the provider", body = Error),
        (status = 424, description = "Local store unavailable, or credentials unavailable for the provider fallback", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "getInvoice"
)]
#[get("/invoices/{id}")]
pub async fn get_invoice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let reference = path.into_inner();
    let lookup = state
        .invoices_query
        .get(state.credentials.as_ref(), &reference)
        .await?;
    Ok(ResponseBuilder::lookup(lookup))
}

/// Replace an invoice locally, then at the provider.
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Local invoice UUID")),
    request_body = InvoiceRequestBody,
    responses(
        (status = 200, description = "Invoice updated; see outcome for the provider side", body = SyncResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Invoice not found", body = Error),
        (status = 424, description = "Credentials, local store or client contact unavailable", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "updateInvoice"
)]
#[put("/invoices/{id}")]
pub async fn update_invoice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = parse_invoice_id(&path)?;
    let draft = parse_invoice_draft(&payload)?;
    let credentials = resolve_billing_credentials(state.credentials.as_ref()).await?;
    let synced = state.invoices.update(&credentials, &id, draft).await?;
    Ok(ResponseBuilder::updated(synced))
}

/// Delete an invoice locally, then at the provider.
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Local invoice UUID")),
    responses(
        (status = 200, description = "Invoice deleted; see outcome for the provider side", body = SyncResponseBody),
        (status = 404, description = "Invoice not found", body = Error),
        (status = 424, description = "Credentials or local store unavailable", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "deleteInvoice"
)]
#[delete("/invoices/{id}")]
pub async fn delete_invoice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_invoice_id(&path)?;
    let credentials = resolve_billing_credentials(state.credentials.as_ref()).await?;
    let synced = state.invoices.delete(&credentials, &id).await?;
    Ok(ResponseBuilder::deleted(synced))
}

/// Register every invoice route on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_invoice)
        .service(list_invoices)
        .service(get_invoice)
        .service(update_invoice)
        .service(delete_invoice);
}

#[cfg(test)]
#[path = "invoices_tests.rs"]
mod tests;

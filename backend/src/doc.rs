//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every invoice endpoint plus the health probes. The
//! generated document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump` for client generation.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, FieldViolation};
use crate::inbound::http::invoices_dto::{
    InvoiceBody, InvoiceItemBody, InvoiceRequestBody, PaymentBody,
};
use crate::inbound::http::response::{
    InvoiceListingBody, InvoiceLookupBody, InvoiceSource, SyncResponseBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Billing sync API",
        description = "Invoices stored locally and mirrored to the billing provider. \
            Every write reports a sync outcome describing which side holds the record."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::list_invoices,
        crate::inbound::http::invoices::get_invoice,
        crate::inbound::http::invoices::update_invoice,
        crate::inbound::http::invoices::delete_invoice,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        InvoiceRequestBody,
        InvoiceItemBody,
        PaymentBody,
        InvoiceBody,
        SyncResponseBody,
        InvoiceLookupBody,
        InvoiceListingBody,
        InvoiceSource,
        Error,
        ErrorCode,
        FieldViolation,
    )),
    tags(
        (name = "invoices", description = "Invoice lifecycle across both stores"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

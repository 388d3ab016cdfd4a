//! Compose the invoice service from the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use backend::domain::InvoiceSyncService;
use backend::domain::ports::{InvoiceCommand, InvoiceQuery};
use backend::inbound::http::state::HttpState;
use backend::outbound::billing::HttpBillingProvider;
use backend::outbound::persistence::{DieselContactRepository, DieselInvoiceRepository};

use super::ServerConfig;

type ProductionInvoiceService =
    InvoiceSyncService<DieselInvoiceRepository, DieselContactRepository, HttpBillingProvider>;

/// Build the shared handler state.
///
/// One [`InvoiceSyncService`] serves both the command and the query port.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service: Arc<ProductionInvoiceService> = Arc::new(InvoiceSyncService::new(
        Arc::new(DieselInvoiceRepository::new(config.db_pool.clone())),
        Arc::new(DieselContactRepository::new(config.db_pool.clone())),
        Arc::new(config.billing.clone()),
        Arc::new(DefaultClock),
    ));
    let invoices: Arc<dyn InvoiceCommand> = service.clone();
    let invoices_query: Arc<dyn InvoiceQuery> = service;
    web::Data::new(HttpState::new(
        Arc::clone(&config.credentials),
        invoices,
        invoices_query,
    ))
}

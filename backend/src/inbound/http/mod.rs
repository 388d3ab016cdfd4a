//! HTTP inbound adapter exposing REST endpoints.

pub mod cors;
pub mod error;
pub mod health;
pub mod invoices;
pub mod invoices_dto;
pub mod response;
pub mod state;
pub(crate) mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Upper bound for invoice request bodies.
pub const JSON_BODY_LIMIT: usize = 256 * 1024;

/// JSON extractor configuration answering malformed bodies with a 400.
///
/// Without it actix answers with a plain-text error that bypasses the domain
/// error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            Error::invalid_request(format!("request body is not valid JSON: {err}")).into()
        })
}

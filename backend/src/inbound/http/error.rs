//! Domain error to HTTP response mapping.
//!
//! | code                | status |
//! |---------------------|--------|
//! | `invalid_request`   | 400    |
//! | `not_found`         | 404    |
//! | `failed_dependency` | 424    |
//! | `internal_error`    | 500    |

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::FailedDependency => StatusCode::FAILED_DEPENDENCY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal errors keep their message but never expose details.
fn response_body(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => {
            error!(
                trace_id = error.trace_id().unwrap_or("-"),
                message = error.message(),
                details = ?error.details(),
                "internal error returned to client"
            );
            error.clone().without_details()
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(response_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

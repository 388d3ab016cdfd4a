//! Billing sync backend.
//!
//! Invoices are written to a local PostgreSQL store and mirrored to a remote
//! billing provider. Each write reports a
//! [`SyncOutcome`](domain::SyncOutcome) so callers know which side holds the
//! record when the two disagree.
//!
//! - [`domain`]: entities, ports and the sync coordinators.
//! - [`inbound`]: the actix-web REST adapter.
//! - [`outbound`]: Diesel persistence, the provider HTTP client and the
//!   secret backend.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

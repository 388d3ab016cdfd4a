//! HTTP server assembly.
//!
//! Route layout:
//!
//! ```text
//! /api/v1/invoices[/{id}]   invoice handlers, OPTIONS answered for CORS
//! /health/{ready,live}      probes
//! /docs                     Swagger UI (debug builds)
//! /metrics                  Prometheus (feature `metrics`)
//! ```

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::make_metrics;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use backend::Trace;
use backend::inbound::http::health::{self, HealthState};
use backend::inbound::http::{cors, invoices, json_config};

/// Routes mounted under `/api/v1`.
fn api_v1(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(invoices::configure)
            .configure(cors::configure_preflight),
    );
}

fn probes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}

#[cfg(debug_assertions)]
fn swagger(cfg: &mut web::ServiceConfig) {
    use backend::doc::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
fn swagger(_cfg: &mut web::ServiceConfig) {}

/// Bind the listener and start serving; readiness flips once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = state_builders::build_http_state(&config);
    let probe_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let metrics_layer = metrics::MetricsLayer::from_option(config.prometheus.clone());

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(probe_state.clone())
            .app_data(http_state.clone())
            .app_data(json_config())
            .wrap(cors::cors_headers())
            .wrap(Trace)
            .configure(api_v1)
            .configure(probes)
            .configure(swagger);

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

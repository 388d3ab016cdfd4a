//! Backend entry-point: loads settings, connects the adapters and serves the
//! invoice API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::ports::CredentialProvider;
use backend::domain::{CredentialResource, StoreCredentials};
use backend::inbound::http::health::HealthState;
use backend::outbound::billing::HttpBillingProvider;
use backend::outbound::credentials::{CachedCredentialProvider, DirectoryCredentialProvider};
use backend::outbound::persistence::{DbPool, PoolConfig, store_database_url};
use backend::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let credentials = build_credential_provider(&settings);
    let db_pool = connect_store(&settings, credentials.as_ref()).await?;
    let billing = HttpBillingProvider::new(
        settings.provider_base_url().map_err(io::Error::other)?,
        settings.provider_timeout(),
    )
    .map_err(|err| io::Error::other(format!("failed to build billing client: {err}")))?;

    let config = ServerConfig::new(bind_addr, db_pool, billing, credentials);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "billing backend listening");
    server.await
}

fn build_credential_provider(settings: &AppSettings) -> Arc<dyn CredentialProvider> {
    let directory = DirectoryCredentialProvider::new(settings.secrets_dir());
    match settings.credential_cache_ttl() {
        Some(ttl) => Arc::new(CachedCredentialProvider::new(
            directory,
            ttl,
            Arc::new(DefaultClock),
        )),
        None => Arc::new(directory),
    }
}

/// Open the local store pool.
///
/// Without an explicit database URL the store credentials are resolved once
/// here; a running pool keeps its connections across secret rotation.
async fn connect_store(
    settings: &AppSettings,
    credentials: &dyn CredentialProvider,
) -> io::Result<DbPool> {
    let database_url = match settings.database_url() {
        Some(url) => url.to_owned(),
        None => {
            let bag = credentials
                .resolve(CredentialResource::LocalStore)
                .await
                .map_err(io::Error::other)?;
            let store = StoreCredentials::from_bag(&bag).map_err(io::Error::other)?;
            store_database_url(settings.database_host(), settings.database_name(), &store)
                .map_err(io::Error::other)?
        }
    };

    let mut pool_config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size());
    if let Some(min_idle) = settings.pool_min_idle {
        pool_config = pool_config.with_min_idle(Some(min_idle));
    }
    DbPool::new(pool_config).await.map_err(io::Error::other)
}

//! Backend entry-point: loads settings, seeds the record store and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ordens::domain::{BootstrapOutcome, ensure_bootstrap_admin};
use ordens::inbound::http::health::HealthState;
use ordens::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use ordens::inbound::http::state::HttpState;
use ordens::outbound::record_store::{InMemoryServiceOrders, InMemorySystemUsers};
use ordens::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let bootstrap = settings.bootstrap_admin().map_err(std::io::Error::other)?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        ttl_hours = session.ttl.whole_hours(),
        "session key loaded"
    );

    let clock = Arc::new(DefaultClock);
    let users = Arc::new(InMemorySystemUsers::new(clock.clone()));
    let orders = Arc::new(InMemoryServiceOrders::new(clock));

    match bootstrap {
        Some(admin) => match ensure_bootstrap_admin(users.as_ref(), &admin).await {
            Ok(BootstrapOutcome::Created { id }) => {
                info!(%id, email = %admin.email, "bootstrap administrator created");
            }
            Ok(BootstrapOutcome::Skipped { existing_users }) => {
                info!(existing_users, "bootstrap administrator skipped");
            }
            Err(error) => return Err(std::io::Error::other(error.to_string())),
        },
        None => warn!("no bootstrap administrator configured; nobody can sign in"),
    }

    let config = ServerConfig::new(session, bind_addr);
    info!(addr = %config.bind_addr(), "starting HTTP server");

    let health_state = web::Data::new(HealthState::new());
    let http_state = HttpState::from_repositories(users, orders);
    let server = create_server(health_state.clone(), http_state, config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;

use crate::{config::AppConfig, session::Session};

mod handlers;
mod page;

/// Shared by every request. The mutex serializes rendering passes, so a pass
/// always sees one tariff snapshot.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
    currency_symbol: Arc<str>,
}

impl AppState {
    pub fn new(session: Session, currency_symbol: &str) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            currency_symbol: Arc::from(currency_symbol),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/tariff", post(handlers::update_tariff))
        .route("/bulk", post(handlers::upload_bulk))
        .route("/bulk/clear", post(handlers::clear_bulk))
        .route("/manual", post(handlers::submit_manual))
        .route("/export/:mode", get(handlers::export_report))
        .route("/session/reset", post(handlers::reset_session))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Binds `server.bind_addr` and serves the dashboard until the process exits.
pub async fn serve(cfg: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    let state = AppState::new(Session::new(cfg.tariff), &cfg.presentation.currency_symbol);
    let app = router(state, cfg.server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

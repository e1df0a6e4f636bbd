//! Session HTTP API.
//!
//! One process serves one session: a single configuration store and a
//! single submission controller, driven by a browser form over JSON.

mod routes;

pub use routes::build_router;

use crate::error::ApiError;
use crate::pricing::{PricingService, Submitter};
use crate::store::ConfigStore;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::info;

/// Session state shared across handlers.
#[derive(Clone)]
pub struct SessionState {
    store: Arc<Mutex<ConfigStore>>,
    submitter: Arc<Submitter>,
}

impl SessionState {
    /// Fresh session with a default configuration.
    pub fn new(service: Arc<dyn PricingService>) -> Self {
        Self::with_store(ConfigStore::new(), service)
    }

    pub fn with_store(store: ConfigStore, service: Arc<dyn PricingService>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            submitter: Arc::new(Submitter::new(service)),
        }
    }

    /// Lock the store. Never hold the guard across an await.
    pub(crate) fn store(&self) -> Result<MutexGuard<'_, ConfigStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::internal("session store lock poisoned"))
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }
}

/// Start the HTTP server.
///
/// Returns a oneshot sender that can be used to signal shutdown,
/// and the actual address the server is bound to.
pub async fn start_server(
    state: SessionState,
    host: &str,
    port: u16,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr)> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let bound_addr = listener.local_addr()?;

    info!("Session API listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Session API shutting down");
            })
            .await
        {
            tracing::error!("Session API error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}

//! HTTP API server for Kirti gateway

pub mod attendance;
pub mod health;
pub mod speak;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::attendance::{AttendanceLedger, Clock};
use crate::db::DbPool;
use crate::identity::{IdentityResolver, ReferenceGallery};
use crate::{Error, Result};

/// Shared state for API handlers
pub struct ApiState {
    pub db: DbPool,
    /// The attendance ledger; every record_event runs under this mutex
    pub ledger: Mutex<AttendanceLedger>,
    /// Present only when face comparison credentials are configured
    pub resolver: Option<Arc<dyn IdentityResolver>>,
    pub gallery: ReferenceGallery,
    pub clock: Arc<dyn Clock>,
    /// Latest assistant message for the kiosk UI
    pub latest_message: RwLock<String>,
    pub images_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub voice_enabled: bool,
}

/// Build the full application router
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(health::router())
        .merge(health::status_router(state.clone()))
        .merge(attendance::router(state.clone()))
        .merge(speak::router(state.clone()))
        .nest_service("/profile", ServeDir::new(&state.images_dir));

    if let Some(static_dir) = &state.static_dir {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// Serve the API until the process is stopped
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails
pub async fn serve(state: Arc<ApiState>, port: u16) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| Error::Config(format!("cannot bind port {port}: {e}")))?;

    tracing::info!(port, "API server listening");
    axum::serve(listener, app).await.map_err(Error::Io)?;

    Ok(())
}

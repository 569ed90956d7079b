use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::query::SynergyService;

pub mod routes;

/// Server state
pub struct AppState {
    pub service: SynergyService,
}

/// Assemble the API router over a service instance
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/drugs/all", get(routes::all_drugs))
        .route("/api/drugs/search", get(routes::search_drugs))
        .route("/api/drugs/partners", get(routes::drug_partners))
        .route("/api/celllines", get(routes::cell_lines))
        .route("/api/synergy", get(routes::synergy))
        .route("/api/synergy/batch", post(routes::synergy_batch))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, database_path: PathBuf) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        service: SynergyService::new(database_path),
    });

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Synergy API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

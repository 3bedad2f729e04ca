pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        // Aggregate
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/fields", get(routes::dashboard::get_fields))
        // Views
        .route("/api/gantt", get(routes::gantt::get_gantt))
        .route("/api/actions", get(routes::actions::get_actions))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the dashboard API server.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the dashboard API server on a pre-bound listener, so the caller can
/// read the actual port when binding to port 0.
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("gantt dashboard API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}

use axum::extract::State;
use axum::Json;
use gantt_core::{Dashboard, ResolvedFields};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/dashboard: the full aggregate: config, projected milestones,
/// Director View actions and the reference maps.
pub async fn get_dashboard(State(app): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(app.dashboard().await?))
}

/// GET /api/fields: the effective field map after the Config table is
/// layered over the server's base map, plus any Config warnings.
pub async fn get_fields(State(app): State<AppState>) -> Result<Json<ResolvedFields>, AppError> {
    Ok(Json(app.fields().await?))
}

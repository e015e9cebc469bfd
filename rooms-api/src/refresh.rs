use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use rooms_core::ingestion::{RefreshRequest, RefreshStatus};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/refresh_data", get(refresh_data))
}

async fn refresh_data(
    State(state): State<AppState>,
    Query(req): Query<RefreshRequest>,
) -> Result<Json<RefreshStatus>, AppError> {
    let status = state.ingestion.trigger(&req).await?;
    Ok(Json(status))
}

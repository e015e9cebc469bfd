use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Local;
use rooms_core::reservation::{Reservation, ReservationQuery};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/reservations", get(list_reservations))
}

async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let filter = query.into_filter(Local::now().date_naive());

    let reservations = state.reservations.find_reservations(&filter).await?;

    info!(
        date = %filter.date,
        category = filter.category.as_deref().unwrap_or("all"),
        count = reservations.len(),
        "Reservations listed"
    );

    Ok(Json(reservations))
}

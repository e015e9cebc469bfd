use async_trait::async_trait;

use crate::reservation::{Reservation, ReservationFilter};
use crate::CoreResult;

/// Read access to stored reservations.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Rows matching `filter`, ordered by room name then time slot.
    /// An empty result is not an error.
    async fn find_reservations(&self, filter: &ReservationFilter) -> CoreResult<Vec<Reservation>>;
}

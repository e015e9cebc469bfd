use std::path::PathBuf;
use std::sync::Arc;
use rooms_core::ingestion::IngestionTrigger;
use rooms_core::repository::ReservationRepository;

#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<dyn ReservationRepository>,
    pub ingestion: Arc<dyn IngestionTrigger>,
    /// Root of the static landing page and its assets.
    pub assets_dir: PathBuf,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::non_empty;

/// Category value meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "all";

/// A single booking row as captured by the scraper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub category: String,
    pub room_name: String,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub reservation_date: String,      // YYYY-MM-DD
    pub reservation_time_slot: String, // HH-MM, sorts chronologically
    pub original_title: String,
    pub crawled_at: String,
}

/// Insert shape for ingestion tooling; `id` is assigned by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub category: String,
    pub room_name: String,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub reservation_date: String,
    pub reservation_time_slot: String,
    pub original_title: String,
    pub crawled_at: String,
}

/// Raw query string of `GET /api/reservations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationQuery {
    pub date: Option<String>,
    pub category: Option<String>,
}

/// Resolved filter handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Matched exactly against `reservation_date`. Not validated; a malformed
    /// value simply matches nothing.
    pub date: String,
    /// Case-sensitive substring of `category`. `None` disables the filter.
    pub category: Option<String>,
}

impl ReservationQuery {
    pub fn into_filter(self, today: NaiveDate) -> ReservationFilter {
        let date = non_empty(self.date).unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
        let category = non_empty(self.category).filter(|c| c != ALL_CATEGORIES);

        ReservationFilter { date, category }
    }
}

impl ReservationFilter {
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use rooms_core::repository::ReservationRepository;
use rooms_core::reservation::{NewReservation, Reservation, ReservationFilter};
use rooms_core::{CoreError, CoreResult};

const SELECT_RESERVATIONS: &str = "SELECT id, category, room_name, student_id, student_name, \
     reservation_date, reservation_time_slot, original_title, crawled_at \
     FROM reservations WHERE reservation_date = ";

pub struct SqliteReservationRepository {
    pool: SqlitePool,
}

impl SqliteReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes one row and returns its id. Only ingestion tooling writes rows;
    /// there is no HTTP path to this.
    pub async fn insert(&self, reservation: &NewReservation) -> CoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO reservations
                (category, room_name, student_id, student_name, reservation_date,
                 reservation_time_slot, original_title, crawled_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reservation.category)
        .bind(&reservation.room_name)
        .bind(&reservation.student_id)
        .bind(&reservation.student_name)
        .bind(&reservation.reservation_date)
        .bind(&reservation.reservation_time_slot)
        .bind(&reservation.original_title)
        .bind(&reservation.crawled_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.last_insert_rowid())
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    category: String,
    room_name: String,
    student_id: Option<String>,
    student_name: Option<String>,
    reservation_date: String,
    reservation_time_slot: String,
    original_title: String,
    crawled_at: String,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            room_name: row.room_name,
            student_id: row.student_id,
            student_name: row.student_name,
            reservation_date: row.reservation_date,
            reservation_time_slot: row.reservation_time_slot,
            original_title: row.original_title,
            crawled_at: row.crawled_at,
        }
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::StorageError(err.to_string())
}

fn build_query(filter: &ReservationFilter) -> QueryBuilder<'static, Sqlite> {
    let mut query = QueryBuilder::new(SELECT_RESERVATIONS);
    query.push_bind(filter.date.clone());

    // instr() is case-sensitive and treats % and _ literally, unlike LIKE.
    if let Some(category) = &filter.category {
        query.push(" AND instr(category, ");
        query.push_bind(category.clone());
        query.push(") > 0");
    }

    query.push(" ORDER BY room_name, reservation_time_slot, id");
    query
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    async fn find_reservations(&self, filter: &ReservationFilter) -> CoreResult<Vec<Reservation>> {
        let mut query = build_query(filter);
        let rows = query
            .build_query_as::<ReservationRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        debug!(date = %filter.date, category = ?filter.category, count = rows.len(), "Fetched reservations");

        Ok(rows.into_iter().map(Reservation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbClient;

    async fn setup() -> (tempfile::TempDir, SqliteReservationRepository) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("reservations.db").display());
        let db = DbClient::new(&url, 1).await.expect("Failed to open database");
        db.migrate().await.expect("Failed to migrate");
        (dir, SqliteReservationRepository::new(db.pool))
    }

    fn row(category: &str, room: &str, date: &str, slot: &str) -> NewReservation {
        NewReservation {
            category: category.to_string(),
            room_name: room.to_string(),
            student_id: Some("20231234".to_string()),
            student_name: Some("홍길동".to_string()),
            reservation_date: date.to_string(),
            reservation_time_slot: slot.to_string(),
            original_title: format!("20231234/홍길동/6.1/{slot}"),
            crawled_at: "2024-06-01 08:00:00".to_string(),
        }
    }

    #[test]
    fn test_query_without_category_has_single_bind() {
        let query = build_query(&ReservationFilter::for_date("2024-06-01"));
        let sql = query.sql();
        assert!(sql.ends_with("WHERE reservation_date = ? ORDER BY room_name, reservation_time_slot, id"));
        assert!(!sql.contains("instr"));
    }

    #[test]
    fn test_query_with_category_adds_substring_clause() {
        let query = build_query(&ReservationFilter::for_date("2024-06-01").with_category("드럼"));
        assert!(query.sql().contains("AND instr(category, ?) > 0"));
    }

    #[tokio::test]
    async fn test_find_orders_by_room_then_slot() {
        let (_dir, repo) = setup().await;
        repo.insert(&row("일반 연습실", "B2", "2024-06-01", "10-11")).await.unwrap();
        repo.insert(&row("일반 연습실", "A1", "2024-06-01", "13-14")).await.unwrap();
        repo.insert(&row("일반 연습실", "A1", "2024-06-01", "09-10")).await.unwrap();
        repo.insert(&row("일반 연습실", "A1", "2024-06-02", "08-09")).await.unwrap();

        let found = repo
            .find_reservations(&ReservationFilter::for_date("2024-06-01"))
            .await
            .unwrap();

        let keys: Vec<(&str, &str)> = found
            .iter()
            .map(|r| (r.room_name.as_str(), r.reservation_time_slot.as_str()))
            .collect();
        assert_eq!(keys, vec![("A1", "09-10"), ("A1", "13-14"), ("B2", "10-11")]);
    }

    #[tokio::test]
    async fn test_category_substring_is_case_sensitive() {
        let (_dir, repo) = setup().await;
        repo.insert(&row("Studio/Lab/Lounge", "S1", "2024-06-01", "09-10")).await.unwrap();
        repo.insert(&row("드럼 연습실", "D1", "2024-06-01", "09-10")).await.unwrap();

        let filter = ReservationFilter::for_date("2024-06-01");

        let lab = repo.find_reservations(&filter.clone().with_category("Lab")).await.unwrap();
        assert_eq!(lab.len(), 1);
        assert_eq!(lab[0].room_name, "S1");

        let lower = repo.find_reservations(&filter.clone().with_category("lab")).await.unwrap();
        assert!(lower.is_empty());

        let drum = repo.find_reservations(&filter.clone().with_category("드럼")).await.unwrap();
        assert_eq!(drum.len(), 1);
        assert_eq!(drum[0].room_name, "D1");

        let wildcard = repo.find_reservations(&filter.with_category("%")).await.unwrap();
        assert!(wildcard.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_returned_in_insert_order() {
        let (_dir, repo) = setup().await;
        let first = repo.insert(&row("study", "A1", "2024-06-01", "09-10")).await.unwrap();
        let second = repo.insert(&row("study", "A1", "2024-06-01", "09-10")).await.unwrap();

        let found = repo
            .find_reservations(&ReservationFilter::for_date("2024-06-01"))
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_missing_table_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("empty.db").display());
        let db = DbClient::new(&url, 1).await.unwrap();
        let repo = SqliteReservationRepository::new(db.pool);

        let err = repo
            .find_reservations(&ReservationFilter::for_date("2024-06-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));
    }
}

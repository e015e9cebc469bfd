use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reservation::ALL_CATEGORIES;
use crate::{non_empty, CoreResult};

/// Arguments forwarded to the external scraper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    pub date: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshStatus {
    pub status: String,
}

impl RefreshStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into() }
    }
}

impl RefreshRequest {
    /// Positional arguments appended to the scraper command line. The scraper
    /// requires both, so a missing date becomes `today` and a missing category
    /// becomes `all`.
    pub fn command_args(&self, today: NaiveDate) -> Vec<String> {
        let date = non_empty(self.date.clone()).unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
        let category = non_empty(self.category.clone()).unwrap_or_else(|| ALL_CATEGORIES.to_string());
        vec![date, category]
    }
}

/// Starts an ingestion run. Implementations must not block on the run itself.
#[async_trait]
pub trait IngestionTrigger: Send + Sync {
    async fn trigger(&self, request: &RefreshRequest) -> CoreResult<RefreshStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_command_args_order() {
        let req = RefreshRequest {
            date: Some("2024-06-03".to_string()),
            category: Some("일반 연습실".to_string()),
        };
        assert_eq!(req.command_args(today()), vec!["2024-06-03", "일반 연습실"]);
    }

    #[test]
    fn test_command_args_always_has_date_and_category() {
        assert_eq!(RefreshRequest::default().command_args(today()), vec!["2024-06-01", "all"]);

        let date_only = RefreshRequest {
            date: Some("2024-06-03".to_string()),
            category: None,
        };
        assert_eq!(date_only.command_args(today()), vec!["2024-06-03", "all"]);

        let empty = RefreshRequest {
            date: Some(String::new()),
            category: Some(String::new()),
        };
        assert_eq!(empty.command_args(today()), vec!["2024-06-01", "all"]);
    }
}

// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use smartcalc::application::LedgerService;
use smartcalc::domain::EntryKind;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Test fixture: a small month of personal finances
pub struct SampleEntries;

impl SampleEntries {
    /// Seed one salary payment and a few categorized expenses
    pub async fn seed_basic(service: &LedgerService) -> Result<()> {
        service
            .add_entry(
                EntryKind::Income,
                "Salary".into(),
                500_000,
                parse_date("2024-01-01"),
                None,
            )
            .await?;
        service
            .add_entry(
                EntryKind::Expense,
                "Housing".into(),
                150_000,
                parse_date("2024-01-02"),
                None,
            )
            .await?;
        service
            .add_entry(
                EntryKind::Expense,
                "Food".into(),
                15_000,
                parse_date("2024-01-05"),
                None,
            )
            .await?;
        service
            .add_entry(
                EntryKind::Expense,
                "Food".into(),
                20_000,
                parse_date("2024-01-12"),
                None,
            )
            .await?;
        service
            .add_entry(
                EntryKind::Expense,
                "Transport".into(),
                8_000,
                parse_date("2024-01-20"),
                None,
            )
            .await?;
        Ok(())
    }
}

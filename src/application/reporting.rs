use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, EntryKind, PeriodType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub kind: Option<EntryKind>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: i64,
    pub average: Cents,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub kind: Option<EntryKind>,
    pub period: PeriodType,
    pub buckets: Vec<PeriodSummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub bucket: String,
    pub total: Cents,
    pub count: i64,
    pub average: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeExpenseReport {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
    pub income_categories: Vec<CategorySummary>,
    pub expense_categories: Vec<CategorySummary>,
}

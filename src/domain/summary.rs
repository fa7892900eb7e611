use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, Entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Monthly,
    Yearly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekly" => Some(PeriodType::Weekly),
            "monthly" => Some(PeriodType::Monthly),
            "yearly" => Some(PeriodType::Yearly),
            _ => None,
        }
    }

    /// Grouping key for a date. Weekly buckets are keyed by their Monday.
    pub fn bucket(&self, date: DateTime<Utc>) -> String {
        match self {
            PeriodType::Weekly => {
                let days = date.weekday().num_days_from_monday() as i64;
                let monday = date.date_naive() - Duration::days(days);
                monday.format("%Y-%m-%d").to_string()
            }
            PeriodType::Monthly => date.format("%Y-%m").to_string(),
            PeriodType::Yearly => date.format("%Y").to_string(),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived aggregate view over entries. Always recomputed from the raw
/// entries; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Groups in first-occurrence insertion order
    pub groups: Vec<GroupTotal>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: Cents,
    pub count: i64,
    pub average: Cents,
}

/// Sum entry amounts per group key. Group order is the insertion order of
/// each key's first occurrence; keys with no entries never appear.
pub fn summarize<F>(entries: &[Entry], key_fn: F) -> Summary
where
    F: Fn(&Entry) -> String,
{
    let mut groups: Vec<GroupTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0;

    for entry in entries {
        let key = key_fn(entry);
        let i = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupTotal {
                key,
                total: 0,
                count: 0,
                average: 0,
            });
            groups.len() - 1
        });
        groups[i].total += entry.amount_cents;
        groups[i].count += 1;
        total += entry.amount_cents;
    }

    for group in &mut groups {
        group.average = group.total / group.count;
    }

    Summary { groups, total }
}

/// Sum amounts per category.
pub fn summarize_by_category(entries: &[Entry]) -> Summary {
    summarize(entries, |e| e.category.clone())
}

/// Sum amounts per time bucket of the given period.
pub fn summarize_by_period(entries: &[Entry], period: PeriodType) -> Summary {
    summarize(entries, |e| period.bucket(e.date))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::EntryKind;

    fn date(s: &str) -> DateTime<Utc> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn expense(category: &str, amount: Cents, day: &str) -> Entry {
        Entry::new(EntryKind::Expense, category, amount, date(day)).unwrap()
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_by_category(&[]);
        assert!(summary.groups.is_empty());
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_summarize_by_category() {
        let entries = vec![
            expense("Food", 5000, "2024-01-01"),
            expense("Food", 3000, "2024-01-02"),
            expense("Transport", 1500, "2024-01-03"),
        ];

        let summary = summarize_by_category(&entries);

        assert_eq!(summary.total, 9500);
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.groups[0].key, "Food");
        assert_eq!(summary.groups[0].total, 8000);
        assert_eq!(summary.groups[0].count, 2);
        assert_eq!(summary.groups[0].average, 4000);
        assert_eq!(summary.groups[1].key, "Transport");
        assert_eq!(summary.groups[1].total, 1500);
    }

    #[test]
    fn test_group_order_is_first_occurrence() {
        // Housing and Food tie on total; Housing was seen first and stays first
        let entries = vec![
            expense("Housing", 4000, "2024-01-01"),
            expense("Food", 1000, "2024-01-02"),
            expense("Food", 3000, "2024-01-03"),
        ];

        let summary = summarize_by_category(&entries);

        let keys: Vec<&str> = summary.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Housing", "Food"]);
        assert_eq!(summary.groups[0].total, summary.groups[1].total);
    }

    #[test]
    fn test_group_totals_sum_to_overall_total() {
        let entries = vec![
            expense("Food", 123, "2024-01-01"),
            expense("Transport", 456, "2024-01-05"),
            expense("Food", 789, "2024-02-11"),
            expense("Healthcare", 1011, "2024-03-02"),
        ];

        let summary = summarize_by_category(&entries);
        let group_sum: Cents = summary.groups.iter().map(|g| g.total).sum();
        let raw_sum: Cents = entries.iter().map(|e| e.amount_cents).sum();

        assert_eq!(group_sum, summary.total);
        assert_eq!(summary.total, raw_sum);
    }

    #[test]
    fn test_summarize_by_month() {
        let entries = vec![
            expense("Food", 5000, "2024-01-01"),
            expense("Food", 3000, "2024-01-15"),
            expense("Food", 2000, "2024-02-01"),
        ];

        let summary = summarize_by_period(&entries, PeriodType::Monthly);

        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.groups[0].key, "2024-01");
        assert_eq!(summary.groups[0].total, 8000);
        assert_eq!(summary.groups[1].key, "2024-02");
        assert_eq!(summary.groups[1].total, 2000);
    }

    #[test]
    fn test_weekly_bucket_starts_on_monday() {
        // 2024-01-10 is a Wednesday; its week starts 2024-01-08
        assert_eq!(PeriodType::Weekly.bucket(date("2024-01-10")), "2024-01-08");
        assert_eq!(PeriodType::Weekly.bucket(date("2024-01-08")), "2024-01-08");
        assert_eq!(PeriodType::Weekly.bucket(date("2024-01-14")), "2024-01-08");
    }

    #[test]
    fn test_yearly_bucket() {
        assert_eq!(PeriodType::Yearly.bucket(date("2024-06-15")), "2024");
    }

    #[test]
    fn test_period_type_roundtrip() {
        for pt in [PeriodType::Weekly, PeriodType::Monthly, PeriodType::Yearly] {
            let s = pt.as_str();
            let parsed = PeriodType::from_str(s).unwrap();
            assert_eq!(pt, parsed);
        }
    }
}

mod common;

use anyhow::Result;
use common::{parse_date, test_service, SampleEntries};
use smartcalc::domain::{Cents, EntryKind, PeriodType};

#[tokio::test]
async fn test_category_report_sums_per_category() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            5000,
            parse_date("2024-01-01"),
            None,
        )
        .await?;
    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            3000,
            parse_date("2024-01-02"),
            None,
        )
        .await?;

    let report = service.category_report(None, None, None).await?;

    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].category, "Food");
    assert_eq!(report.categories[0].total, 8000);
    assert_eq!(report.total, 8000);
    Ok(())
}

#[tokio::test]
async fn test_category_report_counts_averages_percentages() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleEntries::seed_basic(&service).await?;

    let report = service
        .category_report(Some(EntryKind::Expense), None, None)
        .await?;

    assert_eq!(report.total, 193_000);

    let food = report
        .categories
        .iter()
        .find(|c| c.category == "Food")
        .unwrap();
    assert_eq!(food.total, 35_000);
    assert_eq!(food.count, 2);
    assert_eq!(food.average, 17_500);
    assert!((food.percentage - 18.13).abs() < 0.1);

    let housing = report
        .categories
        .iter()
        .find(|c| c.category == "Housing")
        .unwrap();
    assert_eq!(housing.total, 150_000);
    assert!((housing.percentage - 77.72).abs() < 0.1);
    Ok(())
}

#[tokio::test]
async fn test_category_order_is_first_occurrence_even_on_ties() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Transport and Food both total 4000; Transport appeared first
    service
        .add_entry(
            EntryKind::Expense,
            "Transport".into(),
            4000,
            parse_date("2024-01-01"),
            None,
        )
        .await?;
    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            1000,
            parse_date("2024-01-02"),
            None,
        )
        .await?;
    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            3000,
            parse_date("2024-01-03"),
            None,
        )
        .await?;

    let report = service.category_report(None, None, None).await?;

    let names: Vec<&str> = report
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["Transport", "Food"]);
    assert_eq!(report.categories[0].total, report.categories[1].total);
    Ok(())
}

#[tokio::test]
async fn test_kind_filter_omits_other_kinds_entirely() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleEntries::seed_basic(&service).await?;

    let report = service
        .category_report(Some(EntryKind::Income), None, None)
        .await?;

    // No expense category leaks into an income report, not even with zero
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].category, "Salary");
    Ok(())
}

#[tokio::test]
async fn test_report_totals_match_raw_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleEntries::seed_basic(&service).await?;

    let report = service.category_report(None, None, None).await?;
    let entries = service.list_entries().await?;

    let group_sum: Cents = report.categories.iter().map(|c| c.total).sum();
    let raw_sum: Cents = entries.iter().map(|e| e.amount_cents).sum();

    assert_eq!(group_sum, report.total);
    assert_eq!(report.total, raw_sum);
    Ok(())
}

#[tokio::test]
async fn test_category_report_respects_date_range() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleEntries::seed_basic(&service).await?;

    let report = service
        .category_report(
            Some(EntryKind::Expense),
            Some(parse_date("2024-01-10")),
            Some(parse_date("2024-01-15")),
        )
        .await?;

    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].category, "Food");
    assert_eq!(report.total, 20_000);
    Ok(())
}

#[tokio::test]
async fn test_period_report_monthly_buckets() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            5000,
            parse_date("2024-01-05"),
            None,
        )
        .await?;
    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            3000,
            parse_date("2024-01-25"),
            None,
        )
        .await?;
    service
        .add_entry(
            EntryKind::Expense,
            "Food".into(),
            2000,
            parse_date("2024-02-10"),
            None,
        )
        .await?;

    let report = service
        .period_report(None, PeriodType::Monthly, None, None)
        .await?;

    assert_eq!(report.buckets.len(), 2);
    assert_eq!(report.buckets[0].bucket, "2024-01");
    assert_eq!(report.buckets[0].total, 8000);
    assert_eq!(report.buckets[0].count, 2);
    assert_eq!(report.buckets[1].bucket, "2024-02");
    assert_eq!(report.buckets[1].total, 2000);
    assert_eq!(report.total, 10_000);
    Ok(())
}

#[tokio::test]
async fn test_period_report_yearly_buckets() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_entry(
            EntryKind::Income,
            "Salary".into(),
            100_000,
            parse_date("2023-12-31"),
            None,
        )
        .await?;
    service
        .add_entry(
            EntryKind::Income,
            "Salary".into(),
            110_000,
            parse_date("2024-01-01"),
            None,
        )
        .await?;

    let report = service
        .period_report(Some(EntryKind::Income), PeriodType::Yearly, None, None)
        .await?;

    assert_eq!(report.buckets.len(), 2);
    assert_eq!(report.buckets[0].bucket, "2023");
    assert_eq!(report.buckets[1].bucket, "2024");
    Ok(())
}

#[tokio::test]
async fn test_income_expense_report() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleEntries::seed_basic(&service).await?;

    let report = service.income_expense_report(None, None).await?;

    assert_eq!(report.total_income, 500_000);
    assert_eq!(report.total_expense, 193_000);
    assert_eq!(report.net, 307_000);
    assert_eq!(report.income_categories.len(), 1);
    assert_eq!(report.expense_categories.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_empty_ledger_reports() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let category = service.category_report(None, None, None).await?;
    assert!(category.categories.is_empty());
    assert_eq!(category.total, 0);

    let period = service
        .period_report(None, PeriodType::Monthly, None, None)
        .await?;
    assert!(period.buckets.is_empty());

    let overview = service.income_expense_report(None, None).await?;
    assert_eq!(overview.net, 0);
    Ok(())
}

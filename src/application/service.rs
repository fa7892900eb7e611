use chrono::{DateTime, Utc};

use crate::domain::{
    compare, net_worth, summarize_by_category, summarize_by_period, AuditReport, Cents, Entry,
    EntryId, EntryKind, LeaderRole, NetWorthSummary, PeriodType, ReferenceTable, Summary,
    WealthComparison,
};
use crate::storage::{LedgerStats, Repository};

use super::{
    AppError, CategoryReport, CategorySummary, IncomeExpenseReport, PeriodReport, PeriodSummary,
};

/// Application service providing high-level operations for the ledger and
/// the calculators. This is the primary interface for any client (CLI, UI).
pub struct LedgerService {
    repo: Repository,
    reference: ReferenceTable,
}

/// Filter for querying entries
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub kind: Option<EntryKind>,
    pub category: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LedgerService {
    /// Create a new ledger service with the given repository and reference
    /// wealth table.
    pub fn new(repo: Repository, reference: ReferenceTable) -> Self {
        Self { repo, reference }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo, ReferenceTable::builtin()))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo, ReferenceTable::builtin()))
    }

    pub fn reference_table(&self) -> &ReferenceTable {
        &self.reference
    }

    // ========================
    // Entry operations
    // ========================

    /// Record a new entry. Validation failures leave the ledger untouched.
    pub async fn add_entry(
        &self,
        kind: EntryKind,
        category: String,
        amount_cents: Cents,
        date: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<Entry, AppError> {
        let mut entry = Entry::new(kind, category, amount_cents, date)?;
        if let Some(note) = note {
            entry = entry.with_note(note);
        }

        self.repo.save_entry(&mut entry).await?;
        Ok(entry)
    }

    /// Get an entry by ID.
    pub async fn get_entry(&self, id: EntryId) -> Result<Entry, AppError> {
        self.repo
            .get_entry(id)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// List all entries in insertion order.
    pub async fn list_entries(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.repo.list_entries().await?)
    }

    /// List entries with filters, still in insertion order.
    pub async fn list_entries_filtered(
        &self,
        filter: EntryFilter,
    ) -> Result<Vec<Entry>, AppError> {
        Ok(self
            .repo
            .list_entries_filtered(
                filter.kind,
                filter.category.as_deref(),
                filter.from_date,
                filter.to_date,
                filter.limit,
            )
            .await?)
    }

    /// Remove an entry. Returns false if the ID was not found; that is not
    /// an error.
    pub async fn remove_entry(&self, id: EntryId) -> Result<bool, AppError> {
        Ok(self.repo.delete_entry(id).await?)
    }

    /// Whole-ledger statistics.
    pub async fn stats(&self) -> Result<LedgerStats, AppError> {
        Ok(self.repo.get_stats().await?)
    }

    // ========================
    // Reports
    // ========================

    /// Per-category totals with percentage shares.
    pub async fn category_report(
        &self,
        kind: Option<EntryKind>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
    ) -> Result<CategoryReport, AppError> {
        let entries = self.entries_in_range(kind, from_date, to_date).await?;
        let summary = summarize_by_category(&entries);

        Ok(CategoryReport {
            kind,
            from_date,
            to_date,
            categories: category_summaries(&summary),
            total: summary.total,
        })
    }

    /// Totals per time bucket (weekly, monthly, or yearly).
    pub async fn period_report(
        &self,
        kind: Option<EntryKind>,
        period: PeriodType,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
    ) -> Result<PeriodReport, AppError> {
        let entries = self.entries_in_range(kind, from_date, to_date).await?;
        let summary = summarize_by_period(&entries, period);

        let buckets = summary
            .groups
            .iter()
            .map(|g| PeriodSummary {
                bucket: g.key.clone(),
                total: g.total,
                count: g.count,
                average: g.average,
            })
            .collect();

        Ok(PeriodReport {
            kind,
            period,
            buckets,
            total: summary.total,
        })
    }

    /// Income vs expense totals with per-kind category breakdowns.
    pub async fn income_expense_report(
        &self,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
    ) -> Result<IncomeExpenseReport, AppError> {
        let income = self
            .entries_in_range(Some(EntryKind::Income), from_date, to_date)
            .await?;
        let expense = self
            .entries_in_range(Some(EntryKind::Expense), from_date, to_date)
            .await?;

        let income_summary = summarize_by_category(&income);
        let expense_summary = summarize_by_category(&expense);

        Ok(IncomeExpenseReport {
            from_date,
            to_date,
            total_income: income_summary.total,
            total_expense: expense_summary.total,
            net: income_summary.total - expense_summary.total,
            income_categories: category_summaries(&income_summary),
            expense_categories: category_summaries(&expense_summary),
        })
    }

    async fn entries_in_range(
        &self,
        kind: Option<EntryKind>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<Entry>, AppError> {
        Ok(self
            .repo
            .list_entries_filtered(kind, None, from_date, to_date, None)
            .await?)
    }

    // ========================
    // Calculators (stateless)
    // ========================

    /// Net worth from asset and liability totals.
    pub fn net_worth(
        &self,
        assets_cents: Cents,
        liabilities_cents: Cents,
    ) -> Result<NetWorthSummary, AppError> {
        Ok(net_worth(assets_cents, liabilities_cents)?)
    }

    /// Rank a net worth figure against the reference wealth table.
    pub fn compare_net_worth(&self, amount_cents: Cents) -> Result<WealthComparison, AppError> {
        Ok(compare(&self.reference, amount_cents)?)
    }

    /// Remaining-funds audit for a government leader.
    pub fn audit_leader(
        &self,
        role: LeaderRole,
        salary_cents: Cents,
        allowances_cents: Cents,
        development_cents: Cents,
    ) -> Result<AuditReport, AppError> {
        Ok(crate::domain::audit_leader(
            role,
            salary_cents,
            allowances_cents,
            development_cents,
        )?)
    }
}

fn category_summaries(summary: &Summary) -> Vec<CategorySummary> {
    summary
        .groups
        .iter()
        .map(|g| CategorySummary {
            category: g.key.clone(),
            total: g.total,
            count: g.count,
            average: g.average,
            percentage: if summary.total > 0 {
                g.total as f64 / summary.total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

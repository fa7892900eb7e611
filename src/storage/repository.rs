use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Cents, Entry, EntryId, EntryKind};

use super::MIGRATION_001_INITIAL;

/// Whole-ledger statistics computed with SQL aggregation.
#[derive(Debug, Clone)]
pub struct LedgerStats {
    pub entry_count: i64,
    pub income_total: Cents,
    pub expense_total: Cents,
    pub first_entry: Option<DateTime<Utc>>,
    pub last_entry: Option<DateTime<Utc>>,
}

/// Repository for persisting and querying ledger entries.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Save a new entry to the database.
    /// Automatically assigns the next sequence number.
    pub async fn save_entry(&self, entry: &mut Entry) -> Result<()> {
        let sequence = self.next_sequence().await?;
        entry.sequence = sequence;

        sqlx::query(
            r#"
            INSERT INTO entries (id, sequence, kind, category, amount_cents, date, recorded_at, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.sequence)
        .bind(entry.kind.as_str())
        .bind(&entry.category)
        .bind(entry.amount_cents)
        .bind(entry.date.to_rfc3339())
        .bind(entry.recorded_at.to_rfc3339())
        .bind(&entry.note)
        .execute(&self.pool)
        .await
        .context("Failed to save entry")?;

        Ok(())
    }

    /// Get the next sequence number and increment the counter.
    async fn next_sequence(&self) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'entry_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to get next sequence number")?;

        Ok(row.get("value"))
    }

    /// Get an entry by ID.
    pub async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, sequence, kind, category, amount_cents, date, recorded_at, note
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch entry")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    /// List all entries, ordered by sequence number (insertion order).
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sequence, kind, category, amount_cents, date, recorded_at, note
            FROM entries
            ORDER BY sequence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// List entries with optional filters, still in insertion order.
    pub async fn list_entries_filtered(
        &self,
        kind: Option<EntryKind>,
        category: Option<&str>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>> {
        // Build query dynamically based on filters
        let mut query = String::from(
            "SELECT id, sequence, kind, category, amount_cents, date, recorded_at, note FROM entries WHERE 1=1",
        );

        // Collect all string bindings first so they live long enough
        let from_date_str = from_date.map(|dt| dt.to_rfc3339());
        let to_date_str = to_date.map(|dt| dt.to_rfc3339());

        if kind.is_some() {
            query.push_str(" AND kind = ?");
        }
        if category.is_some() {
            query.push_str(" AND category = ?");
        }
        if from_date.is_some() {
            query.push_str(" AND date >= ?");
        }
        if to_date.is_some() {
            query.push_str(" AND date <= ?");
        }

        query.push_str(" ORDER BY sequence");

        if let Some(lim) = limit {
            query.push_str(&format!(" LIMIT {}", lim));
        }

        let mut sql_query = sqlx::query(&query);

        if let Some(k) = kind {
            sql_query = sql_query.bind(k.as_str());
        }
        if let Some(cat) = category {
            sql_query = sql_query.bind(cat);
        }
        if let Some(ref fd_str) = from_date_str {
            sql_query = sql_query.bind(fd_str);
        }
        if let Some(ref td_str) = to_date_str {
            sql_query = sql_query.bind(td_str);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list filtered entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Delete an entry. Returns false if no entry had the given ID.
    pub async fn delete_entry(&self, id: EntryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete entry")?;

        Ok(result.rows_affected() > 0)
    }

    /// Compute whole-ledger statistics in a single pass.
    pub async fn get_stats(&self) -> Result<LedgerStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as entry_count,
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE 0 END), 0) as income_total,
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_cents ELSE 0 END), 0) as expense_total,
                MIN(date) as first_entry,
                MAX(date) as last_entry
            FROM entries
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute ledger stats")?;

        let first_entry: Option<String> = row.get("first_entry");
        let last_entry: Option<String> = row.get("last_entry");

        Ok(LedgerStats {
            entry_count: row.get("entry_count"),
            income_total: row.get("income_total"),
            expense_total: row.get("expense_total"),
            first_entry: parse_optional_timestamp(first_entry)?,
            last_entry: parse_optional_timestamp(last_entry)?,
        })
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Entry {
            id: Uuid::parse_str(&id_str).context("Invalid entry ID")?,
            sequence: row.get("sequence"),
            kind: EntryKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry kind: {}", kind_str))?,
            category: row.get("category"),
            amount_cents: row.get("amount_cents"),
            date: DateTime::parse_from_rfc3339(&date_str)
                .context("Invalid date timestamp")?
                .with_timezone(&Utc),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
            note: row.get("note"),
        })
    }
}

fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .context("Invalid timestamp")
                .map(|dt| dt.with_timezone(&Utc))
        })
        .transpose()
}

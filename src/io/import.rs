use std::collections::HashSet;
use std::io::Read;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::application::LedgerService;
use crate::domain::{parse_cents, Cents, EntryKind};
use crate::io::export::DatabaseSnapshot;

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
    pub skip_duplicates: bool,
}

/// Importer for loading entries into the ledger
pub struct Importer<'a> {
    service: &'a LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Import entries from CSV with columns: date, kind, category, amount, note.
    /// Amounts are human decimal strings ("50.00"); dates are YYYY-MM-DD or
    /// RFC 3339. Bad lines are collected as errors, not fatal.
    pub async fn import_entries_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut imported = 0;
        let mut skipped = 0;
        let mut errors = Vec::new();

        let mut seen = if options.skip_duplicates {
            self.existing_fingerprints().await?
        } else {
            HashSet::new()
        };

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let date_str = record.get(0).unwrap_or("");
            let kind_str = record.get(1).unwrap_or("");
            let category = record.get(2).unwrap_or("").to_string();
            let amount_str = record.get(3).unwrap_or("");
            let note = record.get(4).and_then(|s| {
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            });

            let date = match parse_timestamp(date_str) {
                Ok(d) => d,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("date".to_string()),
                        error: format!("Invalid date: {}", e),
                    });
                    continue;
                }
            };

            let kind = match EntryKind::from_str(kind_str) {
                Some(k) => k,
                None => {
                    errors.push(ImportError {
                        line,
                        field: Some("kind".to_string()),
                        error: format!("Invalid kind: {}", kind_str),
                    });
                    continue;
                }
            };

            let amount_cents = match parse_cents(amount_str) {
                Ok(a) => a,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount: {}", e),
                    });
                    continue;
                }
            };

            if options.skip_duplicates {
                let key = fingerprint(date, kind, &category, amount_cents);
                if !seen.insert(key) {
                    skipped += 1;
                    continue;
                }
            }

            if options.dry_run {
                imported += 1;
                continue;
            }

            match self
                .service
                .add_entry(kind, category, amount_cents, date, note)
                .await
            {
                Ok(_) => imported += 1,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("Entry creation failed: {}", e),
                    });
                }
            }
        }

        Ok(ImportResult {
            imported,
            skipped,
            errors,
        })
    }

    /// Import entries from a full JSON snapshot, preserving snapshot order.
    pub async fn import_full_json<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let snapshot: DatabaseSnapshot = serde_json::from_reader(reader)?;

        let mut entries = snapshot.entries;
        entries.sort_by_key(|e| e.sequence);

        let mut imported = 0;
        let mut skipped = 0;
        let mut errors = Vec::new();

        let mut seen = if options.skip_duplicates {
            self.existing_fingerprints().await?
        } else {
            HashSet::new()
        };

        for entry in entries {
            if options.skip_duplicates {
                let key = fingerprint(entry.date, entry.kind, &entry.category, entry.amount_cents);
                if !seen.insert(key) {
                    skipped += 1;
                    continue;
                }
            }

            if options.dry_run {
                imported += 1;
                continue;
            }

            match self
                .service
                .add_entry(
                    entry.kind,
                    entry.category,
                    entry.amount_cents,
                    entry.date,
                    entry.note,
                )
                .await
            {
                Ok(_) => imported += 1,
                Err(e) => {
                    errors.push(ImportError {
                        line: 0,
                        field: None,
                        error: format!("Entry creation failed: {}", e),
                    });
                }
            }
        }

        Ok(ImportResult {
            imported,
            skipped,
            errors,
        })
    }

    async fn existing_fingerprints(&self) -> Result<HashSet<String>> {
        let existing = self.service.list_entries().await?;
        Ok(existing
            .iter()
            .map(|e| fingerprint(e.date, e.kind, &e.category, e.amount_cents))
            .collect())
    }
}

fn fingerprint(date: DateTime<Utc>, kind: EntryKind, category: &str, amount_cents: Cents) -> String {
    format!("{}|{}|{}|{}", date.to_rfc3339(), kind, category, amount_cents)
}

// Accepts RFC 3339 or plain YYYY-MM-DD
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    anyhow::bail!("Invalid timestamp format: {}", s)
}

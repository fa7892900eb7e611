use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type EntryId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money going out (rent, groceries, transport, ...)
    Expense,
    /// Money coming in (salary, investments, ...)
    Income,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expense" => Some(EntryKind::Expense),
            "income" => Some(EntryKind::Income),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded financial transaction. Entries are immutable once created;
/// corrections are made by removing and re-adding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Monotonically increasing sequence number for insertion ordering
    pub sequence: i64,
    pub kind: EntryKind,
    /// Spending/earning category (e.g. "Food", "Salary")
    pub category: String,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    /// When the money moved in the real world
    pub date: DateTime<Utc>,
    /// When we recorded this entry in the system
    pub recorded_at: DateTime<Utc>,
    /// Optional free-form note
    pub note: Option<String>,
}

impl Entry {
    /// Create a new entry. Sequence number must be assigned by the repository.
    pub fn new(
        kind: EntryKind,
        category: impl Into<String>,
        amount_cents: Cents,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let category = category.into();
        if amount_cents < 0 {
            return Err(ValidationError::NegativeAmount {
                requested: amount_cents,
            });
        }
        if category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            kind,
            category,
            amount_cents,
            date,
            recorded_at: Utc::now(),
            note: None,
        })
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NegativeAmount { requested: Cents },
    EmptyCategory,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NegativeAmount { requested } => {
                write!(f, "amount must not be negative (got {} cents)", requested)
            }
            ValidationError::EmptyCategory => write!(f, "category must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

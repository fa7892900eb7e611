use thiserror::Error;

use crate::domain::{InvalidInputError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid entry: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

//! Diary error types

use crate::store::StorageError;
use serde::Serialize;
use thiserror::Error;

/// A single field constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All constraint violations found in one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors
    pub fn into_result(self) -> Result<(), DiaryError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DiaryError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

/// Errors surfaced by diary operations
#[derive(Error, Debug)]
pub enum DiaryError {
    /// Input failed field constraints
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Entry absent, soft-deleted or owned by another user
    #[error("Diary {0} not found")]
    NotFound(i64),

    /// Record store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for diary operations
pub type DiaryResult<T> = Result<T, DiaryError>;

//! Error types for jjprep operations.

use thiserror::Error;

/// Errors that can occur when loading or scheduling a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan file not found: {0}")]
    PlanNotFound(String),

    #[error("Failed to parse plan: {0}")]
    PlanParse(String),

    #[error("Start date is required")]
    EmptyStartDate,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for jjprep operations.
pub type PlanResult<T> = Result<T, PlanError>;

// Domain Error Types

use thiserror::Error;

/// One variant per user-facing failure; every one leaves state unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Student number must be 10 digits")]
    InvalidStudentNumber,

    #[error("Maximum queue size reached ({capacity})")]
    QueueFull { capacity: usize },

    #[error("Queue is closed")]
    QueueClosed,

    #[error("No advisors are currently available")]
    NoAdvisorsAvailable,

    #[error("Advisor not found: {0}")]
    AdvisorNotFound(String),

    #[error("Advisor is not available: {0}")]
    AdvisorUnavailable(String),

    #[error("Queue entry not found: {0}")]
    EntryNotFound(u64),

    #[error("Duplicate advisor id: {0}")]
    DuplicateAdvisor(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Queue capacity must be at least 1")]
    InvalidCapacity,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

pub type Result<T> = std::result::Result<T, DomainError>;

// Queue Entry Domain Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::advisor::AdvisorId;
use crate::domain::error::{DomainError, Result};

/// Entry ID (monotonic, never reused)
pub type EntryId = u64;

/// Required number of digits in a student number
pub const STUDENT_NUMBER_LEN: usize = 10;

/// Student number: exactly ten ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentNumber(String);

impl StudentNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StudentNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        let value = value.trim();
        if value.len() != STUDENT_NUMBER_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidStudentNumber);
        }
        Ok(Self(value.to_string()))
    }
}

impl From<StudentNumber> for String {
    fn from(value: StudentNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for StudentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join request as submitted by the form (unvalidated)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub student_number: String,
    pub reason: String,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        student_number: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            student_number: student_number.into(),
            reason: reason.into(),
        }
    }

    /// Check required fields, then the student number format
    pub fn validate(&self) -> Result<ValidatedStudent> {
        let name = self.name.trim();
        let reason = self.reason.trim();
        if name.is_empty() || self.student_number.trim().is_empty() || reason.is_empty() {
            return Err(DomainError::MissingFields);
        }

        let student_number = StudentNumber::try_from(self.student_number.clone())?;

        Ok(ValidatedStudent {
            name: name.to_string(),
            student_number,
            reason: reason.to_string(),
        })
    }
}

/// Join request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStudent {
    pub name: String,
    pub student_number: StudentNumber,
    pub reason: String,
}

/// One student's record in the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub name: String,
    pub student_number: StudentNumber,
    pub reason: String,

    /// 1-based, assigned at insertion; gaps remain after removals
    pub position: u64,
    pub joined_at: NaiveDateTime,

    pub estimated_wait_time: Option<u32>, // minutes
    pub assigned_advisor: Option<AdvisorId>,

    /// Set by a manual reassignment; bulk recompute keeps the advisor
    pub pinned: bool,
}

impl QueueEntry {
    pub fn new(
        id: EntryId,
        position: u64,
        joined_at: NaiveDateTime,
        student: ValidatedStudent,
    ) -> Self {
        Self {
            id,
            name: student.name,
            student_number: student.student_number,
            reason: student.reason,
            position,
            joined_at,
            estimated_wait_time: None,
            assigned_advisor: None,
            pinned: false,
        }
    }

    pub fn is_assigned_to(&self, advisor: &AdvisorId) -> bool {
        self.assigned_advisor.as_ref() == Some(advisor)
    }
}

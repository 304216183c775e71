// Advisor Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Opaque advisor identity (UUID v4 in production, injected by IdProvider)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvisorId(String);

impl AdvisorId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AdvisorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Staff member queue entries are assigned to
///
/// The name is a display label only; lookups always go through `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisor {
    pub id: AdvisorId,
    pub name: String,
    pub room: String,
    pub is_available: bool,
}

impl Advisor {
    /// Create an available advisor
    ///
    /// # Arguments
    ///
    /// * `id` - Advisor identity (injected, not generated)
    /// * `name` - Display name, must not be blank
    /// * `room` - Room or location label shown to students
    pub fn new(id: AdvisorId, name: impl Into<String>, room: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::MissingFields);
        }

        Ok(Self {
            id,
            name,
            room: room.into().trim().to_string(),
            is_available: true,
        })
    }

    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }
}

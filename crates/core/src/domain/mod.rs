// Domain Layer - Pure business logic and entities

pub mod advisor;
pub mod entry;
pub mod error;
pub mod schedule;

// Re-exports
pub use advisor::{Advisor, AdvisorId};
pub use entry::{EntryId, NewStudent, QueueEntry, StudentNumber, ValidatedStudent};
pub use error::DomainError;
pub use schedule::{DayOfWeek, ScheduleSettings};

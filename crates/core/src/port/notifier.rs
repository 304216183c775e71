// Notification port - user-facing state changes (toasts in a UI)

use tracing::info;

use crate::domain::{AdvisorId, EntryId};

/// State change worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    QueueOpened { manual: bool },
    QueueClosed { manual: bool },
    StudentAdded { entry_id: EntryId, advisor: AdvisorId },
    StudentRemoved { entry_id: EntryId },
    AdvisorChanged { entry_id: EntryId, advisor: AdvisorId },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::QueueOpened { manual: true } => write!(f, "Students can now join the queue"),
            Notice::QueueOpened { manual: false } => write!(f, "Queue schedule has started"),
            Notice::QueueClosed { manual: true } => {
                write!(f, "Students can no longer join the queue")
            }
            Notice::QueueClosed { manual: false } => {
                write!(f, "Queue is now outside operating hours")
            }
            Notice::StudentAdded { entry_id, advisor } => {
                write!(f, "Student #{entry_id} added to queue and assigned to {advisor}")
            }
            Notice::StudentRemoved { entry_id } => {
                write!(f, "Student #{entry_id} has been removed from the queue")
            }
            Notice::AdvisorChanged { entry_id, advisor } => {
                write!(f, "Student #{entry_id} reassigned to {advisor}")
            }
        }
    }
}

/// Notification sink
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Logs every notice as a structured event
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        info!(notice = ?notice, "{}", notice);
    }
}

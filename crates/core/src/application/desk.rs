//! Queue Desk - the one writer of queue and schedule state
//!
//! Wires the schedule controller and the allocator together and fires the
//! recompute triggers: any change to the roster, advisor availability,
//! minutes per student or the entry count reassigns the whole queue.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::allocator::QueueAllocator;
use crate::application::export::{self, CsvExport};
use crate::application::schedule_controller::{ScheduleController, Transition};
use crate::domain::{
    Advisor, AdvisorId, DomainError, EntryId, NewStudent, QueueEntry, ScheduleSettings,
};
use crate::error::Result;
use crate::port::{IdProvider, Notice, Notifier, TimeProvider};

/// Snapshot for the dashboard header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    pub len: usize,
    pub capacity: usize,
    pub is_open: bool,
    pub available_advisors: usize,
    pub time_per_student: u32,
    pub schedule: String,
}

pub struct QueueDesk {
    schedule: ScheduleController,
    queue: QueueAllocator,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    notifier: Arc<dyn Notifier>,
}

impl QueueDesk {
    /// Create the desk and run the initial schedule check
    pub fn new(
        settings: ScheduleSettings,
        capacity: usize,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let queue = QueueAllocator::new(capacity)?;
        let mut desk = Self {
            schedule: ScheduleController::new(settings, notifier.clone()),
            queue,
            time_provider,
            id_provider,
            notifier,
        };
        desk.check_schedule();
        Ok(desk)
    }

    pub fn entries(&self) -> &[QueueEntry] {
        self.queue.entries()
    }

    pub fn schedule(&self) -> &ScheduleSettings {
        self.schedule.settings()
    }

    pub fn is_open(&self) -> bool {
        self.schedule.is_open()
    }

    /// Display name for an advisor id, if still on the roster
    pub fn advisor_name(&self, id: &AdvisorId) -> Option<&str> {
        self.schedule().advisor(id).map(|a| a.name.as_str())
    }

    /// Whether the join form should accept submissions
    pub fn can_join(&self) -> bool {
        self.is_open() && !self.queue.is_full()
    }

    pub fn stats(&self) -> QueueStats {
        let settings = self.schedule();
        QueueStats {
            len: self.queue.len(),
            capacity: self.queue.capacity(),
            is_open: self.is_open(),
            available_advisors: settings.available_advisors().len(),
            time_per_student: settings.time_per_student(),
            schedule: settings.summary(),
        }
    }

    // Schedule

    /// One tick: re-evaluate open/closed against the current time
    pub fn check_schedule(&mut self) -> Option<Transition> {
        let now = self.time_provider.now_local();
        self.schedule.check_schedule(now)
    }

    pub fn toggle_open(&mut self) -> Transition {
        self.schedule.toggle_open()
    }

    /// Replace the schedule, recompute assignments and re-check immediately
    pub fn set_schedule(&mut self, settings: ScheduleSettings) -> Option<Transition> {
        self.schedule.set_schedule(settings);
        self.recompute();
        self.check_schedule()
    }

    // Students

    /// Student self-service join; refused while the queue is closed
    pub fn join(&mut self, student: NewStudent) -> Result<QueueEntry> {
        if !self.is_open() {
            warn!("Join attempt while queue is closed");
            return Err(DomainError::QueueClosed.into());
        }
        self.add_student(student)
    }

    /// Admin add; bypasses the open/closed gate
    pub fn add_student(&mut self, student: NewStudent) -> Result<QueueEntry> {
        let now = self.time_provider.now_local();
        let entry = self
            .queue
            .add_student(student, self.schedule.settings(), now)
            .inspect_err(|e| warn!(error = %e, "Student rejected"))?;

        if let Some(advisor) = entry.assigned_advisor.clone() {
            self.notifier.notify(Notice::StudentAdded {
                entry_id: entry.id,
                advisor,
            });
        }
        Ok(entry)
    }

    pub fn remove_student(&mut self, id: EntryId) -> Result<QueueEntry> {
        let removed = self.queue.remove(id, self.schedule.settings())?;
        self.notifier
            .notify(Notice::StudentRemoved { entry_id: removed.id });
        Ok(removed)
    }

    pub fn change_advisor(&mut self, entry_id: EntryId, advisor: &AdvisorId) -> Result<()> {
        self.queue
            .change_advisor(entry_id, advisor, self.schedule.settings())?;
        self.notifier.notify(Notice::AdvisorChanged {
            entry_id,
            advisor: advisor.clone(),
        });
        Ok(())
    }

    pub fn clear_queue(&mut self) -> usize {
        self.queue.clear()
    }

    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        self.queue.set_capacity(capacity)?;
        Ok(())
    }

    // Roster

    /// Add an available advisor with a freshly generated id
    pub fn add_advisor(&mut self, name: &str, room: &str) -> Result<AdvisorId> {
        let id = AdvisorId::new(self.id_provider.generate_id());
        let advisor = Advisor::new(id.clone(), name, room)?;
        if self.schedule.add_advisor(advisor)? {
            self.recompute();
        }
        Ok(id)
    }

    /// Remove an advisor; their entries are rebalanced when anyone is available
    pub fn remove_advisor(&mut self, id: &AdvisorId) -> Result<Advisor> {
        let removed = self.schedule.remove_advisor(id)?;
        self.recompute();
        Ok(removed)
    }

    pub fn set_advisor_availability(&mut self, id: &AdvisorId, is_available: bool) -> Result<()> {
        if self.schedule.set_availability(id, is_available)? {
            self.recompute();
        }
        Ok(())
    }

    pub fn set_time_per_student(&mut self, minutes: u32) -> Result<()> {
        if self.schedule.set_time_per_student(minutes)? {
            self.recompute();
        }
        Ok(())
    }

    // Export

    pub fn export_csv(&self) -> CsvExport {
        let now = self.time_provider.now_local();
        let export = CsvExport {
            file_name: export::export_file_name(now),
            contents: export::render_csv(self.queue.entries(), self.schedule.settings()),
        };
        info!(file_name = %export.file_name, rows = self.queue.len(), "Queue exported");
        export
    }

    fn recompute(&mut self) {
        self.queue.recompute(self.schedule.settings());
    }
}

//! Queue Allocator - owns the queue and balances entries across advisors
//!
//! Assignment rule (shared by insertion and bulk recompute):
//! - only available advisors are candidates, in roster order
//! - the candidate with the strictly lowest load wins (first in roster on ties)
//! - estimated wait = load before this entry * minutes per student
//!
//! Bulk recompute runs from scratch in queue order after every change to the
//! entry count, the roster, advisor availability or minutes per student.
//! Manually reassigned entries are pinned and keep their advisor for as long
//! as that advisor stays on the roster and available.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::error::{DomainError, Result};
use crate::domain::{Advisor, AdvisorId, EntryId, NewStudent, QueueEntry, ScheduleSettings};

/// Per-advisor load counters for one allocation pass
struct LoadBoard<'a> {
    loads: Vec<(&'a Advisor, u32)>,
}

impl<'a> LoadBoard<'a> {
    /// `None` when no advisor is available
    fn new(schedule: &'a ScheduleSettings) -> Option<Self> {
        let loads: Vec<_> = schedule
            .available_advisors()
            .into_iter()
            .map(|advisor| (advisor, 0))
            .collect();
        if loads.is_empty() {
            None
        } else {
            Some(Self { loads })
        }
    }

    /// Count an existing assignment (ignored for advisors not on the board)
    fn seed(&mut self, advisor: &AdvisorId) {
        if let Some(slot) = self.loads.iter_mut().find(|(a, _)| &a.id == advisor) {
            slot.1 += 1;
        }
    }

    /// Take the least-loaded advisor; returns it with its load before this claim
    fn claim_lowest(&mut self) -> (&'a Advisor, u32) {
        let mut best = 0;
        for (index, (_, load)) in self.loads.iter().enumerate() {
            if *load < self.loads[best].1 {
                best = index;
            }
        }
        let slot = &mut self.loads[best];
        let load = slot.1;
        slot.1 += 1;
        (slot.0, load)
    }

    /// Take a specific advisor; `None` if it is not available
    fn claim(&mut self, advisor: &AdvisorId) -> Option<u32> {
        let slot = self.loads.iter_mut().find(|(a, _)| &a.id == advisor)?;
        let load = slot.1;
        slot.1 += 1;
        Some(load)
    }
}

/// Ordered queue of entries with capacity and advisor assignment
#[derive(Debug, Clone)]
pub struct QueueAllocator {
    entries: Vec<QueueEntry>,
    capacity: usize,
    last_id: EntryId,
    last_position: u64,
}

impl QueueAllocator {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DomainError::InvalidCapacity);
        }
        Ok(Self {
            entries: Vec::new(),
            capacity,
            last_id: 0,
            last_position: 0,
        })
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Change the maximum queue size
    ///
    /// Shrinking below the current length keeps every entry; it only blocks
    /// new joins until the queue drains.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(DomainError::InvalidCapacity);
        }
        info!(from = self.capacity, to = capacity, "Queue capacity changed");
        self.capacity = capacity;
        Ok(())
    }

    /// Add a student at the back of the queue
    ///
    /// Checks, in order: required fields, student number, capacity, advisor
    /// availability. On any failure nothing is mutated.
    pub fn add_student(
        &mut self,
        student: NewStudent,
        schedule: &ScheduleSettings,
        now: NaiveDateTime,
    ) -> Result<QueueEntry> {
        let student = student.validate()?;

        if self.is_full() {
            return Err(DomainError::QueueFull {
                capacity: self.capacity,
            });
        }

        let mut board = LoadBoard::new(schedule).ok_or(DomainError::NoAdvisorsAvailable)?;
        for advisor in self.entries.iter().filter_map(|e| e.assigned_advisor.as_ref()) {
            board.seed(advisor);
        }
        let (advisor, load) = board.claim_lowest();

        let id = self.next_id();
        let position = self.next_position();
        let mut entry = QueueEntry::new(id, position, now, student);
        entry.assigned_advisor = Some(advisor.id.clone());
        entry.estimated_wait_time = Some(load.saturating_mul(schedule.time_per_student()));

        info!(
            entry_id = id,
            position = position,
            advisor = %advisor.name,
            estimated_wait = ?entry.estimated_wait_time,
            "Student added to queue"
        );

        self.last_id = id;
        self.last_position = position;
        self.entries.push(entry);

        // Entry count changed
        self.recompute(schedule);

        Ok(self.entries[self.entries.len() - 1].clone())
    }

    /// Remove an entry; positions of the others are not renumbered
    pub fn remove(&mut self, id: EntryId, schedule: &ScheduleSettings) -> Result<QueueEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(DomainError::EntryNotFound(id))?;
        let removed = self.entries.remove(index);

        info!(entry_id = id, remaining = self.entries.len(), "Student removed from queue");

        self.recompute(schedule);
        Ok(removed)
    }

    /// Remove every entry; ids and positions keep counting from where they were
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        info!(removed = removed, "Queue cleared");
        removed
    }

    /// Manually reassign one entry
    ///
    /// Reassigning an entry to the advisor it already has is allowed even when
    /// that advisor is unavailable, and changes nothing. Any other successful
    /// reassignment pins the entry and is followed by a bulk recompute.
    pub fn change_advisor(
        &mut self,
        entry_id: EntryId,
        advisor_id: &AdvisorId,
        schedule: &ScheduleSettings,
    ) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(DomainError::EntryNotFound(entry_id))?;
        let advisor = schedule
            .advisor(advisor_id)
            .ok_or_else(|| DomainError::AdvisorNotFound(advisor_id.to_string()))?;

        let already_assigned = self.entries[index].is_assigned_to(advisor_id);
        if !advisor.is_available {
            if already_assigned {
                debug!(entry_id = entry_id, advisor = %advisor.name, "Reassignment to current advisor, nothing to do");
                return Ok(());
            }
            return Err(DomainError::AdvisorUnavailable(advisor.name.clone()));
        }

        let entry = &mut self.entries[index];
        entry.assigned_advisor = Some(advisor_id.clone());
        entry.pinned = true;

        info!(entry_id = entry_id, advisor = %advisor.name, "Student manually reassigned");

        self.recompute(schedule);
        Ok(())
    }

    /// Reassign every entry from scratch in queue order
    ///
    /// No-op (existing assignments retained) when no advisor is available.
    /// Returns whether a pass ran.
    pub fn recompute(&mut self, schedule: &ScheduleSettings) -> bool {
        let Some(mut board) = LoadBoard::new(schedule) else {
            debug!(
                entries = self.entries.len(),
                "No available advisors, keeping existing assignments"
            );
            return false;
        };
        let minutes = schedule.time_per_student();

        for entry in &mut self.entries {
            if entry.pinned {
                let pinned_load = entry
                    .assigned_advisor
                    .as_ref()
                    .and_then(|advisor| board.claim(advisor));
                if let Some(load) = pinned_load {
                    entry.estimated_wait_time = Some(load.saturating_mul(minutes));
                    continue;
                }
                debug!(entry_id = entry.id, "Pinned advisor gone or unavailable, releasing pin");
                entry.pinned = false;
            }

            let (advisor, load) = board.claim_lowest();
            entry.assigned_advisor = Some(advisor.id.clone());
            entry.estimated_wait_time = Some(load.saturating_mul(minutes));
        }

        debug!(entries = self.entries.len(), "Queue assignments recomputed");
        true
    }

    fn next_id(&self) -> EntryId {
        let max_live = self.entries.iter().map(|e| e.id).max().unwrap_or(0);
        max_live.max(self.last_id) + 1
    }

    fn next_position(&self) -> u64 {
        let max_live = self.entries.iter().map(|e| e.position).max().unwrap_or(0);
        max_live.max(self.last_position) + 1
    }
}

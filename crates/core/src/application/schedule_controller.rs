//! Schedule Controller - derives whether the queue is open from the wall clock
//!
//! The queue is open when the current day matches the configured day and the
//! current minute lies in `[start, end]`. A manual toggle overrides the
//! schedule until the next boundary crossing, i.e. until the window-derived
//! state changes between two checks.

use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::error::Result;
use crate::domain::{Advisor, AdvisorId, ScheduleSettings};
use crate::port::{Notice, Notifier};

/// Open/closed state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed,
}

impl Transition {
    fn to(is_open: bool) -> Self {
        if is_open {
            Transition::Opened
        } else {
            Transition::Closed
        }
    }

    fn notice(self, manual: bool) -> Notice {
        match self {
            Transition::Opened => Notice::QueueOpened { manual },
            Transition::Closed => Notice::QueueClosed { manual },
        }
    }
}

/// Owns the schedule settings and the `is_open` flag
pub struct ScheduleController {
    settings: ScheduleSettings,
    is_open: bool,
    /// Window-derived state at the last check (`None` until the first check
    /// and after the schedule is replaced)
    window_state: Option<bool>,
    manual_override: bool,
    notifier: Arc<dyn Notifier>,
}

impl ScheduleController {
    /// Create a controller; the queue starts open until the first check
    pub fn new(settings: ScheduleSettings, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings,
            is_open: true,
            window_state: None,
            manual_override: false,
            notifier,
        }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn has_manual_override(&self) -> bool {
        self.manual_override
    }

    /// Re-evaluate `is_open` against the schedule window
    ///
    /// Returns the transition if the state changed. While a manual override
    /// is active nothing changes until the window state flips.
    pub fn check_schedule(&mut self, now: NaiveDateTime) -> Option<Transition> {
        let target = self.settings.window_contains(now);
        let previous = self.window_state.replace(target);

        if self.manual_override {
            // Without an earlier observation there is nothing to cross
            let crossed = previous.is_some_and(|was_open| was_open != target);
            if !crossed {
                debug!(is_open = self.is_open, "Manual override active, schedule check skipped");
                return None;
            }
            info!(window_open = target, "Schedule boundary crossed, manual override cleared");
            self.manual_override = false;
        }

        if self.is_open == target {
            return None;
        }

        self.is_open = target;
        let transition = Transition::to(target);
        info!(
            transition = ?transition,
            now = %now,
            schedule = %self.settings.summary(),
            "Queue state changed by schedule"
        );
        self.notifier.notify(transition.notice(false));
        Some(transition)
    }

    /// Replace the schedule wholesale
    ///
    /// Drops any manual override. `is_open` is not re-evaluated here; the
    /// next check applies the new window.
    pub fn set_schedule(&mut self, settings: ScheduleSettings) {
        info!(schedule = %settings.summary(), advisors = settings.advisors().len(), "Schedule replaced");
        self.settings = settings;
        self.window_state = None;
        self.manual_override = false;
    }

    /// Admin override: flip `is_open` regardless of the schedule
    pub fn toggle_open(&mut self) -> Transition {
        self.is_open = !self.is_open;
        self.manual_override = true;

        let transition = Transition::to(self.is_open);
        info!(transition = ?transition, "Queue state toggled manually");
        self.notifier.notify(transition.notice(true));
        transition
    }

    // Roster edits. Each returns whether queue assignments must be recomputed.

    pub fn add_advisor(&mut self, advisor: Advisor) -> Result<bool> {
        let available = advisor.is_available;
        info!(advisor_id = %advisor.id, name = %advisor.name, "Advisor added");
        self.settings.add_advisor(advisor)?;
        Ok(available)
    }

    pub fn remove_advisor(&mut self, id: &AdvisorId) -> Result<Advisor> {
        let removed = self.settings.remove_advisor(id)?;
        info!(advisor_id = %removed.id, name = %removed.name, "Advisor removed");
        Ok(removed)
    }

    pub fn set_availability(&mut self, id: &AdvisorId, is_available: bool) -> Result<bool> {
        let changed = self.settings.set_availability(id, is_available)?;
        if changed {
            info!(advisor_id = %id, is_available = is_available, "Advisor availability changed");
        }
        Ok(changed)
    }

    pub fn set_time_per_student(&mut self, minutes: u32) -> Result<bool> {
        let changed = self.settings.set_time_per_student(minutes)?;
        if changed {
            info!(minutes = minutes, "Time per student changed");
        }
        Ok(changed)
    }
}

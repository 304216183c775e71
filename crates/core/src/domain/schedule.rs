// Schedule Domain Model

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::advisor::{Advisor, AdvisorId};
use crate::domain::error::{DomainError, Result};

/// Wall-clock format used for schedule boundaries (24-hour, minute granularity)
pub const TIME_FORMAT: &str = "%H:%M";

/// Day the queue operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(DayOfWeek::Monday),
            "tuesday" => Ok(DayOfWeek::Tuesday),
            "wednesday" => Ok(DayOfWeek::Wednesday),
            "thursday" => Ok(DayOfWeek::Thursday),
            "friday" => Ok(DayOfWeek::Friday),
            "saturday" => Ok(DayOfWeek::Saturday),
            "sunday" => Ok(DayOfWeek::Sunday),
            other => Err(DomainError::InvalidSchedule(format!(
                "unknown day of week: {other}"
            ))),
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Parse an `HH:MM` wall-clock time
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::InvalidSchedule(format!("invalid time (expected HH:MM): {s}")))
}

/// Operating schedule and advisor roster
///
/// Invariants (checked on construction and on every edit):
/// - `start < end`, both on the same day
/// - `time_per_student > 0` (minutes)
/// - advisor ids are unique, roster keeps insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSettings {
    day: DayOfWeek,
    start: NaiveTime,
    end: NaiveTime,
    time_per_student: u32,
    advisors: Vec<Advisor>,
}

impl ScheduleSettings {
    pub fn new(
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
        time_per_student: u32,
        advisors: Vec<Advisor>,
    ) -> Result<Self> {
        if start >= end {
            return Err(DomainError::InvalidSchedule(format!(
                "start {} must be before end {}",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            )));
        }
        if time_per_student == 0 {
            return Err(DomainError::InvalidSchedule(
                "time per student must be at least 1 minute".to_string(),
            ));
        }

        let mut settings = Self {
            day,
            start: truncate_to_minute(start),
            end: truncate_to_minute(end),
            time_per_student,
            advisors: Vec::with_capacity(advisors.len()),
        };
        for advisor in advisors {
            settings.add_advisor(advisor)?;
        }
        Ok(settings)
    }

    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn time_per_student(&self) -> u32 {
        self.time_per_student
    }

    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    /// Available advisors in roster order
    pub fn available_advisors(&self) -> Vec<&Advisor> {
        self.advisors.iter().filter(|a| a.is_available).collect()
    }

    pub fn advisor(&self, id: &AdvisorId) -> Option<&Advisor> {
        self.advisors.iter().find(|a| &a.id == id)
    }

    /// Whether `now` falls inside the operating window
    ///
    /// Day must match; time-of-day is compared at minute granularity
    /// against `[start, end]` inclusive.
    pub fn window_contains(&self, now: NaiveDateTime) -> bool {
        if DayOfWeek::from(now.weekday()) != self.day {
            return false;
        }
        let time = truncate_to_minute(now.time());
        time >= self.start && time <= self.end
    }

    /// Human-readable schedule line, e.g. `Mondays, 09:00 - 17:00`
    pub fn summary(&self) -> String {
        format!(
            "{}s, {} - {}",
            self.day,
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }

    pub fn add_advisor(&mut self, advisor: Advisor) -> Result<()> {
        if self.advisor(&advisor.id).is_some() {
            return Err(DomainError::DuplicateAdvisor(advisor.id.to_string()));
        }
        self.advisors.push(advisor);
        Ok(())
    }

    pub fn remove_advisor(&mut self, id: &AdvisorId) -> Result<Advisor> {
        let index = self
            .advisors
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| DomainError::AdvisorNotFound(id.to_string()))?;
        Ok(self.advisors.remove(index))
    }

    /// Set an advisor's availability; returns whether anything changed
    pub fn set_availability(&mut self, id: &AdvisorId, is_available: bool) -> Result<bool> {
        let advisor = self
            .advisors
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| DomainError::AdvisorNotFound(id.to_string()))?;
        let changed = advisor.is_available != is_available;
        advisor.is_available = is_available;
        Ok(changed)
    }

    /// Set minutes per student; returns whether anything changed
    pub fn set_time_per_student(&mut self, minutes: u32) -> Result<bool> {
        if minutes == 0 {
            return Err(DomainError::InvalidSchedule(
                "time per student must be at least 1 minute".to_string(),
            ));
        }
        let changed = self.time_per_student != minutes;
        self.time_per_student = minutes;
        Ok(changed)
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

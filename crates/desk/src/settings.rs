//! Desk configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `QUEUE_DESK__*` environment variables
//! (e.g. `QUEUE_DESK__SCHEDULE__DAY=Tuesday`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use advising_queue_core::application::DEFAULT_TICK_INTERVAL;
use advising_queue_core::domain::schedule::parse_time;
use advising_queue_core::domain::{Advisor, AdvisorId, DayOfWeek, ScheduleSettings};
use advising_queue_core::port::IdProvider;

const ENV_PREFIX: &str = "QUEUE_DESK";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeskSettings {
    pub capacity: usize,
    pub tick_interval_secs: u64,
    pub export_dir: String,
    pub schedule: ScheduleSection,
    pub advisors: Vec<AdvisorSection>,
    pub admin: AdminSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub day: String,
    pub start: String,
    pub end: String,
    pub time_per_student: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorSection {
    pub name: String,
    #[serde(default)]
    pub room: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Admin login; empty username disables admin commands
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    pub username: String,
    pub password: String,
}

fn default_available() -> bool {
    true
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            capacity: 10,
            tick_interval_secs: DEFAULT_TICK_INTERVAL.as_secs(),
            export_dir: ".".to_string(),
            schedule: ScheduleSection::default(),
            advisors: Vec::new(),
            admin: AdminSection::default(),
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            day: "Monday".to_string(),
            start: "09:00".to_string(),
            end: "17:00".to_string(),
            time_per_student: 15,
        }
    }
}

impl DeskSettings {
    /// Load settings; a missing file is not an error
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize::<DeskSettings>()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export_dir).into_owned())
    }

    /// Build the validated schedule, generating an id for each advisor
    pub fn schedule_settings(&self, ids: &dyn IdProvider) -> Result<ScheduleSettings> {
        let day: DayOfWeek = self.schedule.day.parse()?;
        let start = parse_time(&self.schedule.start)?;
        let end = parse_time(&self.schedule.end)?;

        let advisors = self
            .advisors
            .iter()
            .map(|a| {
                Advisor::new(AdvisorId::new(ids.generate_id()), &a.name, &a.room)
                    .map(|advisor| advisor.with_availability(a.available))
                    .with_context(|| format!("Invalid advisor entry: {:?}", a.name))
            })
            .collect::<Result<Vec<_>>>()?;

        let settings =
            ScheduleSettings::new(day, start, end, self.schedule.time_per_student, advisors)?;
        Ok(settings)
    }
}

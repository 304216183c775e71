// CSV export of the current queue

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::domain::{QueueEntry, ScheduleSettings};
use crate::error::Result;

/// Column headers, in output order
pub const CSV_HEADER: [&str; 7] = [
    "Student Number",
    "Name",
    "Reason",
    "Position",
    "Joined At",
    "Estimated Wait Time (minutes)",
    "Assigned Advisor",
];

/// Label for entries whose advisor was removed from the roster
pub const REMOVED_ADVISOR: &str = "(removed)";

/// en-US locale style, e.g. `10/19/2026, 9:05:00 AM`
const JOINED_AT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Rendered export, ready to be written or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
}

impl CsvExport {
    /// Write into `dir` under `file_name`, replacing any earlier export of the same day
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.contents).await?;
        Ok(path)
    }
}

/// Render the queue as CSV
///
/// First line is the `sep=,` hint for spreadsheet apps, then the header and
/// one row per entry. Every field is double-quoted.
pub fn render_csv(entries: &[QueueEntry], schedule: &ScheduleSettings) -> String {
    let mut out = String::from("sep=,\n");
    push_row(&mut out, CSV_HEADER.iter().copied());

    for entry in entries {
        let position = entry.position.to_string();
        let joined_at = entry.joined_at.format(JOINED_AT_FORMAT).to_string();
        let wait = entry
            .estimated_wait_time
            .map(|m| m.to_string())
            .unwrap_or_default();
        let advisor = match &entry.assigned_advisor {
            Some(id) => schedule
                .advisor(id)
                .map(|a| a.name.as_str())
                .unwrap_or(REMOVED_ADVISOR),
            None => "",
        };

        push_row(
            &mut out,
            [
                entry.student_number.as_str(),
                entry.name.as_str(),
                entry.reason.as_str(),
                position.as_str(),
                joined_at.as_str(),
                wait.as_str(),
                advisor,
            ],
        );
    }
    out
}

/// e.g. `queue-export-Monday-October-19-2026.csv`
pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("queue-export-{}.csv", now.format("%A-%B-%-d-%Y"))
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let row: Vec<String> = fields
        .into_iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

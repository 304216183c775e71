// Console rendering (tables and status lines)

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use advising_queue_core::application::export::REMOVED_ADVISOR;
use advising_queue_core::application::{QueueDesk, QueueStats};
use advising_queue_core::domain::{QueueEntry, ScheduleSettings};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Pos")]
    position: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Student #")]
    student_number: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Joined")]
    joined_at: String,
    #[tabled(rename = "Wait (min)")]
    wait: String,
    #[tabled(rename = "Advisor")]
    advisor: String,
}

#[derive(Tabled)]
struct AdvisorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Available")]
    available: String,
}

fn advisor_label(desk: &QueueDesk, entry: &QueueEntry) -> String {
    let Some(id) = &entry.assigned_advisor else {
        return String::new();
    };
    let name = desk.advisor_name(id).unwrap_or(REMOVED_ADVISOR);
    if entry.pinned {
        format!("{name} *")
    } else {
        name.to_string()
    }
}

pub fn queue_table(desk: &QueueDesk) -> String {
    if desk.entries().is_empty() {
        return "Queue is empty".dimmed().to_string();
    }

    let rows: Vec<EntryRow> = desk
        .entries()
        .iter()
        .map(|entry| EntryRow {
            id: entry.id,
            position: entry.position,
            name: entry.name.clone(),
            student_number: entry.student_number.to_string(),
            reason: entry.reason.clone(),
            joined_at: entry.joined_at.format("%H:%M").to_string(),
            wait: entry
                .estimated_wait_time
                .map(|m| m.to_string())
                .unwrap_or_default(),
            advisor: advisor_label(desk, entry),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn advisor_table(schedule: &ScheduleSettings) -> String {
    if schedule.advisors().is_empty() {
        return "No advisors configured".dimmed().to_string();
    }

    let rows: Vec<AdvisorRow> = schedule
        .advisors()
        .iter()
        .map(|a| AdvisorRow {
            id: a.id.to_string(),
            name: a.name.clone(),
            room: a.room.clone(),
            available: if a.is_available {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats(stats: &QueueStats) -> String {
    let status = if stats.is_open {
        "Open".green().bold()
    } else {
        "Closed".red().bold()
    };
    format!(
        "Status: {status}\nQueue Capacity: {} / {}\nSchedule: {}\nTime per student: {} min\nAvailable Advisors: {}",
        stats.len, stats.capacity, stats.schedule, stats.time_per_student, stats.available_advisors
    )
}

pub fn joined(desk: &QueueDesk, entry: &QueueEntry) -> String {
    let room = entry
        .assigned_advisor
        .as_ref()
        .and_then(|id| desk.schedule().advisor(id))
        .map(|a| a.room.as_str())
        .filter(|room| !room.is_empty());

    let mut line = format!(
        "{} {} is #{} in line with {}",
        "Joined:".green().bold(),
        entry.name,
        entry.position,
        advisor_label(desk, entry)
    );
    if let Some(room) = room {
        line.push_str(&format!(" ({room})"));
    }
    if let Some(wait) = entry.estimated_wait_time {
        line.push_str(&format!(", estimated wait {wait} min"));
    }
    line
}

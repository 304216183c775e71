//! Desk edge cases
//!
//! Admin operations, roster churn, CSV export and the background ticker.

use std::sync::Arc;
use std::time::Duration;

use advising_queue_core::application::{shutdown_channel, QueueDesk, ScheduleTicker};
use advising_queue_core::domain::schedule::parse_time;
use advising_queue_core::domain::{AdvisorId, DayOfWeek, DomainError, NewStudent, ScheduleSettings};
use advising_queue_core::port::{ManualTimeProvider, SequentialIdProvider, TracingNotifier};
use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::Mutex;

fn monday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn desk_at(now: NaiveDateTime, capacity: usize) -> (QueueDesk, Arc<ManualTimeProvider>) {
    let clock = Arc::new(ManualTimeProvider::new(now));
    let settings = ScheduleSettings::new(
        DayOfWeek::Monday,
        parse_time("09:00").unwrap(),
        parse_time("17:00").unwrap(),
        15,
        vec![],
    )
    .unwrap();
    let desk = QueueDesk::new(
        settings,
        capacity,
        clock.clone(),
        Arc::new(SequentialIdProvider::default()),
        Arc::new(TracingNotifier),
    )
    .unwrap();
    (desk, clock)
}

fn student(n: usize) -> NewStudent {
    NewStudent::new(format!("Student {n}"), format!("{:010}", n), "Advising")
}

fn domain_err<T: std::fmt::Debug>(result: advising_queue_core::Result<T>) -> DomainError {
    result
        .unwrap_err()
        .as_domain()
        .cloned()
        .expect("expected a domain error")
}

/// Closed queue: students are refused, the admin can still add
#[test]
fn test_closed_queue_admin_bypass() {
    let (mut desk, _) = desk_at(monday(18, 0), 5);
    desk.add_advisor("Ana", "101").unwrap();
    assert!(!desk.can_join());

    assert_eq!(domain_err(desk.join(student(1))), DomainError::QueueClosed);
    let entry = desk.add_student(student(1)).unwrap();
    assert_eq!((entry.id, entry.position), (1, 1));
}

/// Admin add still honours capacity and advisor availability
#[test]
fn test_admin_add_is_still_validated() {
    let (mut desk, _) = desk_at(monday(18, 0), 1);
    assert_eq!(domain_err(desk.add_student(student(1))), DomainError::NoAdvisorsAvailable);

    desk.add_advisor("Ana", "101").unwrap();
    desk.add_student(student(1)).unwrap();
    assert_eq!(
        domain_err(desk.add_student(student(2))),
        DomainError::QueueFull { capacity: 1 }
    );
}

/// Removing an advisor moves their students to whoever is left
#[test]
fn test_advisor_removal_rebalances() {
    let (mut desk, _) = desk_at(monday(10, 0), 10);
    let ana = desk.add_advisor("Ana", "101").unwrap();
    let ben = desk.add_advisor("Ben", "102").unwrap();
    let cy = desk.add_advisor("Cy", "103").unwrap();
    for n in 0..6 {
        desk.join(student(n)).unwrap();
    }

    desk.remove_advisor(&ben).unwrap();

    let assigned: Vec<AdvisorId> = desk
        .entries()
        .iter()
        .map(|e| e.assigned_advisor.clone().unwrap())
        .collect();
    assert_eq!(
        assigned,
        vec![ana.clone(), cy.clone(), ana.clone(), cy.clone(), ana.clone(), cy.clone()]
    );
    let waits: Vec<_> = desk.entries().iter().map(|e| e.estimated_wait_time).collect();
    assert_eq!(
        waits,
        vec![Some(0), Some(0), Some(15), Some(15), Some(30), Some(30)]
    );
}

/// Last advisor removed: entries keep the stale id and export as "(removed)"
#[test]
fn test_removed_advisor_without_replacement() {
    let (mut desk, _) = desk_at(monday(10, 0), 10);
    let ana = desk.add_advisor("Ana", "101").unwrap();
    desk.join(student(1)).unwrap();

    desk.remove_advisor(&ana).unwrap();
    assert_eq!(desk.entries()[0].assigned_advisor, Some(ana.clone()));
    assert_eq!(desk.advisor_name(&ana), None);

    let csv = desk.export_csv().contents;
    assert!(csv.lines().nth(2).unwrap().ends_with("\"(removed)\""));

    assert_eq!(
        domain_err(desk.remove_advisor(&ana)),
        DomainError::AdvisorNotFound(ana.to_string())
    );
}

/// Reassignment errors: unknown entry, unknown advisor, unavailable advisor
#[test]
fn test_change_advisor_errors() {
    let (mut desk, _) = desk_at(monday(10, 0), 10);
    let ana = desk.add_advisor("Ana", "101").unwrap();
    let ben = desk.add_advisor("Ben", "102").unwrap();
    desk.join(student(1)).unwrap();

    assert_eq!(domain_err(desk.change_advisor(42, &ana)), DomainError::EntryNotFound(42));

    let ghost = AdvisorId::new("ghost");
    assert_eq!(
        domain_err(desk.change_advisor(1, &ghost)),
        DomainError::AdvisorNotFound("ghost".to_string())
    );

    desk.set_advisor_availability(&ben, false).unwrap();
    assert_eq!(
        domain_err(desk.change_advisor(1, &ben)),
        DomainError::AdvisorUnavailable("Ben".to_string())
    );
    assert_eq!(desk.entries()[0].assigned_advisor, Some(ana));
}

/// Shrinking capacity below the current size keeps everyone but blocks joins
#[test]
fn test_capacity_shrink() {
    let (mut desk, _) = desk_at(monday(10, 0), 5);
    desk.add_advisor("Ana", "101").unwrap();
    for n in 0..3 {
        desk.join(student(n)).unwrap();
    }

    desk.set_capacity(2).unwrap();
    assert_eq!(desk.entries().len(), 3);
    assert!(!desk.can_join());
    assert_eq!(
        domain_err(desk.join(student(9))),
        DomainError::QueueFull { capacity: 2 }
    );

    assert_eq!(domain_err(desk.set_capacity(0)), DomainError::InvalidCapacity);
}

/// Clearing empties the queue without resetting the id sequence
#[test]
fn test_clear_queue() {
    let (mut desk, _) = desk_at(monday(10, 0), 5);
    desk.add_advisor("Ana", "101").unwrap();
    desk.join(student(1)).unwrap();
    desk.join(student(2)).unwrap();

    assert_eq!(desk.clear_queue(), 2);
    assert!(desk.entries().is_empty());
    assert_eq!(desk.clear_queue(), 0);

    let next = desk.join(student(3)).unwrap();
    assert_eq!((next.id, next.position), (3, 3));
    assert_eq!(next.estimated_wait_time, Some(0));
}

/// Export of an empty queue is the separator hint plus the header
#[test]
fn test_export_empty_queue() {
    let (desk, _) = desk_at(monday(10, 0), 5);
    let export = desk.export_csv();

    assert_eq!(export.file_name, "queue-export-Monday-October-19-2026.csv");
    let lines: Vec<_> = export.contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "sep=,");
    assert!(lines[1].starts_with("\"Student Number\",\"Name\""));
}

/// Export rows follow queue order with live advisor names
#[test]
fn test_export_rows() {
    let (mut desk, clock) = desk_at(monday(9, 5), 5);
    desk.add_advisor("Ana Diaz", "101").unwrap();
    desk.join(NewStudent::new("Jane \"JD\" Doe", "1234567890", "Course plan"))
        .unwrap();
    clock.set(monday(13, 30));
    desk.join(NewStudent::new("John Roe", "0987654321", "Transfer"))
        .unwrap();

    let export = desk.export_csv();
    let rows: Vec<_> = export.contents.lines().skip(2).collect();
    assert_eq!(
        rows,
        vec![
            "\"1234567890\",\"Jane \"\"JD\"\" Doe\",\"Course plan\",\"1\",\"10/19/2026, 9:05:00 AM\",\"0\",\"Ana Diaz\"",
            "\"0987654321\",\"John Roe\",\"Transfer\",\"2\",\"10/19/2026, 1:30:00 PM\",\"15\",\"Ana Diaz\"",
        ]
    );
}

/// The ticker applies schedule changes in the background and stops on shutdown
#[tokio::test]
async fn test_ticker_follows_clock() {
    let (desk, clock) = desk_at(monday(16, 59), 5);
    let desk = Arc::new(Mutex::new(desk));
    assert!(desk.lock().await.is_open());

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let handle = tokio::spawn(ScheduleTicker::new(desk.clone(), Duration::from_millis(10)).run(shutdown_rx));

    clock.set(monday(17, 1));
    let mut closed = false;
    for _ in 0..200 {
        if !desk.lock().await.is_open() {
            closed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(closed, "ticker should close the queue after 17:00");

    shutdown_tx.shutdown();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("ticker should stop")
        .expect("ticker task should not panic");
}

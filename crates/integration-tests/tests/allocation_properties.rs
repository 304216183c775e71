//! Allocation properties of the queue desk
//!
//! Exercises id/position monotonicity, capacity and availability gating,
//! round-robin balancing and wait estimates through the public API.

use std::sync::Arc;

use advising_queue_core::application::QueueDesk;
use advising_queue_core::domain::schedule::parse_time;
use advising_queue_core::domain::{AdvisorId, DayOfWeek, DomainError, NewStudent, ScheduleSettings};
use advising_queue_core::port::{ManualTimeProvider, SequentialIdProvider, TracingNotifier};
use chrono::{NaiveDate, NaiveDateTime};

fn monday_ten() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn desk(capacity: usize, minutes: u32) -> QueueDesk {
    let settings = ScheduleSettings::new(
        DayOfWeek::Monday,
        parse_time("09:00").unwrap(),
        parse_time("17:00").unwrap(),
        minutes,
        vec![],
    )
    .unwrap();
    QueueDesk::new(
        settings,
        capacity,
        Arc::new(ManualTimeProvider::new(monday_ten())),
        Arc::new(SequentialIdProvider::default()),
        Arc::new(TracingNotifier),
    )
    .unwrap()
}

fn student(n: usize) -> NewStudent {
    NewStudent::new(format!("Student {n}"), format!("{:010}", n), "Advising")
}

fn domain_err(result: advising_queue_core::Result<impl std::fmt::Debug>) -> DomainError {
    result
        .unwrap_err()
        .as_domain()
        .cloned()
        .expect("expected a domain error")
}

/// Ids and positions are unique and strictly increasing across adds
#[test]
fn test_ids_and_positions_strictly_increase() {
    let mut desk = desk(50, 10);
    desk.add_advisor("Ana", "101").unwrap();
    desk.add_advisor("Ben", "102").unwrap();

    for n in 0..20 {
        desk.join(student(n)).unwrap();
        if n % 3 == 2 {
            let first = desk.entries()[0].id;
            desk.remove_student(first).unwrap();
        }
    }

    let entries = desk.entries();
    for pair in entries.windows(2) {
        assert!(pair[0].id < pair[1].id);
        assert!(pair[0].position < pair[1].position);
    }
    assert_eq!(entries.last().unwrap().id, 20);
    assert_eq!(entries.last().unwrap().position, 20);
}

/// Capacity = 1: second join is rejected and the queue stays at one entry
#[test]
fn test_capacity_one_scenario() {
    let mut desk = desk(1, 10);
    desk.add_advisor("Ana", "101").unwrap();

    desk.join(NewStudent::new("Jane Doe", "1234567890", "Advising"))
        .unwrap();
    let err = domain_err(desk.join(NewStudent::new("John Roe", "0987654321", "Advising")));

    assert_eq!(err, DomainError::QueueFull { capacity: 1 });
    assert_eq!(desk.entries().len(), 1);
}

/// Full queue is reported even when nobody is available
#[test]
fn test_full_queue_wins_over_no_advisors() {
    let mut desk = desk(1, 10);
    let ana = desk.add_advisor("Ana", "101").unwrap();
    desk.join(student(1)).unwrap();
    desk.set_advisor_availability(&ana, false).unwrap();

    assert_eq!(
        domain_err(desk.join(student(2))),
        DomainError::QueueFull { capacity: 1 }
    );
}

/// No available advisor: rejected, nothing mutated
#[test]
fn test_no_available_advisors_rejected() {
    let mut desk = desk(5, 10);
    let ana = desk.add_advisor("Ana", "101").unwrap();
    desk.set_advisor_availability(&ana, false).unwrap();

    assert_eq!(domain_err(desk.join(student(1))), DomainError::NoAdvisorsAvailable);
    assert!(desk.entries().is_empty());

    // The rejected attempt did not consume an id
    desk.set_advisor_availability(&ana, true).unwrap();
    assert_eq!(desk.join(student(2)).unwrap().id, 1);
}

/// Equal loads: entry i goes to advisor i mod N, wait = load * minutes
#[test]
fn test_round_robin_and_wait_estimates() {
    let mut desk = desk(50, 12);
    let roster: Vec<AdvisorId> = ["Ana", "Ben", "Cy", "Di"]
        .iter()
        .map(|name| desk.add_advisor(name, "").unwrap())
        .collect();

    for n in 0..11 {
        desk.join(student(n)).unwrap();
    }

    for (i, entry) in desk.entries().iter().enumerate() {
        assert_eq!(entry.assigned_advisor.as_ref(), Some(&roster[i % roster.len()]));
        let load = (i / roster.len()) as u32;
        assert_eq!(entry.estimated_wait_time, Some(load * 12));
    }
}

/// Removing an entry never touches other ids/positions; ids are not reused
#[test]
fn test_remove_keeps_identity_of_others() {
    let mut desk = desk(10, 10);
    desk.add_advisor("Ana", "101").unwrap();
    for n in 0..4 {
        desk.join(student(n)).unwrap();
    }

    let before: Vec<_> = desk
        .entries()
        .iter()
        .filter(|e| e.id != 2)
        .map(|e| (e.id, e.position))
        .collect();
    desk.remove_student(2).unwrap();
    let after: Vec<_> = desk.entries().iter().map(|e| (e.id, e.position)).collect();
    assert_eq!(before, after);

    desk.remove_student(4).unwrap();
    let next = desk.join(student(9)).unwrap();
    assert_eq!((next.id, next.position), (5, 5));

    assert_eq!(domain_err(desk.remove_student(2)), DomainError::EntryNotFound(2));
}

/// B unavailable, then made available: the availability change rebalances the queue
#[test]
fn test_second_advisor_becoming_available() {
    let mut desk = desk(10, 10);
    let a = desk.add_advisor("A", "101").unwrap();
    let b = desk.add_advisor("B", "102").unwrap();
    desk.set_advisor_availability(&b, false).unwrap();

    desk.join(student(1)).unwrap();
    desk.join(student(2)).unwrap();
    assert!(desk.entries().iter().all(|e| e.is_assigned_to(&a)));

    desk.set_advisor_availability(&b, true).unwrap();
    let third = desk.join(student(3)).unwrap();

    // Availability change rebalanced the first two (A, B); the third goes to A
    assert_eq!(third.assigned_advisor, Some(a.clone()));
    assert_eq!(third.estimated_wait_time, Some(10));
    assert_eq!(desk.entries()[1].assigned_advisor, Some(b));
}

/// Manual reassignment survives later recomputes
#[test]
fn test_manual_reassignment_is_sticky() {
    let mut desk = desk(10, 10);
    let a = desk.add_advisor("A", "101").unwrap();
    let b = desk.add_advisor("B", "102").unwrap();
    for n in 0..4 {
        desk.join(student(n)).unwrap();
    }

    desk.change_advisor(3, &b).unwrap();
    desk.set_time_per_student(20).unwrap();
    desk.join(student(9)).unwrap();

    let entry = desk.entries().iter().find(|e| e.id == 3).unwrap();
    assert_eq!(entry.assigned_advisor, Some(b.clone()));
    assert!(entry.pinned);

    let on_a = desk.entries().iter().filter(|e| e.is_assigned_to(&a)).count();
    let on_b = desk.entries().iter().filter(|e| e.is_assigned_to(&b)).count();
    // [A, B, B*, A] then the new entry breaks the 2/2 tie toward A
    assert_eq!((on_a, on_b), (3, 2));
}

/// Validation failures are reported distinctly
#[test]
fn test_validation_failures() {
    let mut desk = desk(10, 10);
    desk.add_advisor("A", "101").unwrap();

    assert_eq!(
        domain_err(desk.join(NewStudent::new("", "1234567890", "x"))),
        DomainError::MissingFields
    );
    assert_eq!(
        domain_err(desk.join(NewStudent::new("Jane", "12345", "x"))),
        DomainError::InvalidStudentNumber
    );
    assert!(desk.entries().is_empty());
}

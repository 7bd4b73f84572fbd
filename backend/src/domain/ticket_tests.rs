//! Unit tests for the ticket state machine.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use uuid::Uuid;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn draft(title: &str, description: &str) -> TicketDraft {
    TicketDraft {
        title: TicketTitle::new(title).expect("title"),
        description: TicketDescription::new(description).expect("description"),
        priority: None,
        status: None,
        assigned_to: None,
        due_date: None,
    }
}

#[fixture]
fn creator() -> UserId {
    UserId::from_uuid(Uuid::from_u128(0x11))
}

#[fixture]
fn ticket(creator: UserId) -> Ticket {
    Ticket::open(
        TicketId::random(),
        draft("VPN down", "cannot connect"),
        creator,
        at(9),
    )
}

#[rstest]
fn open_applies_defaults(ticket: Ticket) {
    assert_eq!(ticket.status(), TicketStatus::Open);
    assert_eq!(ticket.priority(), Priority::Medium);
    assert!(ticket.assigned_to().is_none());
    assert_eq!(ticket.created_at(), ticket.updated_at());
}

#[rstest]
fn open_honours_caller_supplied_status() {
    let mut input = draft("Printer", "jammed");
    input.status = Some(TicketStatus::Closed);
    input.priority = Some(Priority::High);
    let ticket = Ticket::open(TicketId::random(), input, UserId::random(), at(9));
    assert_eq!(ticket.status(), TicketStatus::Closed);
    assert_eq!(ticket.priority(), Priority::High);
}

#[rstest]
#[case("   ", TicketValidationError::EmptyTitle)]
#[case("", TicketValidationError::EmptyTitle)]
fn blank_titles_are_rejected(#[case] raw: &str, #[case] expected: TicketValidationError) {
    assert_eq!(TicketTitle::new(raw), Err(expected));
}

#[rstest]
fn titles_are_trimmed() {
    let title = TicketTitle::new("  VPN down\n").expect("title");
    assert_eq!(title.as_ref(), "VPN down");
}

#[rstest]
#[case("in_progress", TicketStatus::InProgress)]
#[case("reopened", TicketStatus::Reopened)]
fn status_parses_snake_case(#[case] raw: &str, #[case] expected: TicketStatus) {
    assert_eq!(raw.parse::<TicketStatus>(), Ok(expected));
}

#[rstest]
#[case("In Progress")]
#[case("Open")]
fn status_rejects_legacy_spellings(#[case] raw: &str) {
    assert!(raw.parse::<TicketStatus>().is_err());
}

#[rstest]
fn apply_changes_only_touches_supplied_fields(mut ticket: Ticket, creator: UserId) {
    let changes = TicketChanges {
        priority: Some(Priority::High),
        ..TicketChanges::default()
    };
    let set = ticket.apply_changes(changes, at(10));

    assert_eq!(ticket.priority(), Priority::High);
    assert_eq!(ticket.title().as_ref(), "VPN down");
    assert_eq!(ticket.status(), TicketStatus::Open);
    assert_eq!(ticket.created_by(), &creator);
    assert_eq!(ticket.updated_at(), at(10));
    assert_eq!(
        set.to_metadata(),
        json!({ "changes": { "priority": { "from": "medium", "to": "high" } } })
    );
}

#[rstest]
fn apply_changes_with_identical_values_reports_nothing(mut ticket: Ticket) {
    let changes = TicketChanges {
        title: Some(TicketTitle::new("VPN down").expect("title")),
        ..TicketChanges::default()
    };
    let set = ticket.apply_changes(changes, at(11));
    assert!(set.is_empty());
    assert_eq!(ticket.updated_at(), at(9));
}

#[rstest]
fn assign_moves_ticket_in_progress(mut ticket: Ticket) {
    let technician = UserId::random();
    let outcome = ticket.assign(technician, at(10));

    assert_eq!(ticket.status(), TicketStatus::InProgress);
    assert_eq!(ticket.assigned_to(), Some(&technician));
    assert_eq!(outcome.previous_assignee, None);
    assert_eq!(outcome.previous_status, TicketStatus::Open);
}

#[rstest]
fn reopen_is_not_idempotent(mut ticket: Ticket) {
    assert_eq!(ticket.reopen(at(10)), Ok(TicketStatus::Open));
    assert_eq!(
        ticket.reopen(at(11)),
        Err(TicketTransitionError::AlreadyReopened)
    );
    assert_eq!(ticket.status(), TicketStatus::Reopened);
    assert_eq!(ticket.updated_at(), at(10));
}

#[rstest]
fn creator_survives_every_mutation(mut ticket: Ticket, creator: UserId) {
    ticket.assign(UserId::random(), at(10));
    ticket.apply_changes(
        TicketChanges {
            status: Some(TicketStatus::Closed),
            ..TicketChanges::default()
        },
        at(11),
    );
    let _ = ticket.reopen(at(12));
    assert_eq!(ticket.created_by(), &creator);
}

//! Ticket Record validation and transition coverage.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{EmailAddress, UserId};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minutes)
}

fn draft() -> TicketDraft {
    TicketDraft {
        owner_id: UserId::new("taro").expect("id"),
        name: GuestName::new("Taro").expect("name"),
        email: EmailAddress::new("taro@example.com").expect("email"),
        phone: PhoneNumber::new("0312345678").expect("phone"),
        product: ProductCode::new("KM-001").expect("product"),
        message: InquiryText::new("Keys stick").expect("message"),
    }
}

#[fixture]
fn ticket() -> Ticket {
    Ticket::new(draft(), at(0))
}

#[fixture]
fn sato() -> StaffName {
    StaffName::new("Sato").expect("staff name")
}

#[rstest]
fn new_tickets_start_unhandled_and_unassigned(ticket: Ticket) {
    assert_eq!(ticket.status(), TicketStatus::Unhandled);
    assert_eq!(ticket.assignee(), &Assignee::Unassigned);
    assert!(ticket.comments().is_empty());
    assert_eq!(ticket.created_at(), at(0));
}

#[rstest]
#[case(TicketStatus::Unhandled, Assignee::Unassigned)]
#[case(TicketStatus::InProgress, Assignee::Staff(StaffName::new("Sato").expect("name")))]
#[case(TicketStatus::Resolved, Assignee::Staff(StaffName::new("Ito").expect("name")))]
fn set_status_applies_assignee_rule(
    mut ticket: Ticket,
    sato: StaffName,
    #[case] status: TicketStatus,
    #[case] expected: Assignee,
) {
    ticket.set_status(TicketStatus::InProgress, &StaffName::new("Ito").expect("name"));
    ticket.set_status(status, &sato);
    assert_eq!(ticket.status(), status);
    assert_eq!(ticket.assignee(), &expected);
}

#[rstest]
fn resolving_an_unassigned_ticket_stays_unassigned(mut ticket: Ticket, sato: StaffName) {
    ticket.set_status(TicketStatus::Resolved, &sato);
    assert_eq!(ticket.assignee(), &Assignee::Unassigned);
}

#[rstest]
fn every_status_is_reachable_from_every_status(mut ticket: Ticket, sato: StaffName) {
    for from in TicketStatus::ALL {
        for to in TicketStatus::ALL {
            ticket.set_status(from, &sato);
            ticket.set_status(to, &sato);
            assert_eq!(ticket.status(), to);
        }
    }
}

#[rstest]
fn comments_append_monotonically(mut ticket: Ticket, sato: StaffName) {
    ticket
        .add_comment(&sato, "first", at(1))
        .expect("first comment");
    let before = ticket.comments().to_vec();

    let outcome = ticket
        .add_comment(&sato, "  second  ", at(2))
        .expect("second comment");

    assert!(matches!(outcome, CommentOutcome::Appended(_)));
    assert_eq!(ticket.comments().len(), before.len() + 1);
    assert_eq!(&ticket.comments()[..before.len()], before.as_slice());
    let last = ticket.comments().last().expect("last comment");
    assert_eq!(last.text().as_str(), "second");
    assert_eq!(last.author_name(), &sato);
    assert_eq!(last.created_at(), at(2));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\u{3000}\u{3000}")]
#[case("\n\t")]
fn blank_comments_are_ignored(mut ticket: Ticket, sato: StaffName, #[case] text: &str) {
    let outcome = ticket.add_comment(&sato, text, at(1)).expect("no error");
    assert_eq!(outcome, CommentOutcome::Ignored);
    assert!(ticket.comments().is_empty());
}

#[rstest]
fn oversize_comments_are_rejected(mut ticket: Ticket, sato: StaffName) {
    let text = "a".repeat(COMMENT_MAX + 1);
    let err = ticket
        .add_comment(&sato, &text, at(1))
        .expect_err("too long");
    assert_eq!(err, TicketValidationError::CommentTooLong { max: COMMENT_MAX });
    assert!(ticket.comments().is_empty());
}

#[rstest]
fn from_parts_orders_comments_by_creation(sato: StaffName) {
    let comment = |text: &str, minute| {
        Comment::new(sato.clone(), CommentText::new(text).expect("text"), at(minute))
    };
    let ticket = Ticket::from_parts(
        draft(),
        TicketStatus::Resolved,
        Assignee::Unassigned,
        at(0),
        vec![comment("late", 5), comment("early", 1), comment("tie", 5)],
    );
    let texts: Vec<&str> = ticket.comments().iter().map(|c| c.text().as_str()).collect();
    assert_eq!(texts, ["early", "late", "tie"]);
}

#[rstest]
#[case("", TicketValidationError::EmptyName)]
#[case("   ", TicketValidationError::EmptyName)]
#[case("abcdefghijklmnopq", TicketValidationError::NameTooLong { max: GUEST_NAME_MAX })]
fn rejects_bad_names(#[case] raw: &str, #[case] expected: TicketValidationError) {
    assert_eq!(GuestName::new(raw), Err(expected));
}

#[rstest]
fn accepts_sixteen_character_names() {
    assert!(GuestName::new("山田太郎山田太郎山田太郎山田太郎").is_ok());
}

#[rstest]
#[case("", TicketValidationError::EmptyPhone)]
#[case("03-1234", TicketValidationError::PhoneNotDigits)]
#[case("０３", TicketValidationError::PhoneNotDigits)]
#[case("1234567890123", TicketValidationError::PhoneTooLong { max: PHONE_MAX_DIGITS })]
fn rejects_bad_phones(#[case] raw: &str, #[case] expected: TicketValidationError) {
    assert_eq!(PhoneNumber::new(raw), Err(expected));
}

#[rstest]
#[case("KM-001")]
#[case("SP-2.1")]
#[case("PR-4800")]
fn accepts_catalogue_products(#[case] code: &str) {
    assert_eq!(ProductCode::new(code).expect("known").as_str(), code);
}

#[rstest]
#[case("km-001")]
#[case("XX-000")]
#[case("")]
fn rejects_unknown_products(#[case] code: &str) {
    assert!(matches!(
        ProductCode::new(code),
        Err(TicketValidationError::UnknownProduct { .. })
    ));
}

#[rstest]
#[case("   ")]
#[case("\u{3000}")]
fn rejects_blank_inquiries(#[case] raw: &str) {
    assert_eq!(InquiryText::new(raw), Err(TicketValidationError::BlankInquiry));
}

#[rstest]
fn rejects_oversize_inquiries() {
    let raw = "a".repeat(INQUIRY_MAX + 1);
    assert_eq!(
        InquiryText::new(raw),
        Err(TicketValidationError::InquiryTooLong { max: INQUIRY_MAX })
    );
}

#[rstest]
#[case("unassigned", Assignee::Unassigned)]
#[case("", Assignee::Unassigned)]
#[case("Sato", Assignee::Staff(StaffName::new("Sato").expect("name")))]
fn assignee_labels_round_trip(#[case] label: &str, #[case] expected: Assignee) {
    let assignee = Assignee::from_label(label);
    assert_eq!(assignee, expected);
    if !label.is_empty() {
        assert_eq!(assignee.label(), label);
    }
}

#[rstest]
#[case("unhandled", Some(TicketStatus::Unhandled))]
#[case("in_progress", Some(TicketStatus::InProgress))]
#[case("resolved", Some(TicketStatus::Resolved))]
#[case("closed", None)]
fn parses_status_labels(#[case] raw: &str, #[case] expected: Option<TicketStatus>) {
    assert_eq!(raw.parse::<TicketStatus>().ok(), expected);
}

#[rstest]
fn ticket_serialises_camel_case(ticket: Ticket) {
    insta::assert_json_snapshot!("ticket_wire_shape", ticket);
}

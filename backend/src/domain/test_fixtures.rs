//! Fixed clock and sample records shared by service tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    EmailAddress, GuestName, InquiryText, PhoneNumber, ProductCode, Ticket, TicketDraft, UserId,
};

pub(crate) struct FixtureClock {
    pub(crate) utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn sample_ticket(id: &str, name: &str, minutes_after: i64) -> Ticket {
    let draft = TicketDraft {
        owner_id: UserId::new(id).expect("id"),
        name: GuestName::new(name).expect("name"),
        email: EmailAddress::new(format!("{id}@example.com")).expect("email"),
        phone: PhoneNumber::new("0312345678").expect("phone"),
        product: ProductCode::new("KM-001").expect("product"),
        message: InquiryText::new("Keys stick").expect("message"),
    };
    Ticket::new(draft, fixture_timestamp() + Duration::minutes(minutes_after))
}

//! Admin Queue: filter and sort policy over Ticket Records.
//!
//! Open work surfaces oldest first while resolved work surfaces newest first.
//! With the `all` status filter the three statuses are concatenated in bucket
//! order so unresolved tickets always lead.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    format_detail_time, Assignee, DisplayClock, ProductCode, StaffDirectory, Ticket, TicketStatus,
    TicketValidationError, UserId,
};

/// Characters of the inquiry shown in a queue row.
pub const PREVIEW_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";
const ALL: &str = "all";

/// Status filter of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status, bucketed.
    All,
    /// One status only.
    Only(TicketStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::Only(TicketStatus::Unhandled)
    }
}

impl FromStr for StatusFilter {
    type Err = super::ParseTicketStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(status) => status.fmt(f),
        }
    }
}

/// Product filter of the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProductFilter {
    /// Every product.
    #[default]
    All,
    /// One product code.
    Only(ProductCode),
}

impl FromStr for ProductFilter {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Self::All);
        }
        ProductCode::new(s).map(Self::Only)
    }
}

/// Both queue filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFilter {
    pub status: StatusFilter,
    pub product: ProductFilter,
}

impl QueueFilter {
    /// Whether `ticket` passes both filters.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => ticket.status() == status,
        };
        let product_ok = match &self.product {
            ProductFilter::All => true,
            ProductFilter::Only(code) => ticket.product() == code,
        };
        status_ok && product_ok
    }
}

fn bucket(status: TicketStatus) -> u8 {
    match status {
        TicketStatus::Unhandled => 0,
        TicketStatus::InProgress => 1,
        TicketStatus::Resolved => 2,
    }
}

fn queue_order(a: &Ticket, b: &Ticket) -> Ordering {
    bucket(a.status())
        .cmp(&bucket(b.status()))
        .then_with(|| match a.status() {
            TicketStatus::Resolved => b.created_at().cmp(&a.created_at()),
            TicketStatus::Unhandled | TicketStatus::InProgress => {
                a.created_at().cmp(&b.created_at())
            }
        })
}

/// Filter and order tickets for the staff queue.
///
/// Records owned by staff identities are dropped. The sort is stable, so
/// tickets created at the same instant keep their store order.
pub fn arrange_queue(
    tickets: Vec<Ticket>,
    filter: &QueueFilter,
    staff: &StaffDirectory,
) -> Vec<Ticket> {
    let mut rows: Vec<Ticket> = tickets
        .into_iter()
        .filter(|ticket| !staff.role_of(ticket.email()).is_staff())
        .filter(|ticket| filter.matches(ticket))
        .collect();
    rows.sort_by(queue_order);
    rows
}

/// Shorten `text` to `max` characters, appending `...` when cut.
///
/// # Examples
/// ```
/// use helpdesk::domain::preview;
///
/// assert_eq!(preview("short", 10), "short");
/// assert_eq!(preview("abcdef", 3), "abc...");
/// ```
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().nth(max).is_none() {
        return text.to_owned();
    }
    let head: String = text.chars().take(max).collect();
    format!("{head}{PREVIEW_ELLIPSIS}")
}

/// One row of the staff queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub product_type: String,
    pub preview: String,
    pub status: TicketStatus,
    pub assignee: Assignee,
    pub created_at: DateTime<Utc>,
    /// `created_at` as `YYYY/MM/DD HH:MM` on the viewer clock.
    pub display_time: String,
}

impl QueueRow {
    /// Row for `ticket`, with its creation time shown on `clock`.
    pub fn new(ticket: &Ticket, clock: DisplayClock) -> Self {
        Self {
            id: ticket.id().clone(),
            name: ticket.name().to_string(),
            email: ticket.email().to_string(),
            phone: ticket.phone().to_string(),
            product_type: ticket.product().to_string(),
            preview: preview(ticket.message().as_str(), PREVIEW_CHARS),
            status: ticket.status(),
            assignee: ticket.assignee().clone(),
            created_at: ticket.created_at(),
            display_time: format_detail_time(ticket.created_at(), clock),
        }
    }
}

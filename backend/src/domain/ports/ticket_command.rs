//! Driving port for staff mutations of Ticket Records.
//!
//! Mutations follow the two-phase update of
//! [`TicketDetail`](crate::domain::TicketDetail): a failed store write is not
//! an error for the caller, it comes back as a `stale` copy.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, TicketDetail, TicketStatus, UserId};

/// Relabel one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatusRequest {
    pub guest_id: UserId,
    pub status: TicketStatus,
    /// Email of the staff member acting; their name becomes the assignee.
    pub acting_email: EmailAddress,
}

/// Append a staff comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    pub guest_id: UserId,
    pub author_email: EmailAddress,
    pub text: String,
}

/// Domain use-case port for ticket status and comment changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// Apply a status transition.
    async fn set_status(&self, request: SetStatusRequest) -> Result<TicketDetail, Error>;

    /// Append a comment; blank text leaves the ticket unchanged.
    async fn add_comment(&self, request: AddCommentRequest) -> Result<TicketDetail, Error>;
}

/// Command port over an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketCommand;

#[async_trait]
impl TicketCommand for FixtureTicketCommand {
    async fn set_status(&self, request: SetStatusRequest) -> Result<TicketDetail, Error> {
        Err(Error::not_found(format!(
            "ticket {} not found",
            request.guest_id
        )))
    }

    async fn add_comment(&self, request: AddCommentRequest) -> Result<TicketDetail, Error> {
        Err(Error::not_found(format!(
            "ticket {} not found",
            request.guest_id
        )))
    }
}

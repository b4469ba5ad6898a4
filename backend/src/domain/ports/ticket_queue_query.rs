//! Driving port for staff reads of Ticket Records.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, QueueFilter, QueueRow, Ticket, UserId};

/// Request for one page of the staff queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQueueRequest {
    pub filter: QueueFilter,
    pub page: PageRequest,
}

/// Domain use-case port for the Admin Queue and ticket detail reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQueueQuery: Send + Sync {
    /// Filtered, ordered and paginated queue.
    async fn queue(&self, request: TicketQueueRequest) -> Result<Page<QueueRow>, Error>;

    /// One Ticket Record; `not_found` when absent.
    async fn ticket(&self, guest_id: &UserId) -> Result<Ticket, Error>;
}

/// Query port over an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketQueueQuery;

#[async_trait]
impl TicketQueueQuery for FixtureTicketQueueQuery {
    async fn queue(&self, request: TicketQueueRequest) -> Result<Page<QueueRow>, Error> {
        Ok(Page::slice(Vec::new(), request.page))
    }

    async fn ticket(&self, guest_id: &UserId) -> Result<Ticket, Error> {
        Err(Error::not_found(format!("ticket {guest_id} not found")))
    }
}

//! Staff triage service over Ticket Records.
//!
//! Reads build the Admin Queue; writes follow the two-phase update of
//! [`TicketDetail`]: the change is applied to a local copy first, then
//! persisted. A failed write leaves the caller with a `stale` copy instead of
//! an error so the detail view can keep showing what the staff member did.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    AddCommentRequest, SetStatusRequest, TicketCommand, TicketQueueQuery, TicketQueueRequest,
    TicketRepository, TicketRepositoryError,
};
use crate::domain::store_diagnostics::detect_missing_index;
use crate::domain::{
    arrange_queue, CommentOutcome, DisplayClock, EmailAddress, Error, QueueRow, StaffDirectory,
    StaffName, Ticket, TicketDetail, UserId,
};

/// Map ticket store failures onto API errors.
pub(crate) fn map_ticket_repository_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ticket store unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            if let Some(hint) = detect_missing_index(&message) {
                warn!(remediation = %hint.remediation(), "ticket query needs an index");
            }
            Error::internal(format!("ticket store error: {message}"))
        }
        TicketRepositoryError::Duplicate { id } => {
            Error::conflict(format!("ticket {id} already exists"))
        }
        TicketRepositoryError::Missing { id } => Error::not_found(format!("ticket {id} not found")),
    }
}

/// Service implementing [`TicketQueueQuery`] and [`TicketCommand`].
pub struct TicketService<T: ?Sized> {
    tickets: Arc<T>,
    staff: Arc<StaffDirectory>,
    clock: Arc<dyn Clock>,
    display: DisplayClock,
}

impl<T: ?Sized> TicketService<T> {
    /// Create a ticket service.
    pub fn new(tickets: Arc<T>, staff: Arc<StaffDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets,
            staff,
            clock,
            display: DisplayClock::utc(),
        }
    }

    /// Show queue times on `display` instead of UTC.
    pub fn with_display_clock(mut self, display: DisplayClock) -> Self {
        self.display = display;
        self
    }
}

impl<T: ?Sized> TicketService<T>
where
    T: TicketRepository,
{
    async fn load(&self, guest_id: &UserId) -> Result<Ticket, Error> {
        self.tickets
            .find_by_id(guest_id)
            .await
            .map_err(map_ticket_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ticket {guest_id} not found")))
    }

    /// Name of the staff member behind `email`, taken from their own record.
    async fn staff_name(&self, email: &EmailAddress) -> StaffName {
        match self.tickets.find_by_email(email).await {
            Ok(Some(record)) => {
                StaffName::new(record.name().as_str()).unwrap_or_else(|_| StaffName::unknown())
            }
            Ok(None) => StaffName::unknown(),
            Err(err) => {
                warn!(%email, error = %err, "staff name lookup failed");
                StaffName::unknown()
            }
        }
    }
}

#[async_trait]
impl<T: ?Sized> TicketQueueQuery for TicketService<T>
where
    T: TicketRepository,
{
    async fn queue(&self, request: TicketQueueRequest) -> Result<Page<QueueRow>, Error> {
        let all = self
            .tickets
            .list()
            .await
            .map_err(map_ticket_repository_error)?;
        let rows: Vec<QueueRow> = arrange_queue(all, &request.filter, &self.staff)
            .iter()
            .map(|ticket| QueueRow::new(ticket, self.display))
            .collect();
        debug!(
            status = %request.filter.status,
            rows = rows.len(),
            "arranged staff queue"
        );
        Ok(Page::slice(rows, request.page))
    }

    async fn ticket(&self, guest_id: &UserId) -> Result<Ticket, Error> {
        self.load(guest_id).await
    }
}

#[async_trait]
impl<T: ?Sized> TicketCommand for TicketService<T>
where
    T: TicketRepository,
{
    async fn set_status(&self, request: SetStatusRequest) -> Result<TicketDetail, Error> {
        let ticket = self.load(&request.guest_id).await?;
        let acting = self.staff_name(&request.acting_email).await;

        let mut detail = TicketDetail::loaded(ticket);
        detail.apply(|ticket| ticket.set_status(request.status, &acting));

        let written = self
            .tickets
            .update_status(
                &request.guest_id,
                detail.ticket().status(),
                detail.ticket().assignee(),
            )
            .await;
        match written {
            Ok(()) => detail.confirm(),
            Err(err) => {
                error!(guest_id = %request.guest_id, error = %err, "status write failed");
                detail.mark_stale();
            }
        }
        Ok(detail)
    }

    async fn add_comment(&self, request: AddCommentRequest) -> Result<TicketDetail, Error> {
        let ticket = self.load(&request.guest_id).await?;
        let author = self.staff_name(&request.author_email).await;

        let mut local = ticket.clone();
        let outcome = local
            .add_comment(&author, &request.text, self.clock.utc())
            .map_err(|err| {
                Error::invalid_request(err.to_string())
                    .with_details(json!({ "field": err.field(), "code": err.code() }))
            })?;

        let CommentOutcome::Appended(comment) = outcome else {
            return Ok(TicketDetail::loaded(ticket));
        };

        let mut detail = TicketDetail::loaded(ticket);
        detail.apply(|ticket| *ticket = local);
        match self
            .tickets
            .append_comment(&request.guest_id, &comment)
            .await
        {
            Ok(()) => detail.confirm(),
            Err(err) => {
                error!(guest_id = %request.guest_id, error = %err, "comment write failed");
                detail.mark_stale();
            }
        }
        Ok(detail)
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;

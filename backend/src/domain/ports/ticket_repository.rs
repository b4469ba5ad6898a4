//! Port for Ticket Record persistence.
//!
//! Records are keyed by the owning guest's id. Status changes and comment
//! appends are single-record atomic writes; there are no multi-record
//! transactions.

use async_trait::async_trait;

use crate::domain::{Assignee, Comment, EmailAddress, Ticket, TicketStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ticket repository query failed: {message}",
        /// A record already exists for the owner.
        Duplicate { id: String } => "ticket {id} already exists",
        /// No record exists for the owner.
        Missing { id: String } => "ticket {id} not found",
    }
}

/// Port for reading and mutating Ticket Records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert a new record.
    async fn create(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// Find the record owned by `id`.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Find the record whose email matches `email`.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Every record in insertion order.
    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Overwrite `status` and `assignee` in one write.
    async fn update_status(
        &self,
        id: &UserId,
        status: TicketStatus,
        assignee: &Assignee,
    ) -> Result<(), TicketRepositoryError>;

    /// Append one comment to the record's log.
    async fn append_comment(
        &self,
        id: &UserId,
        comment: &Comment,
    ) -> Result<(), TicketRepositoryError>;
}

/// Fixture implementation for tests that do not exercise ticket persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketRepository;

#[async_trait]
impl TicketRepository for FixtureTicketRepository {
    async fn create(&self, _ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        id: &UserId,
        _status: TicketStatus,
        _assignee: &Assignee,
    ) -> Result<(), TicketRepositoryError> {
        Err(TicketRepositoryError::missing(id.as_str()))
    }

    async fn append_comment(
        &self,
        id: &UserId,
        _comment: &Comment,
    ) -> Result<(), TicketRepositoryError> {
        Err(TicketRepositoryError::missing(id.as_str()))
    }
}

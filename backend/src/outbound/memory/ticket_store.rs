//! In-process `TicketRepository` keyed by owner id.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Assignee, Comment, EmailAddress, Ticket, TicketDraft, TicketStatus, UserId};

/// Ticket Records held in insertion order behind one lock.
#[derive(Debug, Default)]
pub struct MemoryTicketRepository {
    tickets: RwLock<Vec<Ticket>>,
}

impl MemoryTicketRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn rebuild(
    ticket: &Ticket,
    status: TicketStatus,
    assignee: Assignee,
    comments: Vec<Comment>,
) -> Ticket {
    let draft = TicketDraft {
        owner_id: ticket.id().clone(),
        name: ticket.name().clone(),
        email: ticket.email().clone(),
        phone: ticket.phone().clone(),
        product: ticket.product().clone(),
        message: ticket.message().clone(),
    };
    Ticket::from_parts(draft, status, assignee, ticket.created_at(), comments)
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn create(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut tickets = self.tickets.write().await;
        if tickets.iter().any(|existing| existing.id() == ticket.id()) {
            return Err(TicketRepositoryError::duplicate(ticket.id().as_str()));
        }
        tickets.push(ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let tickets = self.tickets.read().await;
        Ok(tickets.iter().find(|ticket| ticket.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let tickets = self.tickets.read().await;
        Ok(tickets.iter().find(|ticket| ticket.email() == email).cloned())
    }

    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(self.tickets.read().await.clone())
    }

    async fn update_status(
        &self,
        id: &UserId,
        status: TicketStatus,
        assignee: &Assignee,
    ) -> Result<(), TicketRepositoryError> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|ticket| ticket.id() == id)
            .ok_or_else(|| TicketRepositoryError::missing(id.as_str()))?;
        *ticket = rebuild(ticket, status, assignee.clone(), ticket.comments().to_vec());
        Ok(())
    }

    async fn append_comment(
        &self,
        id: &UserId,
        comment: &Comment,
    ) -> Result<(), TicketRepositoryError> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|ticket| ticket.id() == id)
            .ok_or_else(|| TicketRepositoryError::missing(id.as_str()))?;
        let mut comments = ticket.comments().to_vec();
        comments.push(comment.clone());
        *ticket = rebuild(ticket, ticket.status(), ticket.assignee().clone(), comments);
        Ok(())
    }
}

//! PostgreSQL-backed `TicketRepository` implementation using Diesel ORM.
//!
//! Ticket fields live in `tickets`; the comment log lives in
//! `ticket_comments`. Status changes update one row and comment appends
//! insert one row, so neither needs a transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{
    Assignee, Comment, CommentText, EmailAddress, GuestName, InquiryText, PhoneNumber,
    ProductCode, StaffName, Ticket, TicketDraft, TicketStatus, UserId,
};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{CommentRow, NewCommentRow, NewTicketRow, TicketRow, TicketStatusUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{ticket_comments, tickets};

/// Diesel-backed implementation of the `TicketRepository` port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    TicketRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, id: &str) -> TicketRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => TicketRepositoryError::connection(message),
        StoreFailure::Duplicate => TicketRepositoryError::duplicate(id),
        StoreFailure::MissingParent => TicketRepositoryError::missing(id),
        StoreFailure::Query(message) => TicketRepositoryError::query(message),
    }
}

fn corrupt(id: &str, field: &str) -> TicketRepositoryError {
    warn!(ticket_id = id, field, "stored ticket failed validation");
    TicketRepositoryError::query(format!("stored ticket {id} has an invalid {field}"))
}

fn row_to_comment(row: CommentRow) -> Result<Comment, TicketRepositoryError> {
    let author =
        StaffName::new(&row.author_name).map_err(|_| corrupt(&row.ticket_id, "comment author"))?;
    let text =
        CommentText::new(&row.body).map_err(|_| corrupt(&row.ticket_id, "comment body"))?;
    Ok(Comment::new(author, text, row.created_at))
}

fn row_to_ticket(row: TicketRow, comments: Vec<Comment>) -> Result<Ticket, TicketRepositoryError> {
    let id = row.id.as_str();
    let draft = TicketDraft {
        owner_id: UserId::new(id).map_err(|_| corrupt(id, "id"))?,
        name: GuestName::new(&row.name).map_err(|_| corrupt(id, "name"))?,
        email: EmailAddress::new(&row.email).map_err(|_| corrupt(id, "email"))?,
        phone: PhoneNumber::new(&row.phone).map_err(|_| corrupt(id, "phone"))?,
        product: ProductCode::new(&row.product_type).map_err(|_| corrupt(id, "product"))?,
        message: InquiryText::new(row.message.clone()).map_err(|_| corrupt(id, "message"))?,
    };
    let status = row
        .status
        .parse::<TicketStatus>()
        .map_err(|_| corrupt(id, "status"))?;
    Ok(Ticket::from_parts(
        draft,
        status,
        Assignee::from_label(&row.assignee),
        row.created_at,
        comments,
    ))
}

impl DieselTicketRepository {
    async fn load_with_comments(
        &self,
        rows: Vec<TicketRow>,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let comment_rows: Vec<CommentRow> = ticket_comments::table
            .filter(ticket_comments::ticket_id.eq_any(ids))
            .order((ticket_comments::created_at.asc(), ticket_comments::id.asc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, "comments"))?;

        let mut by_ticket: HashMap<String, Vec<Comment>> = HashMap::new();
        for row in comment_rows {
            let key = row.ticket_id.clone();
            by_ticket.entry(key).or_default().push(row_to_comment(row)?);
        }
        rows.into_iter()
            .map(|row| {
                let comments = by_ticket.remove(&row.id).unwrap_or_default();
                row_to_ticket(row, comments)
            })
            .collect()
    }

    async fn attach_one(
        &self,
        row: Option<TicketRow>,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.load_with_comments(vec![row]).await?.into_iter().next())
    }
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn create(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTicketRow {
            id: ticket.id().as_str(),
            name: ticket.name().as_str(),
            email: ticket.email().as_str(),
            phone: ticket.phone().as_str(),
            product_type: ticket.product().as_str(),
            message: ticket.message().as_str(),
            status: ticket.status().as_str(),
            assignee: ticket.assignee().label(),
            created_at: ticket.created_at(),
        };
        diesel::insert_into(tickets::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, ticket.id().as_str()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TicketRow> = tickets::table
            .filter(tickets::id.eq(id.as_str()))
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, id.as_str()))?;
        drop(conn);
        self.attach_one(row).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TicketRow> = tickets::table
            .filter(tickets::email.eq(email.as_str()))
            .order(tickets::created_at.asc())
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, email.as_str()))?;
        drop(conn);
        self.attach_one(row).await
    }

    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TicketRow> = tickets::table
            .order((tickets::created_at.asc(), tickets::id.asc()))
            .select(TicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, "tickets"))?;
        drop(conn);
        self.load_with_comments(rows).await
    }

    async fn update_status(
        &self,
        id: &UserId,
        status: TicketStatus,
        assignee: &Assignee,
    ) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TicketStatusUpdate {
            status: status.as_str(),
            assignee: assignee.label(),
        };
        let updated = diesel::update(tickets::table.filter(tickets::id.eq(id.as_str())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, id.as_str()))?;
        if updated == 0 {
            return Err(TicketRepositoryError::missing(id.as_str()));
        }
        Ok(())
    }

    async fn append_comment(
        &self,
        id: &UserId,
        comment: &Comment,
    ) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            ticket_id: id.as_str(),
            author_name: comment.author_name().as_str(),
            body: comment.text().as_str(),
            created_at: comment.created_at(),
        };
        diesel::insert_into(ticket_comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, id.as_str()))
    }
}

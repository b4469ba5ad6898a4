//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain entities at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{chat_messages, chat_threads, ticket_comments, tickets};

/// Row read from `tickets`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub product_type: String,
    pub message: String,
    pub status: String,
    pub assignee: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable ticket.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub product_type: &'a str,
    pub message: &'a str,
    pub status: &'a str,
    pub assignee: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Status and assignee written together by a status change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tickets)]
pub(crate) struct TicketStatusUpdate<'a> {
    pub status: &'a str,
    pub assignee: &'a str,
}

/// Row read from `ticket_comments`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ticket_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub ticket_id: String,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable comment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_comments)]
pub(crate) struct NewCommentRow<'a> {
    pub ticket_id: &'a str,
    pub author_name: &'a str,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from `chat_threads`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_threads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChatThreadRow {
    pub guest_id: String,
    pub guest_display_name: Option<String>,
}

/// Insertable thread header.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_threads)]
pub(crate) struct NewChatThreadRow<'a> {
    pub guest_id: &'a str,
    pub guest_display_name: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from `chat_messages`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChatMessageRow {
    pub sender_email: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable chat message.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
pub(crate) struct NewChatMessageRow<'a> {
    pub guest_id: &'a str,
    pub sender_email: &'a str,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

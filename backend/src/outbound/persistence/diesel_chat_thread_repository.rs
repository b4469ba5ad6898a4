//! PostgreSQL-backed `ChatThreadRepository` implementation using Diesel ORM.
//!
//! Each message is its own row, so concurrent appends to one thread never
//! overwrite each other. The thread header row is created on first append and
//! its display name is only ever filled, never replaced.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{ChatThreadRepository, ChatThreadRepositoryError};
use crate::domain::{ChatMessage, ChatThread, EmailAddress, GuestName, MessageText, UserId};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{ChatMessageRow, ChatThreadRow, NewChatMessageRow, NewChatThreadRow};
use super::pool::{DbPool, PoolError};
use super::schema::{chat_messages, chat_threads};

/// Diesel-backed implementation of the `ChatThreadRepository` port.
#[derive(Clone)]
pub struct DieselChatThreadRepository {
    pool: DbPool,
}

impl DieselChatThreadRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChatThreadRepositoryError {
    ChatThreadRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ChatThreadRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ChatThreadRepositoryError::connection(message),
        StoreFailure::Duplicate => ChatThreadRepositoryError::query("duplicate chat record"),
        StoreFailure::MissingParent => ChatThreadRepositoryError::query("chat thread missing"),
        StoreFailure::Query(message) => ChatThreadRepositoryError::query(message),
    }
}

fn rows_to_thread(
    header: ChatThreadRow,
    messages: Vec<ChatMessageRow>,
) -> Result<ChatThread, ChatThreadRepositoryError> {
    let guest_id = UserId::new(header.guest_id.as_str())
        .map_err(|_| ChatThreadRepositoryError::query("stored chat thread has an invalid id"))?;
    // A bad display name only loses the denormalised label.
    let display_name = header
        .guest_display_name
        .and_then(|name| GuestName::new(name).ok());
    let messages = messages
        .into_iter()
        .filter_map(|row| {
            let sender = EmailAddress::new(&row.sender_email).ok();
            let text = MessageText::new(row.body).ok();
            match (sender, text) {
                (Some(sender), Some(text)) => Some(ChatMessage::new(sender, text, row.created_at)),
                _ => {
                    warn!(guest_id = guest_id.as_str(), "skipping invalid stored chat message");
                    None
                }
            }
        })
        .collect();
    Ok(ChatThread::from_parts(guest_id, display_name, messages))
}

type ThreadRows = (ChatThreadRow, Vec<ChatMessageRow>);

async fn load_thread<C>(
    conn: &mut C,
    guest_id: &str,
) -> Result<Option<ThreadRows>, diesel::result::Error>
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let header: Option<ChatThreadRow> = chat_threads::table
        .filter(chat_threads::guest_id.eq(guest_id))
        .select(ChatThreadRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(header) = header else {
        return Ok(None);
    };
    let messages: Vec<ChatMessageRow> = chat_messages::table
        .filter(chat_messages::guest_id.eq(guest_id))
        .order(chat_messages::id.asc())
        .select(ChatMessageRow::as_select())
        .load(conn)
        .await?;
    Ok(Some((header, messages)))
}

#[async_trait]
impl ChatThreadRepository for DieselChatThreadRepository {
    async fn find(
        &self,
        guest_id: &UserId,
    ) -> Result<Option<ChatThread>, ChatThreadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = load_thread(&mut conn, guest_id.as_str())
            .await
            .map_err(map_diesel_error)?;
        rows.map(|(header, messages)| rows_to_thread(header, messages))
            .transpose()
    }

    async fn append_message(
        &self,
        guest_id: &UserId,
        display_name: Option<GuestName>,
        message: &ChatMessage,
    ) -> Result<ChatThread, ChatThreadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = guest_id.as_str();
        let name = display_name.as_ref().map(GuestName::as_str);

        let rows = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(chat_threads::table)
                        .values(&NewChatThreadRow {
                            guest_id: id,
                            guest_display_name: name,
                            updated_at: message.created_at(),
                        })
                        .on_conflict(chat_threads::guest_id)
                        .do_nothing()
                        .execute(conn)
                        .await?;

                    if let Some(name) = name {
                        diesel::update(
                            chat_threads::table
                                .filter(chat_threads::guest_id.eq(id))
                                .filter(chat_threads::guest_display_name.is_null()),
                        )
                        .set(chat_threads::guest_display_name.eq(name))
                        .execute(conn)
                        .await?;
                    }

                    diesel::insert_into(chat_messages::table)
                        .values(&NewChatMessageRow {
                            guest_id: id,
                            sender_email: message.sender_email().as_str(),
                            body: message.text().as_str(),
                            created_at: message.created_at(),
                        })
                        .execute(conn)
                        .await?;

                    diesel::update(chat_threads::table.filter(chat_threads::guest_id.eq(id)))
                        .set(chat_threads::updated_at.eq(message.created_at()))
                        .execute(conn)
                        .await?;

                    load_thread(conn, id).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let (header, messages) = rows
            .ok_or_else(|| ChatThreadRepositoryError::query("chat thread vanished after append"))?;
        rows_to_thread(header, messages)
    }
}

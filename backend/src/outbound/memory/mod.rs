//! In-process document storage used when no database is configured.
//!
//! Behaves like the Diesel adapters (insertion-ordered listing, duplicate and
//! missing-record errors) but keeps everything in memory, so a restart loses
//! all records.

mod chat_store;
mod ticket_store;

pub use chat_store::MemoryChatThreadRepository;
pub use ticket_store::MemoryTicketRepository;

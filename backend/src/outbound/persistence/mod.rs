//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Ticket Records and Chat Threads are stored in plain tables behind the
//! `TicketRepository` and `ChatThreadRepository` ports. Repositories only
//! translate between rows and domain entities; validation and access rules
//! stay in the domain.
//!
//! # Example
//!
//! ```ignore
//! use helpdesk::outbound::persistence::{DbPool, DieselTicketRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/helpdesk")).await?;
//! let tickets = DieselTicketRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_chat_thread_repository;
mod diesel_ticket_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_chat_thread_repository::DieselChatThreadRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

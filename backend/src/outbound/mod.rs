//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used when no database is configured
//! - **identity**: Identity Toolkit REST client and an in-process provider
//! - **realtime**: broadcast feed pushing Chat Thread snapshots to sockets
//! - **metrics**: Prometheus registry helpers (feature-gated)
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod identity;
pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod realtime;

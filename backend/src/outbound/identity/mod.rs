//! Identity provider adapters.
//!
//! - [`IdentityToolkitProvider`] talks to an Identity-Toolkit-compatible REST
//!   service (the hosted API or a local emulator).
//! - [`InMemoryIdentityProvider`] keeps accounts in process for development.

mod dto;
mod in_memory;
mod toolkit;

pub use in_memory::InMemoryIdentityProvider;
pub use toolkit::{DEFAULT_TOOLKIT_ENDPOINT, IdentityToolkitProvider};

/// Shortest password either provider accepts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod chat;
pub mod error;
pub mod health;
pub mod navigation;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod validation;

pub use error::ApiResult;

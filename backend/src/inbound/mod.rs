//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the live chat socket lives under
//! [`ws`]. Both enforce the same session and access rules.

pub mod http;
pub mod ws;

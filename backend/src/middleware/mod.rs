//! Request middleware shared by the REST API and the chat socket.
//!
//! [`Trace`] scopes a fresh [`crate::domain::TraceId`] around every request
//! and echoes it in the `trace-id` response header.

pub mod trace;

pub use trace::Trace;

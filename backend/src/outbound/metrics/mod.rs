//! Prometheus-backed decorators for driven ports.
//!
//! Everything here is feature-gated behind the `metrics` feature.

mod prometheus_chat_feed;

pub use prometheus_chat_feed::PrometheusChatFeed;

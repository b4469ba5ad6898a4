//! Support desk backend: guest chat threads and a staff triage queue.
//!
//! The crate is laid out as a hexagon: [`domain`] holds the rules and
//! services, [`inbound`] adapts HTTP and WebSocket traffic onto the driving
//! ports, and [`outbound`] implements the driven ports against the document
//! store, the identity provider and the live feed.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

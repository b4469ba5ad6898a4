//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use helpdesk::domain::{DisplayClock, StaffDirectory};
use helpdesk::inbound::http::session_config::SessionSettings;
use helpdesk::inbound::ws::state::AllowedOrigins;
use helpdesk::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use super::settings::IdentityBackend;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl_hours: i64,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) staff: StaffDirectory,
    pub(crate) display: DisplayClock,
    pub(crate) origins: AllowedOrigins,
    pub(crate) identity: IdentityBackend,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage and identity.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, staff: StaffDirectory) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
            ttl_hours,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl_hours: ttl_hours,
            bind_addr,
            staff,
            display: DisplayClock::default(),
            origins: AllowedOrigins::default(),
            identity: IdentityBackend::InMemory,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool; Ticket Records and Chat Threads
    /// are then stored in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select the identity provider.
    #[must_use]
    pub fn with_identity(mut self, identity: IdentityBackend) -> Self {
        self.identity = identity;
        self
    }

    /// Set the viewer clock used to render chat timestamps.
    #[must_use]
    pub fn with_display_clock(mut self, display: DisplayClock) -> Self {
        self.display = display;
        self
    }

    /// Set the WebSocket Origin allow-list.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: AllowedOrigins) -> Self {
        self.origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

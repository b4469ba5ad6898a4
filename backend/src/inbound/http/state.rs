//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::StaffDirectory;
use crate::domain::ports::{
    ChatCommand, ChatQuery, GuestRegistration, LoginService, PasswordReset, TicketCommand,
    TicketQueueQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn GuestRegistration>,
    pub login: Arc<dyn LoginService>,
    pub password_reset: Arc<dyn PasswordReset>,
    pub tickets_query: Arc<dyn TicketQueueQuery>,
    pub tickets_command: Arc<dyn TicketCommand>,
    pub chat_command: Arc<dyn ChatCommand>,
    pub chat_query: Arc<dyn ChatQuery>,
    pub staff: Arc<StaffDirectory>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn GuestRegistration>,
    pub login: Arc<dyn LoginService>,
    pub password_reset: Arc<dyn PasswordReset>,
    pub tickets_query: Arc<dyn TicketQueueQuery>,
    pub tickets_command: Arc<dyn TicketCommand>,
    pub chat_command: Arc<dyn ChatCommand>,
    pub chat_query: Arc<dyn ChatQuery>,
    /// Staff allow-list used to derive the viewer's role per request.
    pub staff: Arc<StaffDirectory>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use helpdesk::domain::StaffDirectory;
    /// use helpdesk::domain::ports::{
    ///     FixtureChatCommand, FixtureChatQuery, FixtureGuestRegistration, FixtureLoginService,
    ///     FixturePasswordReset, FixtureTicketCommand, FixtureTicketQueueQuery,
    /// };
    /// use helpdesk::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     registration: Arc::new(FixtureGuestRegistration),
    ///     login: Arc::new(FixtureLoginService),
    ///     password_reset: Arc::new(FixturePasswordReset),
    ///     tickets_query: Arc::new(FixtureTicketQueueQuery),
    ///     tickets_command: Arc::new(FixtureTicketCommand),
    ///     chat_command: Arc::new(FixtureChatCommand),
    ///     chat_query: Arc::new(FixtureChatQuery),
    ///     staff: Arc::new(StaffDirectory::from_list("sato@example.com")),
    /// });
    /// assert_eq!(state.staff.len(), 1);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            registration,
            login,
            password_reset,
            tickets_query,
            tickets_command,
            chat_command,
            chat_query,
            staff,
        } = ports;
        Self {
            registration,
            login,
            password_reset,
            tickets_query,
            tickets_command,
            chat_command,
            chat_query,
            staff,
        }
    }
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::StaffDirectory;
use crate::domain::ports::{
    FixtureChatCommand, FixtureChatQuery, FixtureGuestRegistration, FixtureLoginService,
    FixturePasswordReset, FixtureTicketCommand, FixtureTicketQueueQuery,
};
use crate::inbound::http::state::HttpStatePorts;

/// Staff directory used by handler tests.
pub const TEST_STAFF_EMAIL: &str = "sato@example.com";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Fixture-backed ports, ready for a test to override individual fields.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        registration: Arc::new(FixtureGuestRegistration),
        login: Arc::new(FixtureLoginService),
        password_reset: Arc::new(FixturePasswordReset),
        tickets_query: Arc::new(FixtureTicketQueueQuery),
        tickets_command: Arc::new(FixtureTicketCommand),
        chat_command: Arc::new(FixtureChatCommand),
        chat_query: Arc::new(FixtureChatQuery),
        staff: Arc::new(StaffDirectory::from_list(TEST_STAFF_EMAIL)),
    }
}

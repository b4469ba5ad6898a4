//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities of the support desk (identities
//! and roles, Ticket Records, Chat Threads), the rules that govern them
//! (access, queue ordering, rendering) and the services that drive them
//! through ports. Nothing here knows about HTTP, WebSockets or the store.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Identity, Role and Viewer — who is asking and what they may open.
//! - Ticket and ChatThread — the two persisted aggregates.
//! - RegistrationService, AuthService, TicketService and ChatService —
//!   implementations of the driving ports in [`ports`].

pub mod access;
pub mod auth;
pub mod chat;
pub mod error;
pub mod identity;
pub mod ports;
pub mod queue;
pub mod registration;
pub mod role;
pub mod store_diagnostics;
pub mod ticket;
pub mod ticket_detail;
pub mod trace_id;

mod auth_service;
mod chat_service;
mod registration_service;
mod ticket_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::access::{
    decide, landing_path, may_access_chat, AccessDecision, Route, View, Viewer, ADMIN_PATH,
    RESET_PASSWORD_PATH, ROOT_PATH,
};
pub use self::auth::{
    AuthFlow, IdentityFailure, LoginCredentials, LoginValidationError, SessionView,
};
pub use self::auth_service::AuthService;
pub use self::chat::{
    chat_title, format_detail_time, format_message_time, sender_label, BubbleSide, ChatMessage,
    ChatThread, DisplayClock, MessageText, MessageTextError, RenderedMessage, RenderedThread,
    SenderNames, GUEST_FALLBACK_NAME, GUEST_VIEWER_TITLE, STAFF_FALLBACK_LABEL,
    STAFF_VIEWER_TITLE,
};
pub use self::chat_service::ChatService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::identity::{
    EmailAddress, Identity, IdentityValidationError, UserId, EMAIL_MAX, USER_ID_MAX,
};
pub use self::queue::{
    arrange_queue, preview, ProductFilter, QueueFilter, QueueRow, StatusFilter, PREVIEW_CHARS,
};
pub use self::registration::{
    sanitize_phone, RegistrationForm, RegistrationInput, RegistrationValidationError,
};
pub use self::registration_service::RegistrationService;
pub use self::role::{Role, StaffDirectory};
pub use self::store_diagnostics::{detect_missing_index, MissingIndexHint};
pub use self::ticket::{
    Assignee, Comment, CommentOutcome, CommentText, GuestName, InquiryText, ParseTicketStatusError,
    PhoneNumber, ProductCode, StaffName, Ticket, TicketDraft, TicketStatus, TicketValidationError,
    COMMENT_MAX, GUEST_NAME_MAX, INQUIRY_MAX, PHONE_MAX_DIGITS, PRODUCT_CATALOGUE,
    UNASSIGNED_LABEL, UNKNOWN_STAFF_NAME,
};
pub use self::ticket_detail::{SyncState, TicketDetail};
pub use self::ticket_service::TicketService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use helpdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

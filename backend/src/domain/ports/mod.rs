//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`IdentityProvider`, `TicketRepository`,
//! `ChatThreadRepository`, `ChatThreadFeed`) are implemented by outbound
//! adapters. Driving ports are implemented by the domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod chat_command;
mod chat_query;
mod chat_thread_feed;
mod chat_thread_repository;
mod guest_registration;
mod identity_provider;
mod login_service;
mod ticket_command;
mod ticket_queue_query;
mod ticket_repository;

#[cfg(test)]
pub use chat_command::MockChatCommand;
pub use chat_command::{ChatCommand, FixtureChatCommand, SendMessageRequest, SendOutcome};
#[cfg(test)]
pub use chat_query::MockChatQuery;
pub use chat_query::{ChatQuery, FixtureChatQuery, RenderedThreadStream};
#[cfg(test)]
pub use chat_thread_feed::MockChatThreadFeed;
pub use chat_thread_feed::{ChatThreadFeed, FixtureChatThreadFeed, ThreadSubscription};
#[cfg(test)]
pub use chat_thread_repository::MockChatThreadRepository;
pub use chat_thread_repository::{
    ChatThreadRepository, ChatThreadRepositoryError, FixtureChatThreadRepository,
};
#[cfg(test)]
pub use guest_registration::MockGuestRegistration;
pub use guest_registration::{FixtureGuestRegistration, GuestRegistration};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use login_service::{MockLoginService, MockPasswordReset};
pub use login_service::{
    FIXTURE_GUEST_EMAIL, FIXTURE_GUEST_ID, FIXTURE_PASSWORD, FixtureLoginService,
    FixturePasswordReset, LoginService, PasswordReset,
};
#[cfg(test)]
pub use ticket_command::MockTicketCommand;
pub use ticket_command::{AddCommentRequest, FixtureTicketCommand, SetStatusRequest, TicketCommand};
#[cfg(test)]
pub use ticket_queue_query::MockTicketQueueQuery;
pub use ticket_queue_query::{FixtureTicketQueueQuery, TicketQueueQuery, TicketQueueRequest};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{FixtureTicketRepository, TicketRepository, TicketRepositoryError};

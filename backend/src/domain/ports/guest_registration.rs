//! Driving port for guest registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationInput, Role, SessionView};

use super::login_service::fixture_guest_identity;

/// Domain use-case port for creating an account plus its Ticket Record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestRegistration: Send + Sync {
    /// Validate the form, create the identity, then the Ticket Record.
    async fn register(&self, input: RegistrationInput) -> Result<SessionView, Error>;
}

/// Registration port that signs every form in as the fixture guest.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGuestRegistration;

#[async_trait]
impl GuestRegistration for FixtureGuestRegistration {
    async fn register(&self, _input: RegistrationInput) -> Result<SessionView, Error> {
        Ok(SessionView::new(fixture_guest_identity()?, Role::Guest))
    }
}

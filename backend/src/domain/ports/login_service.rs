//! Driving ports for signing in and resetting passwords.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! without knowing (or importing) the identity provider behind them, so
//! handler tests can substitute a test double.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, Identity, LoginCredentials, Role, SessionView, UserId,
};

/// Email accepted by [`FixtureLoginService`].
pub const FIXTURE_GUEST_EMAIL: &str = "taro@example.com";
/// Password accepted by [`FixtureLoginService`].
pub const FIXTURE_PASSWORD: &str = "password";
/// Identity id returned by the fixtures.
pub const FIXTURE_GUEST_ID: &str = "fixture-guest";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the resulting session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionView, Error>;
}

/// Domain use-case port for password reset emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordReset: Send + Sync {
    /// Ask the identity provider to send a reset email.
    async fn request_reset(&self, email: &EmailAddress) -> Result<(), Error>;
}

pub(crate) fn fixture_guest_identity() -> Result<Identity, Error> {
    let id = UserId::new(FIXTURE_GUEST_ID)
        .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
    let email = EmailAddress::new(FIXTURE_GUEST_EMAIL)
        .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
    Ok(Identity::new(id, email))
}

/// In-memory authenticator for handler tests.
///
/// `taro@example.com` / `password` signs in as a guest.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionView, Error> {
        if credentials.email().as_str() == FIXTURE_GUEST_EMAIL
            && credentials.password() == FIXTURE_PASSWORD
        {
            Ok(SessionView::new(fixture_guest_identity()?, Role::Guest))
        } else {
            Err(Error::unauthorized("The email address or password is incorrect."))
        }
    }
}

/// Reset port that accepts every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordReset;

#[async_trait]
impl PasswordReset for FixturePasswordReset {
    async fn request_reset(&self, _email: &EmailAddress) -> Result<(), Error> {
        Ok(())
    }
}

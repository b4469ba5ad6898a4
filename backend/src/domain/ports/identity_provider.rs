//! Port for the external identity provider.
//!
//! The provider owns accounts and credentials. This system asks it to create
//! an account, check a password or send a reset email, and reads back the
//! issued [`Identity`].

use async_trait::async_trait;

use crate::domain::{EmailAddress, Identity, IdentityFailure, LoginCredentials};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider rejected the email format.
        InvalidEmail => "identity provider rejected the email address",
        /// An account already exists for the email.
        EmailAlreadyInUse => "email address already registered",
        /// The password is below the provider's minimum strength.
        WeakPassword { min_length: usize } =>
            "password must be at least {min_length} characters",
        /// Wrong password for an existing account.
        InvalidCredentials => "invalid credentials",
        /// No account exists for the email.
        UserNotFound => "no account for email",
        /// The provider could not be reached.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// The provider answered with an unexpected failure.
        Rejected { message: String } => "identity provider rejected request: {message}",
    }
}

impl IdentityProviderError {
    /// Domain failure category.
    pub fn failure(&self) -> IdentityFailure {
        match self {
            Self::InvalidEmail => IdentityFailure::InvalidEmail,
            Self::EmailAlreadyInUse => IdentityFailure::EmailAlreadyInUse,
            Self::WeakPassword { .. } => IdentityFailure::WeakPassword,
            Self::InvalidCredentials => IdentityFailure::InvalidCredentials,
            Self::UserNotFound => IdentityFailure::UserNotFound,
            Self::Unavailable { .. } | Self::Rejected { .. } => IdentityFailure::Provider,
        }
    }
}

/// Port for account creation, sign-in and password reset.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return the issued identity.
    async fn create_account(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Identity, IdentityProviderError>;

    /// Check credentials and return the matching identity.
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Identity, IdentityProviderError>;

    /// Ask the provider to email a password reset link.
    async fn send_password_reset(&self, email: &EmailAddress)
        -> Result<(), IdentityProviderError>;
}

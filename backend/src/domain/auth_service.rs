//! Sign-in and password reset service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{IdentityProvider, LoginService, PasswordReset};
use crate::domain::{AuthFlow, EmailAddress, Error, LoginCredentials, SessionView, StaffDirectory};

/// Service implementing [`LoginService`] and [`PasswordReset`].
pub struct AuthService<P: ?Sized> {
    identity: Arc<P>,
    staff: Arc<StaffDirectory>,
}

impl<P: ?Sized> AuthService<P> {
    /// Create an auth service over an identity provider.
    pub fn new(identity: Arc<P>, staff: Arc<StaffDirectory>) -> Self {
        Self { identity, staff }
    }
}

#[async_trait]
impl<P: ?Sized> LoginService for AuthService<P>
where
    P: IdentityProvider,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionView, Error> {
        let identity = self.identity.sign_in(credentials).await.map_err(|err| {
            warn!(error = %err, "sign-in failed");
            err.failure().into_error(AuthFlow::SignIn)
        })?;
        let role = self.staff.role_of(identity.email());
        info!(user_id = %identity.id(), %role, "signed in");
        Ok(SessionView::new(identity, role))
    }
}

#[async_trait]
impl<P: ?Sized> PasswordReset for AuthService<P>
where
    P: IdentityProvider,
{
    async fn request_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        self.identity
            .send_password_reset(email)
            .await
            .map_err(|err| {
                warn!(error = %err, "password reset request failed");
                err.failure().into_error(AuthFlow::PasswordReset)
            })
    }
}

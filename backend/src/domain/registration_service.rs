//! Guest registration service.
//!
//! Registration validates the form before any I/O, asks the identity provider
//! for an account, then writes the paired Ticket Record as `unhandled` and
//! `unassigned`. Staff register through the same path; their records exist
//! so staff names can be looked up, and the queue hides them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{GuestRegistration, IdentityProvider, TicketRepository};
use crate::domain::ticket_service::map_ticket_repository_error;
use crate::domain::{
    AuthFlow, Error, RegistrationForm, RegistrationInput, RegistrationValidationError,
    SessionView, StaffDirectory, Ticket, TicketDraft,
};

pub(crate) fn registration_validation_error(err: &RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

/// Service implementing [`GuestRegistration`].
pub struct RegistrationService<P: ?Sized, T: ?Sized> {
    identity: Arc<P>,
    tickets: Arc<T>,
    staff: Arc<StaffDirectory>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized, T: ?Sized> RegistrationService<P, T> {
    /// Create a registration service.
    pub fn new(
        identity: Arc<P>,
        tickets: Arc<T>,
        staff: Arc<StaffDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity,
            tickets,
            staff,
            clock,
        }
    }
}

#[async_trait]
impl<P: ?Sized, T: ?Sized> GuestRegistration for RegistrationService<P, T>
where
    P: IdentityProvider,
    T: TicketRepository,
{
    async fn register(&self, input: RegistrationInput) -> Result<SessionView, Error> {
        let form = RegistrationForm::parse(input)
            .map_err(|err| registration_validation_error(&err))?;

        let identity = self
            .identity
            .create_account(&form.email, &form.password)
            .await
            .map_err(|err| {
                warn!(error = %err, "account creation failed");
                err.failure().into_error(AuthFlow::Registration)
            })?;

        let ticket = Ticket::new(
            TicketDraft {
                owner_id: identity.id().clone(),
                name: form.name,
                email: form.email,
                phone: form.phone,
                product: form.product,
                message: form.message,
            },
            self.clock.utc(),
        );
        self.tickets.create(&ticket).await.map_err(|err| {
            warn!(user_id = %identity.id(), error = %err, "ticket record creation failed");
            map_ticket_repository_error(err)
        })?;

        let role = self.staff.role_of(identity.email());
        info!(user_id = %identity.id(), %role, "registered");
        Ok(SessionView::new(identity, role))
    }
}

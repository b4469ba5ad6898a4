//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie holds the signed-in identity only. The role is re-derived from
//! the staff directory on every request and never written to the cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{EmailAddress, Error, Identity, StaffDirectory, UserId, Viewer};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const EMAIL_KEY: &str = "email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in identity in the session cookie.
    pub fn persist_identity(&self, identity: &Identity) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, identity.id().as_str())?;
        self.insert(EMAIL_KEY, identity.email().as_str())
    }

    fn insert(&self, key: &str, value: &str) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Fetch the signed-in identity, if any.
    ///
    /// A cookie whose fields no longer validate counts as signed out.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        let (Some(raw_id), Some(raw_email)) = (self.read(USER_ID_KEY)?, self.read(EMAIL_KEY)?)
        else {
            return Ok(None);
        };
        match (UserId::new(raw_id), EmailAddress::new(raw_email)) {
            (Ok(id), Ok(email)) => Ok(Some(Identity::new(id, email))),
            (Err(error), _) | (_, Err(error)) => {
                warn!(error = %error, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Signed-in identity with its role, if any.
    pub fn viewer(&self, staff: &StaffDirectory) -> Result<Option<Viewer>, Error> {
        Ok(self.identity()?.map(|identity| {
            let role = staff.role_of(identity.email());
            Viewer::new(identity, role)
        }))
    }

    /// Require a signed-in viewer or return `401 Unauthorized`.
    pub fn require_viewer(&self, staff: &StaffDirectory) -> Result<Viewer, Error> {
        self.viewer(staff)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a staff viewer: `401` when signed out, `403` for guests.
    pub fn require_staff(&self, staff: &StaffDirectory) -> Result<Viewer, Error> {
        let viewer = self.require_viewer(staff)?;
        if viewer.role.is_staff() {
            Ok(viewer)
        } else {
            Err(Error::forbidden("staff access required"))
        }
    }

    /// Drop every session value.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

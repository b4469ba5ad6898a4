//! Authentication primitives: credentials, session view and the mapping from
//! identity-provider failures to what each flow tells the user.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::Serialize;
use serde_json::json;
use zeroize::Zeroizing;

use super::{landing_path, EmailAddress, Error, Identity, IdentityValidationError, Role};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing, blank or malformed.
    Email(IdentityValidationError),
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated email/password pair.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use helpdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Taro@Example.com ", "secret").unwrap();
/// assert_eq!(creds.email().as_str(), "taro@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(LoginValidationError::Email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity-provider interaction the failure arose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    /// Account creation during registration.
    Registration,
    /// Email/password sign-in.
    SignIn,
    /// Password reset email.
    PasswordReset,
}

/// Failure categories reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityFailure {
    /// The provider rejected the email address format.
    InvalidEmail,
    /// Another account already uses the email.
    EmailAlreadyInUse,
    /// The password is below the provider's minimum strength.
    WeakPassword,
    /// Email and password do not match.
    InvalidCredentials,
    /// No account exists for the email.
    UserNotFound,
    /// Anything else, including transport failures.
    Provider,
}

impl IdentityFailure {
    /// Collapse categories a flow does not surface into [`Self::Provider`].
    ///
    /// Sign-in folds an unknown user into bad credentials so the response
    /// does not reveal which accounts exist.
    pub fn surfaced_in(self, flow: AuthFlow) -> Self {
        match (flow, self) {
            (_, Self::InvalidEmail) => Self::InvalidEmail,
            (AuthFlow::Registration, Self::EmailAlreadyInUse | Self::WeakPassword) => self,
            (AuthFlow::SignIn, Self::InvalidCredentials | Self::UserNotFound) => {
                Self::InvalidCredentials
            }
            (AuthFlow::PasswordReset, Self::UserNotFound) => Self::UserNotFound,
            _ => Self::Provider,
        }
    }

    /// Stable detail code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmailAlreadyInUse => "email_already_in_use",
            Self::WeakPassword => "weak_password",
            Self::InvalidCredentials => "invalid_credentials",
            Self::UserNotFound => "user_not_found",
            Self::Provider => "identity_provider_error",
        }
    }

    /// Message shown to the user.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::InvalidEmail => "The email address is malformed.",
            Self::EmailAlreadyInUse => "This email address is already in use.",
            Self::WeakPassword => "The password must be at least 6 characters.",
            Self::InvalidCredentials => "The email address or password is incorrect.",
            Self::UserNotFound => "This email address is not registered.",
            Self::Provider => "Something went wrong. Please try again.",
        }
    }

    /// Domain error for `flow`, carrying `{ code }` details.
    pub fn into_error(self, flow: AuthFlow) -> Error {
        let surfaced = self.surfaced_in(flow);
        let details = json!({ "code": surfaced.code() });
        let error = match surfaced {
            Self::InvalidEmail | Self::WeakPassword => Error::invalid_request(surfaced.user_message()),
            Self::EmailAlreadyInUse => Error::conflict(surfaced.user_message()),
            Self::InvalidCredentials => Error::unauthorized(surfaced.user_message()),
            Self::UserNotFound => Error::not_found(surfaced.user_message()),
            Self::Provider => Error::service_unavailable(surfaced.user_message()),
        };
        error.with_details(details)
    }
}

/// Authenticated session as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub identity: Identity,
    pub role: Role,
    pub landing_path: String,
}

impl SessionView {
    /// Derive the role-dependent fields for `identity`.
    pub fn new(identity: Identity, role: Role) -> Self {
        let landing_path = landing_path(&identity, role);
        Self {
            identity,
            role,
            landing_path,
        }
    }
}

//! Guest registration form.
//!
//! Every field is required. The phone number is reduced to ASCII digits the
//! way the form constrains typing, and the inquiry must hold something other
//! than whitespace.

use std::fmt;

use zeroize::Zeroizing;

use super::{
    EmailAddress, GuestName, IdentityValidationError, InquiryText, PhoneNumber, ProductCode,
    TicketValidationError,
};

/// Raw registration input as submitted.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub product_type: String,
    pub message: String,
}

/// Reasons a registration form is rejected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Ticket field failed validation.
    Field(TicketValidationError),
    /// Email failed validation.
    Email(IdentityValidationError),
    /// No password supplied.
    EmptyPassword,
}

impl RegistrationValidationError {
    /// Form field the error relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Field(err) => err.field(),
            Self::Email(_) => "email",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Field(err) => err.code(),
            Self::Email(IdentityValidationError::EmptyEmail) | Self::EmptyPassword => "required",
            Self::Email(IdentityValidationError::EmailTooLong { .. }) => "too_long",
            Self::Email(_) => "invalid_email",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(err) => err.fmt(f),
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<TicketValidationError> for RegistrationValidationError {
    fn from(value: TicketValidationError) -> Self {
        Self::Field(value)
    }
}

impl From<IdentityValidationError> for RegistrationValidationError {
    fn from(value: IdentityValidationError) -> Self {
        Self::Email(value)
    }
}

/// Validated registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: GuestName,
    pub phone: PhoneNumber,
    pub email: EmailAddress,
    pub password: Zeroizing<String>,
    pub product: ProductCode,
    pub message: InquiryText,
}

/// Keep only ASCII digits.
///
/// # Examples
/// ```
/// use helpdesk::domain::sanitize_phone;
///
/// assert_eq!(sanitize_phone("090-1234-5678"), "09012345678");
/// ```
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

impl RegistrationForm {
    /// Validate raw input. Fields are checked in form order.
    pub fn parse(input: RegistrationInput) -> Result<Self, RegistrationValidationError> {
        let name = GuestName::new(&input.name)?;
        let phone = PhoneNumber::new(sanitize_phone(&input.phone))?;
        let email = EmailAddress::new(&input.email)?;
        if input.password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        let product = ProductCode::new(&input.product_type)?;
        let message = InquiryText::new(input.message)?;
        Ok(Self {
            name,
            phone,
            email,
            password: input.password,
            product,
            message,
        })
    }
}

//! Wire payloads for the Identity Toolkit REST API.

use serde::{Deserialize, Serialize};

/// Body for `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

/// Body for `accounts:sendOobCode`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OobCodeRequestDto<'a> {
    pub(super) request_type: &'static str,
    pub(super) email: &'a str,
}

/// Successful sign-up or sign-in answer. Tokens are ignored; the session
/// cookie is issued by this service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AccountResponseDto {
    pub(super) local_id: String,
    pub(super) email: String,
}

/// Error envelope: `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub(super) message: String,
}

impl ErrorBodyDto {
    /// Reason token without the optional human suffix, e.g.
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub(super) fn reason(&self) -> &str {
        self.message
            .split_once(" : ")
            .map_or(self.message.as_str(), |(reason, _)| reason)
            .trim()
    }
}

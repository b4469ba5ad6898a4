//! Reqwest-backed adapter for an Identity-Toolkit-compatible REST provider.
//!
//! This adapter owns transport details only: request serialisation, the API
//! key, timeouts, and mapping provider reason codes onto
//! [`IdentityProviderError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::warn;

use super::dto::{AccountResponseDto, ErrorEnvelopeDto, OobCodeRequestDto, PasswordRequestDto};
use super::MIN_PASSWORD_LENGTH;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{EmailAddress, Identity, LoginCredentials, UserId};

/// Public Identity Toolkit base URL.
pub const DEFAULT_TOOLKIT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1/";

const SIGN_UP_PATH: &str = "./accounts:signUp";
const SIGN_IN_PATH: &str = "./accounts:signInWithPassword";
const SEND_OOB_CODE_PATH: &str = "./accounts:sendOobCode";

/// Identity provider adapter calling the `accounts:*` REST methods.
pub struct IdentityToolkitProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl IdentityToolkitProvider {
    /// Build an adapter against `endpoint` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: with_trailing_slash(endpoint),
            api_key: api_key.into(),
        })
    }

    fn method_url(&self, path: &str) -> Result<Url, IdentityProviderError> {
        self.endpoint
            .join(path)
            .map_err(|error| IdentityProviderError::unavailable(error.to_string()))
    }

    async fn call<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, IdentityProviderError> {
        let response = self
            .client
            .post(self.method_url(path)?)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn password_call(
        &self,
        path: &str,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Identity, IdentityProviderError> {
        let request = PasswordRequestDto {
            email: email.as_str(),
            password,
            return_secure_token: true,
        };
        let body = self.call(path, &request).await?;
        parse_identity(&body)
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn create_account(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Identity, IdentityProviderError> {
        self.password_call(SIGN_UP_PATH, email, password).await
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Identity, IdentityProviderError> {
        self.password_call(SIGN_IN_PATH, credentials.email(), credentials.password())
            .await
    }

    async fn send_password_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<(), IdentityProviderError> {
        let request = OobCodeRequestDto {
            request_type: "PASSWORD_RESET",
            email: email.as_str(),
        };
        self.call(SEND_OOB_CODE_PATH, &request).await.map(|_| ())
    }
}

fn with_trailing_slash(mut endpoint: Url) -> Url {
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint
}

fn parse_identity(body: &[u8]) -> Result<Identity, IdentityProviderError> {
    let account: AccountResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::rejected(format!("invalid account payload: {error}"))
    })?;
    let id = UserId::new(account.local_id)
        .map_err(|error| IdentityProviderError::rejected(format!("account id: {error}")))?;
    let email = EmailAddress::new(&account.email)
        .map_err(|error| IdentityProviderError::rejected(format!("account email: {error}")))?;
    Ok(Identity::new(id, email))
}

fn map_reason(reason: &str) -> IdentityProviderError {
    match reason {
        "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityProviderError::invalid_email(),
        "EMAIL_EXISTS" => IdentityProviderError::email_already_in_use(),
        "WEAK_PASSWORD" => IdentityProviderError::weak_password(MIN_PASSWORD_LENGTH),
        "EMAIL_NOT_FOUND" => IdentityProviderError::user_not_found(),
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "MISSING_PASSWORD" => {
            IdentityProviderError::invalid_credentials()
        }
        other => IdentityProviderError::rejected(other),
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    warn!(error = %error, "identity provider request failed");
    IdentityProviderError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        warn!(status = status.as_u16(), "identity provider unavailable");
        return IdentityProviderError::unavailable(format!("status {}", status.as_u16()));
    }
    match serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        Ok(envelope) => map_reason(envelope.error.reason()),
        Err(_) => IdentityProviderError::rejected(format!("status {}", status.as_u16())),
    }
}

//! Development identity provider holding accounts in process memory.
//!
//! Passwords are stored as `sha256(salt || password)` with a random 16-byte
//! salt per account. Password reset emails are not sent; the request is only
//! logged.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::MIN_PASSWORD_LENGTH;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{EmailAddress, Identity, LoginCredentials, UserId};

const SALT_LEN: usize = 16;

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    salt: [u8; SALT_LEN],
    password_hash: String,
}

fn hash_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-process [`IdentityProvider`] for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<EmailAddress, Account>>,
}

impl InMemoryIdentityProvider {
    /// Create a provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_account(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Identity, IdentityProviderError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityProviderError::weak_password(MIN_PASSWORD_LENGTH));
        }
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(IdentityProviderError::email_already_in_use());
        }
        let id = UserId::new(Uuid::new_v4().simple().to_string())
            .map_err(|error| IdentityProviderError::rejected(error.to_string()))?;
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let account = Account {
            id: id.clone(),
            salt,
            password_hash: hash_password(&salt, password),
        };
        accounts.insert(email.clone(), account);
        info!(user_id = id.as_str(), "created in-memory account");
        Ok(Identity::new(id, email.clone()))
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Identity, IdentityProviderError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(credentials.email())
            .ok_or_else(IdentityProviderError::user_not_found)?;
        if hash_password(&account.salt, credentials.password()) != account.password_hash {
            return Err(IdentityProviderError::invalid_credentials());
        }
        Ok(Identity::new(account.id.clone(), credentials.email().clone()))
    }

    async fn send_password_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<(), IdentityProviderError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(email)
            .ok_or_else(IdentityProviderError::user_not_found)?;
        info!(user_id = account.id.as_str(), "password reset requested");
        Ok(())
    }
}

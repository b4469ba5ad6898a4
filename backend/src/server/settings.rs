//! Application settings loaded via OrthoConfig (`HELPDESK_*`).

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;

use helpdesk::domain::{DisplayClock, StaffDirectory};
use helpdesk::inbound::ws::state::AllowedOrigins;
use helpdesk::outbound::identity::DEFAULT_TOOLKIT_ENDPOINT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `HELPDESK_BIND_ADDR` is not a socket address.
    #[error("invalid HELPDESK_BIND_ADDR '{value}': {message}")]
    BindAddr { value: String, message: String },
    /// `HELPDESK_DISPLAY_UTC_OFFSET_MINUTES` is beyond ±24 hours.
    #[error("HELPDESK_DISPLAY_UTC_OFFSET_MINUTES={minutes} is out of range")]
    UtcOffset { minutes: i32 },
    /// `HELPDESK_IDENTITY_ENDPOINT` is not an absolute URL.
    #[error("invalid HELPDESK_IDENTITY_ENDPOINT '{value}': {message}")]
    IdentityEndpoint { value: String, message: String },
    /// An identity endpoint was configured without an API key.
    #[error("HELPDESK_IDENTITY_ENDPOINT requires HELPDESK_IDENTITY_API_KEY")]
    MissingIdentityApiKey,
}

/// Where accounts and credentials live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityBackend {
    /// Accounts held in process; lost on restart.
    InMemory,
    /// Identity Toolkit REST API at `endpoint`.
    Toolkit { endpoint: Url, api_key: String },
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELPDESK")]
pub struct AppSettings {
    /// Staff email addresses; a comma-separated list in the environment.
    #[serde(default, deserialize_with = "one_or_many")]
    pub staff_emails: Vec<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Identity Toolkit base URL.
    pub identity_endpoint: Option<String>,
    /// Identity Toolkit API key.
    pub identity_api_key: Option<String>,
    /// Viewer clock offset in minutes east of UTC.
    #[ortho_config(default = 540)]
    pub display_utc_offset_minutes: i32,
    /// WebSocket origins; a comma-separated list in the environment.
    #[serde(default, deserialize_with = "one_or_many")]
    pub allowed_origins: Vec<String>,
}

/// A list given either as one value or as a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(values) => values,
        OneOrMany::One(value) => value.split(',').map(str::to_owned).collect(),
    })
}

impl AppSettings {
    /// Staff allow-list; empty when unset.
    pub fn staff_directory(&self) -> StaffDirectory {
        StaffDirectory::new(&self.staff_emails)
    }

    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        raw.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Viewer clock for the "Today" display policy.
    pub fn display_clock(&self) -> Result<DisplayClock, SettingsError> {
        let minutes = self.display_utc_offset_minutes;
        DisplayClock::from_offset_minutes(minutes).ok_or(SettingsError::UtcOffset { minutes })
    }

    /// WebSocket Origin allow-list.
    pub fn allowed_origins(&self) -> AllowedOrigins {
        AllowedOrigins::new(
            self.allowed_origins
                .iter()
                .map(|entry| entry.trim())
                .filter(|entry| !entry.is_empty()),
        )
    }

    /// Identity backend: in memory unless an API key or endpoint is set.
    pub fn identity_backend(&self) -> Result<IdentityBackend, SettingsError> {
        let endpoint = non_blank(self.identity_endpoint.as_deref());
        let api_key = non_blank(self.identity_api_key.as_deref());
        match (endpoint, api_key) {
            (None, None) => Ok(IdentityBackend::InMemory),
            (Some(_), None) => Err(SettingsError::MissingIdentityApiKey),
            (endpoint, Some(api_key)) => {
                let raw = endpoint.unwrap_or(DEFAULT_TOOLKIT_ENDPOINT);
                let endpoint =
                    Url::parse(raw).map_err(|error| SettingsError::IdentityEndpoint {
                        value: raw.to_owned(),
                        message: error.to_string(),
                    })?;
                Ok(IdentityBackend::Toolkit {
                    endpoint,
                    api_key: api_key.to_owned(),
                })
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

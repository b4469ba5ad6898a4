//! Shared WebSocket adapter state.
//!
//! The socket depends on the chat driving ports rather than on concrete
//! services, so tests can swap in fixtures or mocks.

use std::sync::Arc;

use url::{Origin, Url};

use crate::domain::StaffDirectory;
use crate::domain::ports::{ChatCommand, ChatQuery};

const LOCALHOST: &str = "localhost";

/// Origins permitted to open a chat socket.
///
/// Configured origins are compared by scheme, host and port. Plain HTTP from
/// `localhost` with a non-zero explicit port is always accepted so a local
/// frontend dev server can connect.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    origins: Vec<Origin>,
}

impl AllowedOrigins {
    /// Parse an allow-list; entries that are not absolute URLs are skipped.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::inbound::ws::state::AllowedOrigins;
    /// use url::Url;
    ///
    /// let origins = AllowedOrigins::new(["https://support.example.com"]);
    /// let origin = Url::parse("https://support.example.com").expect("url");
    /// assert!(origins.allows(&origin));
    /// ```
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = entries
            .into_iter()
            .filter_map(|entry| Url::parse(entry.as_ref().trim()).ok())
            .map(|url| url.origin())
            .filter(Origin::is_tuple)
            .collect();
        Self { origins }
    }

    /// Whether `origin` may upgrade.
    #[must_use]
    pub fn allows(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };
        if origin.scheme() == "http" && host == LOCALHOST {
            return matches!(origin.port(), Some(port) if port != 0);
        }
        let candidate = origin.origin();
        self.origins.iter().any(|allowed| *allowed == candidate)
    }
}

/// Dependency bundle for the chat socket.
#[derive(Clone)]
pub struct WsState {
    pub chat_query: Arc<dyn ChatQuery>,
    pub chat_command: Arc<dyn ChatCommand>,
    pub staff: Arc<StaffDirectory>,
    pub origins: Arc<AllowedOrigins>,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        chat_query: Arc<dyn ChatQuery>,
        chat_command: Arc<dyn ChatCommand>,
        staff: Arc<StaffDirectory>,
        origins: AllowedOrigins,
    ) -> Self {
        Self {
            chat_query,
            chat_command,
            staff,
            origins: Arc::new(origins),
        }
    }
}

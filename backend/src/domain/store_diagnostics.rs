//! Recognise query-configuration failures reported by the document store.
//!
//! Stores that need a composite index for a query reject it with a message
//! that mentions the index and usually links to a page that creates it. The
//! hint is logged next to the failure so an operator can fix configuration.

use std::sync::OnceLock;

use regex::Regex;

static INDEX_URL_RE: OnceLock<Regex> = OnceLock::new();

fn index_url_regex() -> &'static Regex {
    INDEX_URL_RE.get_or_init(|| {
        Regex::new(r"https://[^\s)]+")
            .unwrap_or_else(|error| panic!("index url regex failed to compile: {error}"))
    })
}

/// Remediation for a missing store index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingIndexHint {
    /// Link that creates the index, when the store supplied one.
    pub create_url: Option<String>,
}

impl MissingIndexHint {
    /// One-line remediation message.
    pub fn remediation(&self) -> String {
        match &self.create_url {
            Some(url) => format!("query requires an index; create it at {url}"),
            None => "query requires an index; add one for the filtered fields".to_owned(),
        }
    }
}

/// Detect a missing-index failure in a store error message.
///
/// # Examples
/// ```
/// use helpdesk::domain::detect_missing_index;
///
/// let hint = detect_missing_index(
///     "The query requires an index. You can create it here: https://console.example/idx?c=1",
/// )
/// .unwrap();
/// assert_eq!(hint.create_url.as_deref(), Some("https://console.example/idx?c=1"));
/// assert!(detect_missing_index("connection reset").is_none());
/// ```
pub fn detect_missing_index(message: &str) -> Option<MissingIndexHint> {
    if !message.to_lowercase().contains("index") {
        return None;
    }
    let create_url = index_url_regex()
        .find(message)
        .map(|found| found.as_str().to_owned());
    Some(MissingIndexHint { create_url })
}

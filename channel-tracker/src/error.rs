//! Error taxonomy shared by every component of the tracker.

/// Errors produced while resolving, persisting or looking up channels.
///
/// Every variant is recoverable: the [`ViewController`](crate::ViewController) turns any of them
/// into a single user-visible message and falls back to its last stable page.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user-supplied text does not look like a channel URL.
    #[error("invalid channel URL: {0}")]
    InvalidUrl(String),

    /// An upstream query came back without any results.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required field was missing or empty; no request was issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The row store could not be reached or answered with a non-2xx status.
    #[error("row store unavailable{}: {message}", status_suffix(.status))]
    StoreUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// The video platform could not be reached or answered with a non-2xx status.
    #[error("video platform unavailable{}: {message}", status_suffix(.status))]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// The runtime configuration is incomplete or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

// reqwest's Display includes the request URL, and platform URLs carry the API key.
impl Error {
    pub(crate) fn store_transport(e: reqwest::Error) -> Self {
        Error::StoreUnavailable {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    pub(crate) fn upstream_transport(e: reqwest::Error) -> Self {
        Error::UpstreamUnavailable {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unavailable_messages_carry_status() {
        let e = Error::StoreUnavailable {
            status: Some(401),
            message: "invalid token".into(),
        };
        assert_eq!(e.to_string(), "row store unavailable (status 401): invalid token");

        let e = Error::UpstreamUnavailable {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(e.to_string(), "video platform unavailable: connection refused");
    }
}

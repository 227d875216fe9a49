// Error types for webber.
// Covers URL construction, transport, decoding, and local store failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebberError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Response body is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array, found {0}")]
    NotAnArray(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing WEBBER_SERVER environment variable")]
    MissingServer,

    #[error("{0}")]
    Other(String),
}

impl WebberError {
    /// Whether this error came from the network side of a lookup.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            WebberError::InvalidUrl(_)
                | WebberError::Network(_)
                | WebberError::Status { .. }
                | WebberError::Encoding(_)
        )
    }

    /// Whether this error came from decoding a body as a JSON array.
    pub fn is_decode(&self) -> bool {
        matches!(self, WebberError::Json(_) | WebberError::NotAnArray(_))
    }
}

pub type Result<T> = std::result::Result<T, WebberError>;

//! Unified error type for the textless image provider.
//!
//! Metadata lookups, providers and the registry all return [`Error`], which
//! carries enough context for API handlers to derive an HTTP status code via
//! [`Error::http_status`]. Absent metadata is never an error: providers return
//! an empty image list instead.

/// Result alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type covering all failure modes of a metadata lookup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller's cancellation token fired while the operation was in flight.
    #[error("Operation cancelled")]
    Cancelled,

    /// The HTTP request could not be sent or the response body could not be read.
    #[error("HTTP error: {source}")]
    Http {
        /// The underlying transport error.
        #[from]
        source: reqwest::Error,
    },

    /// The metadata provider answered with a non-success status.
    #[error("{url} returned {status}")]
    Status {
        /// HTTP status returned upstream.
        status: u16,
        /// Request URL with the API key stripped.
        url: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request data failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The metadata client is not configured (e.g. missing API key).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            // nginx's "client closed request"
            Self::Cancelled => 499,
            Self::Http { .. } | Self::Status { .. } | Self::Decode(_) => 502,
            Self::InvalidRequest(_) => 400,
            Self::Config(_) => 503,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Http { .. } => "upstream_unreachable",
            Self::Status { .. } => "upstream_status",
            Self::Decode(_) => "upstream_decode",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Config(_) => "not_configured",
        }
    }

    /// Returns `true` for [`Error::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

//! Error types for the CRPT client library.

use thiserror::Error;

/// The main error type for all CRPT client operations.
#[derive(Error, Debug)]
pub enum CrptError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The registry answered with a non-success status
    #[error("Registry API error: {0}")]
    Api(ApiError),

    /// Invalid client construction parameters
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The caller was cancelled while waiting for admission
    #[error("Admission cancelled before the request was sent")]
    Cancelled,

    /// Waiting for admission took longer than the caller allowed
    #[error("Timed out waiting for admission")]
    Timeout,

    /// The rate limiter has been shut down
    #[error("Rate limiter has been shut down")]
    LimiterClosed,

    /// The request could not be turned into an HTTP request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CrptError {
    /// Check if the request reached the transport and failed there.
    ///
    /// Transport failures consume an admission; the budget is not refunded.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            CrptError::Http(_) | CrptError::HttpMiddleware(_) | CrptError::Api(_)
        )
    }

    /// Check if the caller gave up before being admitted.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CrptError::Cancelled)
    }

    /// HTTP status of the failed response, if the registry answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CrptError::Api(api_error) => Some(api_error.status),
            CrptError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Non-success answer from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code returned by the registry
    pub status: u16,
    /// Response body, lossily decoded as UTF-8
    pub body: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.body.is_empty() {
            write!(f, "HTTP {}", self.status)
        } else {
            write!(f, "HTTP {}: {}", self.status, self.body)
        }
    }
}

impl ApiError {
    /// Create a new API error from a status code and raw body.
    pub fn new(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Check if the registry rejected the request itself (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the registry failed to process the request (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Check if the registry rejected the signature or credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Invalid rate limiter or client construction parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Request limit must be greater than zero
    #[error("request limit must be greater than 0")]
    ZeroRequestLimit,

    /// Window duration must be greater than zero
    #[error("window duration must be greater than 0")]
    ZeroWindow,

    /// Window is too long to schedule resets for
    #[error("window duration is too large to schedule")]
    WindowTooLarge,

    /// The reset driver needs a running tokio runtime
    #[error("rate limiter must be created inside a tokio runtime")]
    NoRuntime,
}

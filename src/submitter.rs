//! Rate-limited document submission.
//!
//! [`DocumentSubmitter`] gates every submission behind a shared
//! [`RateLimiter`] and hands admitted requests to a [`Transport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use crpt_api_client::{CrptClient, Signature};
//! # use crpt_api_client::types::Document;
//!
//! # async fn run(document: Document) -> Result<(), crpt_api_client::CrptError> {
//! // At most 10 submissions per second, shared by every clone of the client
//! let client = CrptClient::new(10, Duration::from_secs(1))?;
//!
//! let response = client.submit(&document, &Signature::new("base64-signature")).await?;
//! println!("Registry answered: {}", response.text());
//!
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ApiError, CrptError};
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::transport::{HttpTransport, Transport, TransportResponse};
use crate::types::{Document, Signature};

/// Client for the production registry over HTTP.
pub type CrptClient = DocumentSubmitter<HttpTransport>;

/// An encoded document and its signature, passed to the transport unchanged.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// JSON-encoded document
    pub payload: Vec<u8>,
    /// Detached signature of the document
    pub signature: Signature,
}

impl SubmissionRequest {
    /// Create a request from an already encoded payload.
    pub fn new(payload: impl Into<Vec<u8>>, signature: impl Into<Signature>) -> Self {
        Self {
            payload: payload.into(),
            signature: signature.into(),
        }
    }

    /// Encode a document into a request.
    pub fn from_document(document: &Document, signature: &Signature) -> Result<Self, CrptError> {
        Ok(Self {
            payload: document.to_json()?,
            signature: signature.clone(),
        })
    }
}

/// Classified result of a submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The registry accepted the document
    Success(TransportResponse),
    /// The request was sent and failed, or could not be sent over the network
    TransportFailure(CrptError),
    /// The caller gave up while waiting for admission; nothing was sent
    Cancelled,
    /// The request was never admitted (timeout, closed limiter, unsendable signature)
    Rejected(CrptError),
}

impl SubmissionOutcome {
    /// Check if the registry accepted the document.
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }
}

impl From<Result<TransportResponse, CrptError>> for SubmissionOutcome {
    fn from(result: Result<TransportResponse, CrptError>) -> Self {
        match result {
            Ok(response) => SubmissionOutcome::Success(response),
            Err(CrptError::Cancelled) => SubmissionOutcome::Cancelled,
            Err(e) if e.is_transport_failure() => SubmissionOutcome::TransportFailure(e),
            Err(e) => SubmissionOutcome::Rejected(e),
        }
    }
}

/// Submits documents through a [`Transport`], at most `request_limit` per window.
///
/// Every admitted submission results in exactly one transport call. Failed
/// calls are not retried and still count against the window, so the limit
/// bounds attempts rather than successes.
///
/// Clones share the same limiter and transport.
pub struct DocumentSubmitter<T> {
    transport: Arc<T>,
    limiter: Arc<RateLimiter>,
}

impl DocumentSubmitter<HttpTransport> {
    /// Create a client for the production registry.
    ///
    /// # Errors
    ///
    /// Fails with [`CrptError::Config`] if `request_limit` or `window` is zero
    /// or no tokio runtime is running.
    pub fn new(request_limit: u32, window: Duration) -> Result<Self, CrptError> {
        let config = RateLimitConfig::new(request_limit, window)?;
        Self::with_transport(HttpTransport::new()?, config)
    }
}

impl<T: Transport> DocumentSubmitter<T> {
    /// Create a submitter around a custom transport.
    pub fn with_transport(transport: T, config: RateLimitConfig) -> Result<Self, CrptError> {
        Ok(Self {
            transport: Arc::new(transport),
            limiter: Arc::new(RateLimiter::new(config)?),
        })
    }

    /// Encode and submit a document, waiting for admission if needed.
    ///
    /// The document is encoded before admission, so an encoding error does
    /// not consume any budget.
    pub async fn submit(
        &self,
        document: &Document,
        signature: &Signature,
    ) -> Result<TransportResponse, CrptError> {
        let request = SubmissionRequest::from_document(document, signature)?;
        self.submit_request(&request).await
    }

    /// Submit an already encoded request, waiting for admission if needed.
    ///
    /// The transport checks the signature first; a signature it could never
    /// send is rejected without consuming budget.
    pub async fn submit_request(
        &self,
        request: &SubmissionRequest,
    ) -> Result<TransportResponse, CrptError> {
        self.transport.validate_signature(&request.signature)?;
        self.limiter.acquire().await?;
        self.dispatch(request).await
    }

    /// Submit a request unless `cancel` completes before it is admitted.
    ///
    /// Once admitted, the request is sent regardless of `cancel`.
    pub async fn submit_with_cancel<F>(
        &self,
        request: &SubmissionRequest,
        cancel: F,
    ) -> Result<TransportResponse, CrptError>
    where
        F: Future<Output = ()>,
    {
        self.transport.validate_signature(&request.signature)?;
        self.limiter.acquire_or_cancel(cancel).await?;
        self.dispatch(request).await
    }

    /// Submit a request, waiting at most `timeout` for admission.
    pub async fn submit_with_timeout(
        &self,
        request: &SubmissionRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, CrptError> {
        self.transport.validate_signature(&request.signature)?;
        self.limiter.acquire_timeout(timeout).await?;
        self.dispatch(request).await
    }

    /// Send an admitted request and classify the answer.
    async fn dispatch(&self, request: &SubmissionRequest) -> Result<TransportResponse, CrptError> {
        let response = self
            .transport
            .send(request.payload.clone(), &request.signature)
            .await?;

        if response.is_success() {
            tracing::debug!(status = response.status, "document submitted");
            Ok(response)
        } else {
            tracing::warn!(status = response.status, "registry rejected document");
            Err(CrptError::Api(ApiError::new(response.status, &response.body)))
        }
    }

    /// Get the shared rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stop the window reset task and reject pending and future submissions.
    pub async fn shutdown(&self) {
        self.limiter.shutdown().await;
    }
}

impl<T> Clone for DocumentSubmitter<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            limiter: Arc::clone(&self.limiter),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DocumentSubmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSubmitter")
            .field("transport", &self.transport)
            .field("limiter", &self.limiter)
            .finish()
    }
}

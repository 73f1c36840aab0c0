//! Transport layer for document submission.
//!
//! The [`Transport`] trait is the seam between admission control and the
//! network. [`HttpTransport`] is the default implementation; tests and
//! alternative backends can provide their own.
//!
//! ```rust,ignore
//! use crpt_api_client::transport::{Transport, TransportResponse};
//! use crpt_api_client::types::Signature;
//! use crpt_api_client::CrptError;
//!
//! struct AlwaysOk;
//!
//! impl Transport for AlwaysOk {
//!     async fn send(
//!         &self,
//!         _payload: Vec<u8>,
//!         _signature: &Signature,
//!     ) -> Result<TransportResponse, CrptError> {
//!         Ok(TransportResponse::new(200, Vec::new()))
//!     }
//! }
//! ```

mod endpoints;
mod http;

pub use endpoints::*;
pub use http::{HttpTransport, HttpTransportBuilder};

use std::future::Future;
use std::sync::Arc;

use crate::error::CrptError;
use crate::types::Signature;

/// Capability to deliver one encoded document to the registry.
///
/// Implementations must not retry on their own; every call is one attempt.
pub trait Transport: Send + Sync {
    /// Send an encoded document with its signature.
    ///
    /// Any HTTP status is returned as `Ok`; classification happens in the
    /// caller. `Err` is reserved for failures where no status was received.
    fn send(
        &self,
        payload: Vec<u8>,
        signature: &Signature,
    ) -> impl Future<Output = Result<TransportResponse, CrptError>> + Send;

    /// Check that `signature` can be sent at all.
    ///
    /// Called before a request is admitted, so a request that could never be
    /// sent does not consume budget.
    fn validate_signature(&self, _signature: &Signature) -> Result<(), CrptError> {
        Ok(())
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        payload: Vec<u8>,
        signature: &Signature,
    ) -> impl Future<Output = Result<TransportResponse, CrptError>> + Send {
        (**self).send(payload, signature)
    }

    fn validate_signature(&self, signature: &Signature) -> Result<(), CrptError> {
        (**self).validate_signature(signature)
    }
}

/// Raw answer from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The registry only reports success with status 200.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T>(&self) -> Result<T, CrptError>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

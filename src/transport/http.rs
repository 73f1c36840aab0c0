//! HTTP transport for the CRPT registry.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use url::Url;

use crate::error::CrptError;
use crate::transport::endpoints::{CRPT_BASE_URL, DOCUMENTS_CREATE, SIGNATURE_HEADER};
use crate::transport::{Transport, TransportResponse};
use crate::types::Signature;

/// Transport that POSTs documents to the registry over HTTPS.
///
/// Every call is a single attempt: there is no retry middleware, so a failed
/// request is reported to the caller as-is.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use crpt_api_client::transport::HttpTransport;
///
/// # fn main() -> Result<(), crpt_api_client::CrptError> {
/// let transport = HttpTransport::builder()
///     .base_url("https://markirovka.sandbox.crptech.ru")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    http_client: ClientWithMiddleware,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport pointing at the production registry.
    pub fn new() -> Result<Self, CrptError> {
        Self::builder().build()
    }

    /// Create a new transport builder.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Full URL documents are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        payload: Vec<u8>,
        signature: &Signature,
    ) -> Result<TransportResponse, CrptError> {
        let signature_value = signature_header(signature)?;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .header(SIGNATURE_HEADER, signature_value)
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status, body_len = body.len(), "registry responded");

        Ok(TransportResponse { status, body })
    }

    fn validate_signature(&self, signature: &Signature) -> Result<(), CrptError> {
        signature_header(signature).map(|_| ())
    }
}

fn signature_header(signature: &Signature) -> Result<HeaderValue, CrptError> {
    let mut value = HeaderValue::from_str(signature.expose_secret()).map_err(|_| {
        CrptError::InvalidRequest("signature is not a valid header value".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    base_url: String,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: CRPT_BASE_URL.to_string(),
            user_agent: None,
            timeout: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a timeout for the whole request, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns [`CrptError::Url`] if the base URL does not parse.
    pub fn build(self) -> Result<HttpTransport, CrptError> {
        let endpoint = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            DOCUMENTS_CREATE
        ))?;

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("crpt-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("crpt-api-client"));
        headers.insert(USER_AGENT, header_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut reqwest_builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            reqwest_builder = reqwest_builder.timeout(timeout);
        }

        let client = ClientBuilder::new(reqwest_builder.build()?)
            .with(TracingMiddleware::default())
            .build();

        Ok(HttpTransport {
            http_client: client,
            endpoint,
        })
    }
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(
            transport.endpoint().as_str(),
            "https://ismp.crpt.ru/api/v3/lk/documents/create"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let transport = HttpTransport::builder()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(
            transport.endpoint().as_str(),
            "http://localhost:8080/api/v3/lk/documents/create"
        );
    }

    #[test]
    fn test_signature_must_be_a_header_value() {
        let transport = HttpTransport::new().unwrap();
        assert!(transport.validate_signature(&Signature::new("c2lnbmF0dXJl")).is_ok());
        assert!(matches!(
            transport.validate_signature(&Signature::new("bad\nsig")),
            Err(CrptError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_invalid_base_url_fails_fast() {
        let result = HttpTransport::builder().base_url("not a url").build();
        assert!(matches!(result, Err(CrptError::Url(_))));
    }
}

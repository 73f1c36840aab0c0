//! Example: Watching the fixed-window limiter throttle a burst.
//!
//! Run with: RUST_LOG=crpt_api_client=trace cargo run --example rate_limit

use std::time::Duration;

use crpt_api_client::transport::{Transport, TransportResponse};
use crpt_api_client::{
    CrptError, DocumentSubmitter, RateLimitConfig, Signature, SubmissionRequest,
};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

/// Pretends every document is accepted.
struct AcceptAll;

impl Transport for AcceptAll {
    async fn send(
        &self,
        payload: Vec<u8>,
        _signature: &Signature,
    ) -> Result<TransportResponse, CrptError> {
        Ok(TransportResponse::new(200, payload))
    }
}

#[tokio::main]
async fn main() -> Result<(), CrptError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RateLimitConfig::new(3, Duration::from_secs(1))?;
    let submitter = DocumentSubmitter::with_transport(AcceptAll, config)?;
    let start = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let submitter = submitter.clone();
            tokio::spawn(async move {
                let request = SubmissionRequest::new(format!(r#"{{"doc_id":"{}"}}"#, id), "sig");
                let result = submitter.submit_request(&request).await;
                (id, result.is_ok(), start.elapsed())
            })
        })
        .collect();

    for handle in handles {
        if let Ok((id, ok, elapsed)) = handle.await {
            println!("document {} ok={} after {:?}", id, ok, elapsed);
        }
    }

    println!("Budget left: {}", submitter.limiter().budget().await);
    submitter.shutdown().await;
    Ok(())
}

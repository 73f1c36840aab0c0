//! Example: Submitting a document to the registry.
//!
//! Run with: CRPT_SIGNATURE=... cargo run --example submit_document
//!
//! Set CRPT_BASE_URL to target a sandbox instead of production.

use std::time::Duration;

use crpt_api_client::transport::HttpTransport;
use crpt_api_client::types::{DocType, Document, Product};
use crpt_api_client::{DocumentSubmitter, RateLimitConfig, Signature, SubmissionOutcome};
use time::macros::date;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut builder = HttpTransport::builder().timeout(Duration::from_secs(30));
    if let Ok(base_url) = std::env::var("CRPT_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    let signature = Signature::new(std::env::var("CRPT_SIGNATURE").unwrap_or_default());

    let client = DocumentSubmitter::with_transport(builder.build()?, RateLimitConfig::per_minute(10)?)?;

    let document = Document {
        description: None,
        doc_id: "demo-1".to_string(),
        doc_status: "DRAFT".to_string(),
        doc_type: DocType::LpIntroduceGoods,
        import_request: false,
        owner_inn: "7700000000".to_string(),
        participant_inn: "7700000000".to_string(),
        producer_inn: "7700000000".to_string(),
        production_date: date!(2024 - 06 - 01),
        production_type: "OWN_PRODUCTION".to_string(),
        products: vec![Product {
            certificate_document: None,
            certificate_document_date: None,
            certificate_document_number: None,
            owner_inn: "7700000000".to_string(),
            producer_inn: "7700000000".to_string(),
            production_date: date!(2024 - 06 - 01),
            tnved_code: "6401100000".to_string(),
            uit_code: None,
            uitu_code: None,
        }],
        reg_date: date!(2024 - 06 - 02),
        reg_number: None,
    };

    match SubmissionOutcome::from(client.submit(&document, &signature).await) {
        SubmissionOutcome::Success(response) => println!("Accepted: {}", response.text()),
        SubmissionOutcome::TransportFailure(err) => println!("Registry call failed: {}", err),
        SubmissionOutcome::Cancelled => println!("Cancelled"),
        SubmissionOutcome::Rejected(err) => println!("Not admitted: {}", err),
    }

    client.shutdown().await;
    Ok(())
}

//! Example: Working with CrptError and SubmissionOutcome.
//!
//! Run with: cargo run --example error_handling

use crpt_api_client::transport::TransportResponse;
use crpt_api_client::{ApiError, CrptError, SubmissionOutcome};

fn describe(result: Result<TransportResponse, CrptError>) {
    match SubmissionOutcome::from(result) {
        SubmissionOutcome::Success(response) => println!("Accepted: {}", response.text()),
        SubmissionOutcome::TransportFailure(err) => {
            println!("Sent but failed (status {:?}): {}", err.status(), err)
        }
        SubmissionOutcome::Cancelled => println!("Cancelled before admission, nothing sent"),
        SubmissionOutcome::Rejected(err) => println!("Never admitted: {}", err),
    }
}

fn main() {
    let api_error = ApiError::new(403, b"signature verification failed");
    println!("API error: {}", api_error);
    println!("Is unauthorized: {}", api_error.is_unauthorized());

    describe(Ok(TransportResponse::new(200, r#"{"value":"doc-1"}"#)));
    describe(Err(CrptError::Api(api_error)));
    describe(Err(CrptError::Cancelled));
    describe(Err(CrptError::Timeout));
}

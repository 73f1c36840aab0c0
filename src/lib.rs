//! # CRPT Client
//!
//! An async Rust client for submitting documents to the CRPT registry API
//! under a strict request limit.
//!
//! ## Features
//!
//! - Fixed-window rate limiting shared by every task using a client
//! - Blocking admission without polling, with cancellation and timeouts
//! - Pluggable [`Transport`](transport::Transport) with an HTTP default
//! - Strongly typed document model
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use crpt_api_client::{CrptClient, Signature};
//! # use crpt_api_client::types::Document;
//!
//! # async fn run(document: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let client = CrptClient::new(5, Duration::from_secs(1))?;
//! let response = client.submit(&document, &Signature::new("signature")).await?;
//! println!("Accepted: {}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod rate_limit;
pub mod submitter;
pub mod transport;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ApiError, ConfigError, CrptError};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use submitter::{CrptClient, DocumentSubmitter, SubmissionOutcome, SubmissionRequest};
pub use types::{Document, Signature};

/// Result type alias using CrptError
pub type Result<T> = std::result::Result<T, CrptError>;

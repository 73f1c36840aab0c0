//! Document model and request types for the CRPT registry.

pub mod document;
pub mod serde_helpers;
mod signature;

pub use document::{DocType, Document, Product};
pub use signature::Signature;

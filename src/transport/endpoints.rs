//! CRPT registry endpoint constants.

/// Base URL for the CRPT registry API.
pub const CRPT_BASE_URL: &str = "https://ismp.crpt.ru";

/// Create a document in the registry.
pub const DOCUMENTS_CREATE: &str = "/api/v3/lk/documents/create";

/// Header carrying the caller-provided document signature.
pub const SIGNATURE_HEADER: &str = "signature";

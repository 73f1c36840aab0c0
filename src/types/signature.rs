//! Caller-provided document signature.

use secrecy::{ExposeSecret, SecretString};

/// Detached signature sent alongside a document.
///
/// The value is produced by the caller and passed through unchanged. It is
/// kept out of `Debug` output and logs.
#[derive(Clone)]
pub struct Signature(SecretString);

impl Signature {
    /// Wrap an already computed signature.
    pub fn new(signature: impl Into<String>) -> Self {
        Self(SecretString::from(signature.into()))
    }

    /// Get the raw signature for sending.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Check if the signature is empty.
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl From<String> for Signature {
    fn from(signature: String) -> Self {
        Self::new(signature)
    }
}

impl From<&str> for Signature {
    fn from(signature: &str) -> Self {
        Self::new(signature)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Signature([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_debug_is_redacted() {
        let signature = Signature::new("MIIB-very-secret");
        assert_eq!(format!("{:?}", signature), "Signature([REDACTED])");
        assert_eq!(signature.expose_secret(), "MIIB-very-secret");
    }
}

//! # Program Fingerprints
//!
//! SHA-256 fingerprints over rendered program text. They identify each
//! compiled geometry fact set and tag every entry of the solved program log.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 fingerprint of some program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Render the fingerprint as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The first eight hex characters, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 fingerprint of `text`.
pub fn sha256_fingerprint(text: &str) -> Fingerprint {
    let hash = Sha256::digest(text.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Fingerprint(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = sha256_fingerprint("overlaps(l_a, l_a).\n");
        let b = sha256_fingerprint("overlaps(l_a, l_a).\n");
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_different_fingerprint() {
        assert_ne!(sha256_fingerprint("a."), sha256_fingerprint("b."));
    }

    #[test]
    fn known_empty_vector() {
        assert_eq!(
            sha256_fingerprint("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_and_short_forms() {
        let fp = sha256_fingerprint("");
        assert!(fp.to_string().starts_with("sha256:"));
        assert_eq!(fp.to_string().len(), 7 + 64);
        assert_eq!(fp.short(), "e3b0c442");
    }
}

use sha2::{Digest, Sha256};

/// Shared secret for inbound revalidation requests.
///
/// Only the SHA-256 digest is kept; candidates are hashed and compared in
/// constant time so neither length nor content leaks through timing.
#[derive(Clone)]
pub struct SharedSecret {
    digest: Option<[u8; 32]>,
}

impl SharedSecret {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            digest: secret.filter(|s| !s.is_empty()).map(hash),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// True only when a secret is configured and `candidate` matches it.
    pub fn verify(&self, candidate: Option<&str>) -> bool {
        let (Some(expected), Some(candidate)) = (self.digest.as_ref(), candidate) else {
            return false;
        };
        let actual = hash(candidate);
        expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("configured", &self.is_configured())
            .finish()
    }
}

fn hash(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

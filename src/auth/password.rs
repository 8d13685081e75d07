//! Password digests and login tokens

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the password.
///
/// Unsalted; kept so digests stored by earlier deployments still verify.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a plaintext password against a stored digest
pub fn verify_password(password: &str, digest: &str) -> bool {
    let candidate = hash_password(password);
    candidate.len() == digest.len()
        && candidate
            .bytes()
            .zip(digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Opaque token handed back on login. Not stored server-side.
pub fn session_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

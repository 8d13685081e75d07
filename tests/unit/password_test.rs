//! Unit tests for password digests and login tokens

use attachment_management::auth::{hash_password, session_token, verify_password};

#[test]
fn test_digest_is_lowercase_hex_sha256() {
    let digest = hash_password("testpass123");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_digest_is_deterministic() {
    assert_eq!(hash_password("password123"), hash_password("password123"));
    assert_ne!(hash_password("password123"), hash_password("Password123"));
}

#[test]
fn test_wrong_password_fails() {
    let stored = hash_password("password123");
    assert!(verify_password("password123", &stored));
    assert!(!verify_password("wrong-password", &stored));
    assert!(!verify_password("", &stored));
}

#[test]
fn test_empty_password_digest() {
    assert_eq!(
        hash_password(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_session_token_format() {
    let token = session_token();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

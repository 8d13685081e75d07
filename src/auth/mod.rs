//! Credentials and identity helpers

pub mod oauth;
pub mod password;

pub use oauth::{GoogleOAuthService, IdTokenClaims, OAuthProvider, OAuthTokens, OAuthUserInfo};
pub use password::{hash_password, session_token, verify_password};

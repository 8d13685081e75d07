//! Google OAuth 2.0 helper
//!
//! Builds the consent URL, exchanges authorization codes and looks up the
//! signed-in user. The service is created when `oauth.enabled` is set; no
//! route calls it yet.

use crate::config::OAuthConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const STATE_LEN: usize = 32;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Profile returned by the userinfo endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthUserInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub verified_email: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Claims reported by the tokeninfo endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdTokenClaims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exp: Option<String>,
}

/// An external identity provider
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Consent page URL and the anti-forgery state embedded in it
    fn authorization_url(&self) -> Result<(String, String)>;

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens>;

    async fn user_info(&self, access_token: &str) -> Result<OAuthUserInfo>;

    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims>;
}

/// Google implementation of [`OAuthProvider`]
pub struct GoogleOAuthService {
    config: OAuthConfig,
    client: Client,
}

impl GoogleOAuthService {
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    fn random_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect()
    }

    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("{} {}", status, body.trim())
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthService {
    fn authorization_url(&self) -> Result<(String, String)> {
        let state = Self::random_state();
        let scope = self.config.scopes.join(" ");

        let url = Url::parse_with_params(
            &self.config.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
                ("access_type", "offline"),
                ("include_granted_scopes", "true"),
            ],
        )
        .map_err(|e| AppError::OAuth(format!("Invalid authorization URI: {}", e)))?;

        Ok((url.to_string(), state))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        debug!(token_uri = %self.config.token_uri, "Exchanging authorization code");

        let response = self
            .client
            .post(&self.config.token_uri)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_body(response).await;
            warn!(detail = %detail, "Token exchange rejected");
            return Err(AppError::OAuth(format!(
                "Failed to exchange code for tokens: {}",
                detail
            )));
        }

        Ok(response.json::<OAuthTokens>().await?)
    }

    async fn user_info(&self, access_token: &str) -> Result<OAuthUserInfo> {
        let response = self
            .client
            .get(&self.config.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_body(response).await;
            return Err(AppError::OAuth(format!("Failed to get user info: {}", detail)));
        }

        Ok(response.json::<OAuthUserInfo>().await?)
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims> {
        let response = self
            .client
            .get(&self.config.tokeninfo_uri)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_body(response).await;
            return Err(AppError::OAuth(format!("Failed to verify ID token: {}", detail)));
        }

        let claims = response.json::<IdTokenClaims>().await?;

        if claims.aud != self.config.client_id {
            return Err(AppError::OAuth(
                "Failed to verify ID token: audience mismatch".to_string(),
            ));
        }
        if !GOOGLE_ISSUERS.contains(&claims.iss.as_str()) {
            return Err(AppError::OAuth(format!(
                "Failed to verify ID token: unexpected issuer {}",
                claims.iss
            )));
        }

        Ok(claims)
    }
}

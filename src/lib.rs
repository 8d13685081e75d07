//! Attachment Management Service
//!
//! Students register, book attachment slots and have attendance marked;
//! administrators read aggregate reports. State lives in a single SQLite
//! file accessed through [`storage::Database`].

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use auth::{GoogleOAuthService, OAuthProvider};
use storage::Database;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<RwLock<config::Settings>>,
    pub database: Database,
    /// Present when `oauth.enabled` is set
    pub oauth: Option<Arc<dyn OAuthProvider>>,
}

impl AppState {
    /// Assemble state from loaded settings and an initialized database
    pub fn new(settings: config::Settings, database: Database) -> Result<Self> {
        let oauth: Option<Arc<dyn OAuthProvider>> = if settings.oauth.enabled {
            info!("Google OAuth helper enabled");
            Some(Arc::new(GoogleOAuthService::new(settings.oauth.clone())?))
        } else {
            None
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            database,
            oauth,
        })
    }
}

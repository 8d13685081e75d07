//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config/ams.yaml";
const ENV_PREFIX: &str = "AMS";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub pages: PagesConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// SQLite database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
}

fn default_database_path() -> String {
    "database.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

/// Which of the two route layouts the server exposes.
///
/// `Portal` serves the dashboard pages and prefixes the JSON API with
/// `/api`; it allows one booking per user and rejects repeated attendance.
/// `Classic` serves the JSON API from the root path, allows several
/// bookings per user and overwrites repeated attendance.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiVariant {
    #[default]
    Portal,
    Classic,
}

impl std::fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVariant::Portal => write!(f, "portal"),
            ApiVariant::Classic => write!(f, "classic"),
        }
    }
}

/// API behaviour configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub variant: ApiVariant,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_recent_limit() -> u32 {
    5
}

/// Static page locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagesConfig {
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Google OAuth 2.0 client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_userinfo_uri")]
    pub userinfo_uri: String,
    #[serde(default = "default_tokeninfo_uri")]
    pub tokeninfo_uri: String,
}

fn default_redirect_uri() -> String {
    "http://localhost:5000/auth/google/callback".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/userinfo.email".to_string(),
        "https://www.googleapis.com/auth/userinfo.profile".to_string(),
    ]
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_uri() -> String {
    "https://www.googleapis.com/oauth2/v2/userinfo".to_string()
}

fn default_tokeninfo_uri() -> String {
    "https://oauth2.googleapis.com/tokeninfo".to_string()
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
            userinfo_uri: default_userinfo_uri(),
            tokeninfo_uri: default_tokeninfo_uri(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load settings from a specific configuration file (YAML or TOML).
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
        {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("database.path", default_database_path())?
            .set_default("database.max_connections", default_max_connections())?
            .set_default("database.busy_timeout_ms", default_busy_timeout())?
            .set_default("database.seed_sample_data", true)?
            .set_default("api.variant", ApiVariant::default().to_string())?
            .set_default("api.admin_email", default_admin_email())?
            .set_default("api.recent_limit", default_recent_limit())?
            .set_default("pages.template_dir", default_template_dir())?
            .set_default("pages.static_dir", default_static_dir())?
            .set_default("cors.enabled", true)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        if path.exists() {
            config_builder = config_builder.add_source(File::from(path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .with_list_parse_key("oauth.scopes")
                .try_parsing(true),
        );

        let config = config_builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.database.path.trim().is_empty() {
            return Err(invalid("Database path cannot be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(invalid("Database max_connections must be at least 1"));
        }

        if self.api.recent_limit == 0 {
            return Err(invalid("api.recent_limit must be at least 1"));
        }

        if self.api.admin_email.trim().is_empty() {
            return Err(invalid("api.admin_email cannot be empty"));
        }

        if self.oauth.enabled
            && (self.oauth.client_id.is_empty() || self.oauth.client_secret.is_empty())
        {
            return Err(invalid(
                "OAuth is enabled but client_id or client_secret is missing",
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            database: DatabaseConfig {
                path: default_database_path(),
                max_connections: default_max_connections(),
                busy_timeout_ms: default_busy_timeout(),
                seed_sample_data: true,
            },
            api: ApiConfig {
                variant: ApiVariant::default(),
                admin_email: default_admin_email(),
                recent_limit: default_recent_limit(),
            },
            pages: PagesConfig {
                template_dir: default_template_dir(),
                static_dir: default_static_dir(),
            },
            cors: CorsConfig {
                enabled: true,
                allowed_origins: vec![],
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            oauth: OAuthConfig::default(),
        }
    }
}

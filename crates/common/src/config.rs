//! Application configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::i18n::Lang;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Site branding.
    #[serde(default)]
    pub site: SiteConfig,
    /// Language and timezone defaults.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this deployment.
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum accepted request body, in bytes (image uploads).
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Local object storage.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one sub-directory per bucket.
    #[serde(default = "default_storage_path")]
    pub base_path: PathBuf,
    /// URL prefix the files are served under.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

/// Per-deployment branding.
///
/// The same build serves several regions; every value falls back to the
/// stock Wilaiety branding when unset.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_site_name_ar")]
    pub name_ar: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_tagline_ar")]
    pub tagline_ar: String,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    /// Tenant key handed to the dashboard client.
    #[serde(default = "default_client_key")]
    pub client_key: String,
}

/// Locale defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Language used when the request expresses no preference.
    #[serde(default)]
    pub default_language: Lang,
    /// IANA timezone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_storage_url() -> String {
    "/storage".to_string()
}

fn default_site_name() -> String {
    "Wilaiety".to_string()
}

fn default_site_name_ar() -> String {
    "ولايتي".to_string()
}

fn default_tagline() -> String {
    "Registre des établissements publics".to_string()
}

fn default_tagline_ar() -> String {
    "سجل المنشآت العمومية".to_string()
}

fn default_primary_color() -> String {
    "#0f766e".to_string()
}

fn default_secondary_color() -> String {
    "#f59e0b".to_string()
}

fn default_client_key() -> String {
    "wilaiety".to_string()
}

fn default_timezone() -> String {
    "Africa/Nouakchott".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            name_ar: default_site_name_ar(),
            tagline: default_tagline(),
            tagline_ar: default_tagline_ar(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            client_key: default_client_key(),
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_language: Lang::default(),
            timezone: default_timezone(),
        }
    }
}

impl LocaleConfig {
    /// Parsed timezone; unknown names fall back to UTC.
    #[must_use]
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %self.timezone, "Unknown timezone, using UTC");
            chrono_tz::UTC
        })
    }

    /// Current calendar date in the configured timezone.
    #[must_use]
    pub fn today(&self) -> chrono::NaiveDate {
        chrono::Utc::now().with_timezone(&self.tz()).date_naive()
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `WILAIETY_ENV`)
    /// 3. Environment variables with `WILAIETY__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("WILAIETY_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WILAIETY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

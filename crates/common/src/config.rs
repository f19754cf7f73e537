//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Identity provider configuration.
    pub auth: AuthConfig,
    /// Outbound email configuration. Mail is disabled when absent.
    #[serde(default)]
    pub email: Option<EmailConfig>,
    /// Third-party API credentials.
    #[serde(default)]
    pub integrations: IntegrationsConfig,
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
    /// Public URL of the frontend, used in email links.
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `MySQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Firebase identity token verification.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Firebase project id; expected as the token audience.
    pub firebase_project_id: String,
    /// JWK set used to verify token signatures.
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    /// How long fetched signing keys are reused.
    #[serde(default = "default_jwks_ttl")]
    pub jwks_cache_secs: u64,
}

/// SMTP settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password (app password for Gmail).
    pub password: String,
    /// Sender address.
    pub from_address: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Mailbox notified about every new booking.
    pub admin_address: String,
}

/// Credentials for the optional third-party integrations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationsConfig {
    /// Amadeus self-service API.
    #[serde(default)]
    pub amadeus: Option<AmadeusConfig>,
    /// Google Places API.
    #[serde(default)]
    pub google_places: Option<GooglePlacesConfig>,
    /// Mailchimp marketing API.
    #[serde(default)]
    pub mailchimp: Option<MailchimpConfig>,
}

/// Amadeus client credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct AmadeusConfig {
    /// API key.
    pub client_id: String,
    /// API secret.
    pub client_secret: String,
    /// API host, test or production.
    #[serde(default = "default_amadeus_url")]
    pub base_url: String,
}

/// Google Places credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GooglePlacesConfig {
    /// API key.
    pub api_key: String,
    /// Places API root.
    #[serde(default = "default_places_url")]
    pub base_url: String,
}

/// Mailchimp audience settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MailchimpConfig {
    /// API key; the suffix after `-` names the data center.
    pub api_key: String,
    /// Audience (list) id.
    pub list_id: String,
}

impl MailchimpConfig {
    /// Data center prefix encoded in the API key, e.g. `us21`.
    #[must_use]
    pub fn data_center(&self) -> Option<&str> {
        self.api_key.rsplit_once('-').map(|(_, dc)| dc)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

const fn default_jwks_ttl() -> u64 {
    3600
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Voyage".to_string()
}

fn default_amadeus_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_places_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, exported into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `VOYAGE_ENV`)
    /// 4. Environment variables with `VOYAGE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("VOYAGE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VOYAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("VOYAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

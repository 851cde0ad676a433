//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Document storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Billing rules.
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Document storage settings.
///
/// `provider` selects the backend (`s3`, `azure_blob`, `local_fs`, `memory`);
/// only the fields that backend needs are read.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend name.
    #[serde(default = "default_storage_provider")]
    pub provider: String,
    /// S3 endpoint URL.
    pub endpoint: Option<String>,
    /// Bucket (S3) or container (Azure) name.
    pub bucket: Option<String>,
    /// S3 access key ID.
    pub access_key_id: Option<String>,
    /// S3 secret access key.
    pub secret_access_key: Option<String>,
    /// S3 region.
    pub region: Option<String>,
    /// Azure storage account name.
    pub account: Option<String>,
    /// Azure storage access key.
    pub access_key: Option<String>,
    /// Root directory for the local filesystem backend.
    pub root: Option<String>,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Signed download URL TTL in seconds.
    #[serde(default = "default_presign_download_ttl")]
    pub presign_download_ttl_secs: u64,
}

fn default_storage_provider() -> String {
    "local_fs".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_presign_download_ttl() -> u64 {
    3600
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            endpoint: None,
            bucket: None,
            access_key_id: None,
            secret_access_key: None,
            region: None,
            account: None,
            access_key: None,
            root: Some("./storage".to_string()),
            max_file_size: default_max_file_size(),
            presign_download_ttl_secs: default_presign_download_ttl(),
        }
    }
}

/// Billing rules shared by the intake, invoicing and collections flows.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Currency every amount is normalized to (ISO 4217).
    #[serde(default = "default_reporting_currency")]
    pub reporting_currency: String,
    /// Days added to the accounting invoice date when an invoice has no due date.
    #[serde(default = "default_payment_term_days")]
    pub default_payment_term_days: i64,
    /// Deep-link template containing the `{ref}` token.
    #[serde(default)]
    pub deep_link_template: Option<String>,
}

fn default_reporting_currency() -> String {
    "EUR".to_string()
}

fn default_payment_term_days() -> i64 {
    60
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            reporting_currency: default_reporting_currency(),
            default_payment_term_days: default_payment_term_days(),
            deep_link_template: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BILLTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

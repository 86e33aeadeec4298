//! Application configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::types::{Currency, Locale, MoneyFormatter};

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// REST API configuration.
    #[validate(nested)]
    pub api: ApiConfig,
    /// Fallback cache configuration.
    #[serde(default)]
    #[validate(nested)]
    pub cache: CacheConfig,
    /// Report export configuration.
    #[serde(default)]
    pub export: ExportConfig,
    /// Archive delivery destination.
    #[serde(default)]
    pub storage: StorageProvider,
}

/// REST API configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiConfig {
    /// Base URL of the property-management API.
    #[validate(url)]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Use the server's pre-aggregated analysis endpoints when available.
    #[serde(default)]
    pub prefer_server_aggregation: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Fallback cache configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CacheConfig {
    /// Whether entity lists are cached for degraded fetches.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Maximum number of cached entity lists.
    #[serde(default = "default_cache_capacity")]
    #[validate(range(min = 1))]
    pub max_capacity: u64,
    /// Staleness limit in seconds.
    #[serde(default = "default_cache_ttl")]
    #[validate(range(min = 1))]
    pub ttl_secs: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> u64 {
    64
}

fn default_cache_ttl() -> u64 {
    900 // 15 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// Output format of the main report document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Word-processor document.
    #[default]
    Docx,
    /// PDF document.
    Pdf,
}

/// Report export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Currency of every amount in the report.
    #[serde(default)]
    pub currency: Currency,
    /// Number formatting locale.
    #[serde(default)]
    pub locale: Locale,
    /// IANA timezone used for the generation timestamp.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Main report document format.
    #[serde(default)]
    pub document_format: DocumentFormat,
    /// Directory holding the TTF files used by the PDF renderer.
    #[serde(default = "default_font_dir")]
    pub font_dir: PathBuf,
    /// Font family name, e.g. `LiberationSans` for `LiberationSans-Regular.ttf`.
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

fn default_timezone() -> String {
    "America/Toronto".to_string()
}

fn default_font_dir() -> PathBuf {
    PathBuf::from("./fonts")
}

fn default_font_family() -> String {
    "LiberationSans".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            locale: Locale::default(),
            timezone: default_timezone(),
            document_format: DocumentFormat::default(),
            font_dir: default_font_dir(),
            font_family: default_font_family(),
        }
    }
}

impl ExportConfig {
    /// Formatter applying this configuration's currency rule.
    #[must_use]
    pub fn money_formatter(&self) -> MoneyFormatter {
        MoneyFormatter::new(self.currency, self.locale)
    }
}

/// Archive delivery destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Local filesystem directory.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::LocalFs {
            root: PathBuf::from("./exports"),
        }
    }
}

impl StorageProvider {
    /// Get the provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
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
            .add_source(config::Environment::with_prefix("PROPLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("PROPLEDGER__API__BASE_URL", Some("https://api.example.com")),
                ("PROPLEDGER__API__TIMEOUT_SECS", Some("10")),
                ("PROPLEDGER__EXPORT__DOCUMENT_FORMAT", Some("pdf")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.api.base_url, "https://api.example.com");
                assert_eq!(config.api.timeout_secs, 10);
                assert!(!config.api.prefer_server_aggregation);
                assert_eq!(config.export.document_format, DocumentFormat::Pdf);
                assert!(config.cache.enabled);
                assert_eq!(config.cache.ttl_secs, 900);
                assert_eq!(config.storage.name(), "local");
            },
        );
    }

    #[test]
    fn test_missing_base_url_fails() {
        temp_env::with_vars_unset(["PROPLEDGER__API__BASE_URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_validation_rejects_bad_url_and_timeout() {
        let config = AppConfig {
            api: ApiConfig {
                base_url: "not a url".to_string(),
                timeout_secs: 0,
                auth_token: None,
                prefer_server_aggregation: false,
            },
            cache: CacheConfig::default(),
            export: ExportConfig::default(),
            storage: StorageProvider::default(),
        };

        assert!(config.validate().is_err());

        let errors = config.api.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("base_url"));
        assert!(fields.contains_key("timeout_secs"));
    }

    #[test]
    fn test_storage_provider_tagged_deserialize() {
        let provider: StorageProvider = serde_json::from_str(
            r#"{"type":"s3","endpoint":"https://r2.example.com","bucket":"exports",
                "access_key_id":"a","secret_access_key":"b","region":"auto"}"#,
        )
        .unwrap();
        assert_eq!(provider.name(), "s3");
    }

    #[test]
    fn test_export_defaults() {
        let export = ExportConfig::default();
        assert_eq!(export.currency, Currency::Cad);
        assert_eq!(export.locale, Locale::FrCa);
        assert_eq!(export.document_format, DocumentFormat::Docx);
        assert_eq!(export.timezone, "America/Toronto");
    }
}

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealdeck_mealplan::ExportOptions;
use serde::Deserialize;
use std::{env, path::PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportOptions,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used in share links. Derived from host and port when unset.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            public_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: usize,
    /// Search term used when the catalog page is opened without a query.
    pub default_query: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: mealdeck_recipe::DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 10,
            page_size: mealdeck_recipe::PAGE_SIZE,
            default_query: "chicken".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALDECK__SERVER__PORT, etc.)
    /// 2. Config file specified by path, CONFIG_PATH, or config/default.toml
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("catalog.base_url", mealdeck_recipe::DEFAULT_BASE_URL)?
            .set_default("storage.dir", "data")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_owned());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALDECK")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_owned());
        }
        if self.catalog.page_size == 0 {
            return Err("Catalog page_size must be at least 1".to_owned());
        }
        if self.catalog.timeout_secs == 0 {
            return Err("Catalog timeout_secs must be at least 1".to_owned());
        }
        if self.export.margin_in < 0.0 {
            return Err("Export margin_in must not be negative".to_owned());
        }
        Ok(())
    }

    /// Base URL for links handed outside the app, without a trailing slash.
    pub fn public_url(&self) -> String {
        match self.server.public_url.as_deref() {
            Some(url) => url.trim_end_matches('/').to_owned(),
            _ => format!("http://{}:{}", self.server.host, self.server.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_page_size() {
        let mut config = Config::default();
        config.catalog.page_size = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_negative_margin() {
        let mut config = Config::default();
        config.export.margin_in = -0.1;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_public_url() {
        let mut config = Config::default();
        assert_eq!(config.public_url(), "http://127.0.0.1:3000");

        config.server.public_url = Some("https://meals.example.org/".to_owned());
        assert_eq!(config.public_url(), "https://meals.example.org");
    }

    #[test]
    fn test_load_from_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("mealdeck.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[catalog]
page_size = 9

[export]
page_format = "a4"
orientation = "landscape"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_string_lossy().into_owned())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.catalog.page_size, 9);
        assert_eq!(config.catalog.default_query, "chicken");
        assert_eq!(config.export.page_format, mealdeck_mealplan::PageFormat::A4);
        assert_eq!(
            config.export.orientation,
            mealdeck_mealplan::Orientation::Landscape
        );
        assert!((config.export.margin_in - 0.5).abs() < f32::EPSILON);
    }
}

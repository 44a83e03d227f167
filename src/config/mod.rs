#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use toml_config::{usable_token, TomlConfig};

/// Values given on the command line or through the environment; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub admin_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Effective settings after layering overrides on top of the TOML file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub admin_token: Option<String>,
    pub timeout_seconds: u64,
    pub error_preview_limit: usize,
    pub base_path: String,
}

impl AppConfig {
    pub fn resolve(file: TomlConfig, overrides: ConfigOverrides) -> Self {
        let admin_token = overrides
            .admin_token
            .as_deref()
            .and_then(|t| usable_token(Some(t)))
            .or_else(|| file.admin_token())
            .map(str::to_string);

        Self {
            api_base_url: overrides
                .api_url
                .unwrap_or_else(|| file.api.base_url.clone()),
            admin_token,
            timeout_seconds: overrides
                .timeout_seconds
                .unwrap_or_else(|| file.timeout_seconds()),
            error_preview_limit: file.preview_limit(),
            base_path: file.base_path().to_string(),
        }
    }

    /// Reads the optional TOML file, applies the overrides and validates the result.
    pub fn load(config_path: Option<&std::path::Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let config = Self::resolve(file, overrides);
        config.validate()?;
        Ok(config)
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn error_preview_limit(&self) -> usize {
        self.error_preview_limit
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_base_url)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
        validate_positive_number("preview_limit", self.error_preview_limit, 1)
    }
}

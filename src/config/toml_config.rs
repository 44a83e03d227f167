use crate::adapters::DEFAULT_API_BASE_URL;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PbnError, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_ERROR_PREVIEW_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub admin_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            admin_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// How many validation errors are printed before `... and N more`.
    pub preview_limit: Option<usize>,
    /// Directory that relative import/template paths resolve against.
    pub base_path: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PbnError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOMAINPBN_ADMIN_TOKEN})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = match ENV_VAR.get() {
            Some(re) => re,
            None => {
                let compiled = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PbnError::ConfigError {
                    message: format!("Invalid env placeholder pattern: {}", e),
                })?;
                ENV_VAR.get_or_init(|| compiled)
            }
        };

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn preview_limit(&self) -> usize {
        self.import.preview_limit.unwrap_or(DEFAULT_ERROR_PREVIEW_LIMIT)
    }

    pub fn base_path(&self) -> &str {
        self.import.base_path.as_deref().unwrap_or(".")
    }
}

/// Unresolved `${VAR}` placeholders count as unset.
pub(crate) fn usable_token(token: Option<&str>) -> Option<&str> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty() && !(t.starts_with("${") && t.ends_with('}')))
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn admin_token(&self) -> Option<&str> {
        usable_token(self.api.admin_token.as_deref())
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds()
    }

    fn error_preview_limit(&self) -> usize {
        self.preview_limit()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_positive_number("api.timeout_seconds", self.timeout_seconds() as usize, 1)?;
        validate_positive_number("import.preview_limit", self.preview_limit(), 1)
    }
}

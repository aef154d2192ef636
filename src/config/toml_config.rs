use crate::core::catalog::PackageCatalog;
use crate::core::client_form::IdentifierHeuristic;
use crate::core::tax_id::TAX_ID_LEN;
use crate::core::ConfigProvider;
use crate::domain::model::PredefinedPackage;
use crate::utils::error::{FreightError, Result};
use crate::utils::validation::{validate_catalog_file, validate_endpoint_url, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 25;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub identifier: IdentifierHeuristic,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file with the id -> package mapping.
    pub file: Option<String>,
    pub packages: Option<BTreeMap<String, PredefinedPackage>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl QuoteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FreightError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FreightError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QUOTE_ENDPOINT})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FreightError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(url) = &self.endpoint.url {
            validate_endpoint_url("endpoint.url", url)?;
        }

        if let Some(timeout) = self.endpoint.timeout_seconds {
            validate_range("endpoint.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        validate_range("identifier.min_digits", self.identifier.min_digits, 1, TAX_ID_LEN)?;

        if let Some(file) = &self.catalog.file {
            validate_catalog_file("catalog.file", file)?;
            if self.catalog.packages.is_some() {
                return Err(FreightError::ConfigError {
                    message: "catalog.file and catalog.packages are mutually exclusive".to_string(),
                });
            }
        }

        Ok(())
    }

    /// 取得包裝目錄：檔案、內嵌表格或預設目錄
    pub fn load_catalog(&self) -> Result<PackageCatalog> {
        if let Some(file) = &self.catalog.file {
            tracing::debug!("Loading package catalog from {}", file);
            return PackageCatalog::from_file(file);
        }
        match &self.catalog.packages {
            Some(packages) => Ok(PackageCatalog::new(packages.clone())),
            None => Ok(PackageCatalog::default()),
        }
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.endpoint.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn verbose_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }
}

impl ConfigProvider for QuoteConfig {
    fn endpoint_url(&self) -> Option<&str> {
        self.endpoint.url.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }
}

impl Validate for QuoteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

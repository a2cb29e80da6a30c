use crate::config::{
    DEFAULT_GITHUB_BASE_URL, DEFAULT_OUTPUT_FILENAME, DEFAULT_RAW_BASE_URL, DEFAULT_TARGET_URL,
    MAX_TIMEOUT_SECS,
};
use crate::core::ConfigProvider;
use crate::services::enricher::DEFAULT_CONCURRENCY;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("BUG: hardcoded env var regex is invalid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_target_url")]
    pub target_url: String,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_base_url")]
    pub web_base_url: String,
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_concurrency")]
    pub concurrent_requests: usize,
    pub task_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_target_url() -> String {
    DEFAULT_TARGET_URL.to_string()
}

fn default_github_base_url() -> String {
    DEFAULT_GITHUB_BASE_URL.to_string()
}

fn default_raw_base_url() -> String {
    DEFAULT_RAW_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            web_base_url: default_github_base_url(),
            raw_base_url: default_raw_base_url(),
        }
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrent_requests: DEFAULT_CONCURRENCY,
            task_timeout_seconds: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_filename: default_output_filename(),
            output_formats: default_output_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GITHUB_MIRROR})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn target_url(&self) -> &str {
        &self.source.target_url
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_filename(&self) -> &str {
        &self.load.output_filename
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn github_base_url(&self) -> &str {
        &self.github.web_base_url
    }

    fn raw_base_url(&self) -> &str {
        &self.github.raw_base_url
    }

    fn concurrent_requests(&self) -> usize {
        self.enrich.concurrent_requests
    }

    fn task_timeout(&self) -> Option<Duration> {
        self.enrich.task_timeout_seconds.map(Duration::from_secs)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.request_timeout_seconds.map(Duration::from_secs)
    }

    fn skip_synopsis(&self) -> bool {
        !self.enrich.enabled
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.target_url", &self.source.target_url)?;
        validation::validate_url("github.web_base_url", &self.github.web_base_url)?;
        validation::validate_url("github.raw_base_url", &self.github.raw_base_url)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string("load.output_filename", &self.load.output_filename)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;
        validation::validate_positive_number(
            "enrich.concurrent_requests",
            self.enrich.concurrent_requests,
            1,
        )?;
        if let Some(secs) = self.enrich.task_timeout_seconds {
            validation::validate_range("enrich.task_timeout_seconds", secs, 1, MAX_TIMEOUT_SECS)?;
        }
        if let Some(secs) = self.source.request_timeout_seconds {
            validation::validate_range("source.request_timeout_seconds", secs, 1, MAX_TIMEOUT_SECS)?;
        }
        Ok(())
    }
}

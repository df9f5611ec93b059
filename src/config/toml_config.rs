use super::{
    DEFAULT_API_ENDPOINT, DEFAULT_OFFICE_CODE, DEFAULT_PROXY_URL, DEFAULT_SCHOOL_CODE,
    HTML_FILENAME, JSON_FILENAME,
};
use crate::core::render::RenderOptions;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MealError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

static ENV_VAR: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub proxy: Option<ProxyConfig>,
    pub output: OutputConfig,
    pub display: Option<DisplayConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
    pub office_code: Option<String>,
    pub school_code: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub enabled: bool,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub formats: Vec<String>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub html: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub show_details: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MealError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MealError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NEIS_API_KEY})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> String {
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("service.endpoint", self.api_endpoint())?;
        validation::validate_school_code("service.office_code", self.office_code())?;
        validation::validate_school_code("service.school_code", self.school_code())?;

        if let Some(proxy) = self.proxy_url() {
            validation::validate_url("proxy.url", proxy)?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;

        if self.output.formats.is_empty() {
            return Err(MealError::ConfigValidationError {
                field: "output.formats".to_string(),
                message: "At least one output format is required".to_string(),
            });
        }

        let valid_formats = ["html", "json"];
        for format in &self.output.formats {
            if !valid_formats.contains(&format.as_str()) {
                return Err(MealError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        let valid_log_formats = ["compact", "json"];
        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !valid_log_formats.contains(&format) {
                return Err(MealError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: format!(
                        "Unsupported log format. Valid formats: {}",
                        valid_log_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }

    pub fn writes_format(&self, format: &str) -> bool {
        self.output.formats.iter().any(|f| f == format)
    }

    pub fn html_filename(&self) -> &str {
        self.output
            .filenames
            .as_ref()
            .and_then(|f| f.html.as_deref())
            .unwrap_or(HTML_FILENAME)
    }

    pub fn json_filename(&self) -> &str {
        self.output
            .filenames
            .as_ref()
            .and_then(|f| f.json.as_deref())
            .unwrap_or(JSON_FILENAME)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_details: self
                .display
                .as_ref()
                .and_then(|d| d.show_details)
                .unwrap_or(false),
        }
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        self.service.endpoint.as_deref().unwrap_or(DEFAULT_API_ENDPOINT)
    }

    fn office_code(&self) -> &str {
        self.service.office_code.as_deref().unwrap_or(DEFAULT_OFFICE_CODE)
    }

    fn school_code(&self) -> &str {
        self.service.school_code.as_deref().unwrap_or(DEFAULT_SCHOOL_CODE)
    }

    fn api_key(&self) -> Option<&str> {
        // 環境變數沒設定時會留下 `${...}`，視同沒有金鑰
        self.service
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
    }

    fn proxy_url(&self) -> Option<&str> {
        match &self.proxy {
            None => Some(DEFAULT_PROXY_URL),
            Some(proxy) if !proxy.enabled => None,
            Some(proxy) => Some(proxy.url.as_deref().unwrap_or(DEFAULT_PROXY_URL)),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

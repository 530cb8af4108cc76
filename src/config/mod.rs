#[cfg(feature = "cli")]
pub mod cli;

use crate::adapters::resend::DEFAULT_API_BASE_URL;
use crate::core::ConfigProvider;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_SENDER: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const DEFAULT_RECIPIENT: &str = "delivered@resend.dev";
pub const DEFAULT_SUBJECT_PREFIX: &str = "Portfolio contact from";

/// Process-wide relay settings. Read-only once the relay is running.
#[derive(Clone, Deserialize)]
pub struct RelayConfig {
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_sender")]
    pub from: String,
    #[serde(default = "default_recipient")]
    pub to: String,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_sender() -> String {
    DEFAULT_SENDER.to_string()
}

fn default_recipient() -> String {
    DEFAULT_RECIPIENT.to_string()
}

fn default_subject_prefix() -> String {
    DEFAULT_SUBJECT_PREFIX.to_string()
}

#[derive(Deserialize)]
struct ConfigFile {
    relay: RelayConfig,
}

impl RelayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: default_api_base_url(),
            from: default_sender(),
            to: default_recipient(),
            subject_prefix: default_subject_prefix(),
        }
    }

    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字串視同未設定
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("RESEND_API_KEY");
        let api_key = validation::validate_required_field("RESEND_API_KEY", &api_key)?;

        Ok(Self {
            api_key: api_key.clone(),
            api_base_url: var("RESEND_API_URL").unwrap_or_else(default_api_base_url),
            from: var("CONTACT_FROM").unwrap_or_else(default_sender),
            to: var("CONTACT_TO").unwrap_or_else(default_recipient),
            subject_prefix: var("CONTACT_SUBJECT_PREFIX").unwrap_or_else(default_subject_prefix),
        })
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let file: ConfigFile =
            toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        Ok(file.relay)
    }

    /// 替換環境變數 (例如 ${RESEND_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// API key with everything but a short prefix masked, for display.
    pub fn masked_api_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(3).collect();
        format!("{}***", prefix)
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.masked_api_key())
            .field("api_base_url", &self.api_base_url)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject_prefix", &self.subject_prefix)
            .finish()
    }
}

impl ConfigProvider for RelayConfig {
    fn sender(&self) -> &str {
        &self.from
    }

    fn recipient(&self) -> &str {
        &self.to
    }

    fn subject_prefix(&self) -> &str {
        &self.subject_prefix
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("api_key", &self.api_key)?;

        // 未被替換的 ${VAR} 代表環境變數不存在
        if self.api_key.starts_with("${") {
            return Err(RelayError::MissingConfigError {
                field: self.api_key.clone(),
            });
        }

        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_mailbox("from", &self.from)?;
        validation::validate_mailbox("to", &self.to)?;
        validation::validate_non_empty_string("subject_prefix", &self.subject_prefix)?;

        tracing::debug!("Relay configuration validation passed");
        Ok(())
    }
}

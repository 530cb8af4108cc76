use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    #[error("Missing fields: {}", .missing.join(", "))]
    InvalidPayload { missing: Vec<&'static str> },

    #[error("Email API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Email provider rejected the message ({status}): {message}")]
    ProviderError { status: u16, message: String },

    #[error("Email template rendering failed: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端的請求有誤，不會嘗試寄信
    Client,
    /// 寄信過程失敗
    Delivery,
    /// 啟動時的配置錯誤
    Configuration,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::MethodNotAllowed { .. } | RelayError::InvalidPayload { .. } => {
                ErrorCategory::Client
            }
            RelayError::ApiError(_)
            | RelayError::ProviderError { .. }
            | RelayError::TemplateError(_)
            | RelayError::SerializationError(_) => ErrorCategory::Delivery,
            RelayError::IoError(_)
            | RelayError::ConfigError { .. }
            | RelayError::MissingConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MethodNotAllowed { .. } => 405,
            RelayError::InvalidPayload { .. } => 400,
            _ => 500,
        }
    }

    /// 回傳給呼叫端的訊息，不包含供應商的原始錯誤內容
    pub fn public_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Client => match self {
                RelayError::MethodNotAllowed { .. } => "Method not allowed",
                _ => "Missing fields",
            },
            ErrorCategory::Delivery => "Email failed",
            ErrorCategory::Configuration => "Server misconfigured",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

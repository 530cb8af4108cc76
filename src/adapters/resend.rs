use crate::config::RelayConfig;
use crate::core::{DeliveryReceipt, EmailSender, OutboundEmail, RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// Error body returned by the Resend API, e.g.
/// `{"statusCode": 422, "name": "validation_error", "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    name: Option<String>,
    message: Option<String>,
}

/// Resend `POST /emails` client. Built once and shared for the process lifetime.
#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ResendClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.api_key.clone(), config.api_base_url.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        let endpoint = self.endpoint();
        tracing::debug!("Making email API request to: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Email API response status: {}", status);

        let body = response.text().await?;

        if status.is_success() {
            // 成功時回傳 {"id": "..."}，解析失敗不影響結果
            let receipt = serde_json::from_str::<DeliveryReceipt>(&body).unwrap_or_default();
            return Ok(receipt);
        }

        let message = match serde_json::from_str::<ProviderErrorBody>(&body) {
            Ok(ProviderErrorBody {
                name: Some(name),
                message: Some(message),
            }) => format!("{}: {}", name, message),
            Ok(ProviderErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ => body,
        };

        Err(RelayError::ProviderError {
            status: status.as_u16(),
            message,
        })
    }
}

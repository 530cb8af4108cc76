use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The body of an incoming request, as the transport delivered it.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

impl RequestBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return RequestBody::Empty;
        }
        RequestBody::Text(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: String,
    pub body: RequestBody,
}

impl RelayRequest {
    pub fn new(method: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: method.into(),
            body,
        }
    }

    pub fn post_json(value: serde_json::Value) -> Self {
        Self::new("POST", RequestBody::Json(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseBody {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: ResponseBody,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: ResponseBody {
                ok: true,
                error: None,
            },
        }
    }

    pub fn from_error(error: &RelayError) -> Self {
        let mut headers = HashMap::new();
        if let RelayError::MethodNotAllowed { .. } = error {
            headers.insert("Allow".to_string(), "POST".to_string());
        }

        Self {
            status: error.status_code(),
            headers,
            body: ResponseBody {
                ok: false,
                error: Some(error.public_message().to_string()),
            },
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// `{name, email, message}` parsed from a request body. Fields that are
/// absent, not strings, or inside an unparsable body are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl ContactPayload {
    pub fn from_body(body: &RequestBody) -> Self {
        match body {
            RequestBody::Empty => Self::default(),
            RequestBody::Text(text) => match serde_json::from_str::<serde_json::Value>(text) {
                Ok(value) => Self::from_value(&value),
                Err(e) => {
                    tracing::debug!("Request body is not valid JSON: {}", e);
                    Self::default()
                }
            },
            RequestBody::Json(value) => Self::from_value(value),
        }
    }

    fn from_value(value: &serde_json::Value) -> Self {
        // 只接受字串欄位，其它型別一律視為缺少
        let field = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        Self {
            name: field("name"),
            email: field("email"),
            message: field("message"),
        }
    }

    /// Check that every field is present and non-blank, yielding the trimmed submission.
    pub fn into_submission(self) -> Result<ContactSubmission> {
        let mut missing = Vec::new();

        let mut take = |key: &'static str, value: Option<String>| -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let name = take("name", self.name);
        let email = take("email", self.email);
        let message = take("message", self.message);

        if !missing.is_empty() {
            return Err(RelayError::InvalidPayload { missing });
        }

        Ok(ContactSubmission {
            name,
            email,
            message,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

use crate::core::{RelayRequest, RelayResponse, RequestBody, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// API Gateway / Lambda function URL proxy event. Payload v1 carries
/// `httpMethod`, v2 carries `requestContext.http.method`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    fn method(&self) -> String {
        self.http_method
            .clone()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|ctx| ctx.http.as_ref())
                    .map(|http| http.method.clone())
            })
            .unwrap_or_default()
            .to_ascii_uppercase()
    }

    pub fn into_relay_request(self) -> RelayRequest {
        let method = self.method();

        let body = match self.body {
            None => RequestBody::Empty,
            Some(body) if self.is_base64_encoded => {
                match base64::engine::general_purpose::STANDARD.decode(body.as_bytes()) {
                    Ok(bytes) => RequestBody::from_bytes(&bytes),
                    Err(e) => {
                        // 無法解碼時視為空的 body
                        tracing::debug!("Request body is not valid base64: {}", e);
                        RequestBody::Empty
                    }
                }
            }
            Some(body) => RequestBody::from_bytes(body.as_bytes()),
        };

        RelayRequest::new(method, body)
    }
}

impl ProxyResponse {
    pub fn from_relay_response(response: RelayResponse) -> Result<Self> {
        let mut headers = response.headers;
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(Self {
            status_code: response.status,
            headers,
            body: serde_json::to_string(&response.body)?,
            is_base64_encoded: false,
        })
    }
}

use crate::core::compose::compose_email;
use crate::core::{
    ConfigProvider, ContactPayload, DeliveryReceipt, EmailSender, RelayError, RelayRequest,
    RelayResponse, Result,
};
use crate::utils::error::ErrorCategory;

/// Validates contact submissions and relays each one as a single email.
pub struct ContactRelay<S: EmailSender, C: ConfigProvider> {
    sender: S,
    config: C,
}

impl<S: EmailSender, C: ConfigProvider> ContactRelay<S, C> {
    pub fn new(sender: S, config: C) -> Self {
        Self { sender, config }
    }

    pub async fn submit(&self, payload: ContactPayload) -> Result<DeliveryReceipt> {
        submit(&self.config, &self.sender, payload).await
    }

    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        handle_request(&self.config, &self.sender, request).await
    }
}

/// received → validated → delivered / delivery_failed, or received → rejected.
pub async fn submit<C, S>(config: &C, sender: &S, payload: ContactPayload) -> Result<DeliveryReceipt>
where
    C: ConfigProvider + ?Sized,
    S: EmailSender + ?Sized,
{
    let submission = payload.into_submission()?;
    let email = compose_email(config, &submission)?;

    tracing::debug!(
        reply_to = %email.reply_to,
        subject = %email.subject,
        "Relaying contact submission"
    );

    sender.send(&email).await
}

/// The relay as a plain function of `(config, sender, request)`.
pub async fn handle_request<C, S>(config: &C, sender: &S, request: RelayRequest) -> RelayResponse
where
    C: ConfigProvider + ?Sized,
    S: EmailSender + ?Sized,
{
    if request.method != "POST" {
        tracing::info!(method = %request.method, outcome = "rejected", "Method not allowed");
        return RelayResponse::from_error(&RelayError::MethodNotAllowed {
            method: request.method,
        });
    }

    let payload = ContactPayload::from_body(&request.body);

    match submit(config, sender, payload).await {
        Ok(receipt) => {
            tracing::info!(
                outcome = "delivered",
                message_id = receipt.id.as_deref().unwrap_or("-"),
                "Contact email sent"
            );
            RelayResponse::ok()
        }
        Err(e) => {
            match e.category() {
                ErrorCategory::Client => {
                    tracing::info!(outcome = "rejected", "Invalid contact payload: {}", e);
                }
                _ => {
                    // 供應商錯誤只寫入日誌，不回傳給呼叫端
                    tracing::error!(outcome = "delivery_failed", "Resend error: {}", e);
                }
            }
            RelayResponse::from_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OutboundEmail, RequestBody};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockSender {
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
        fail: bool,
    }

    impl MockSender {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        async fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl EmailSender for MockSender {
        async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
            self.sent.lock().await.push(email.clone());
            if self.fail {
                return Err(RelayError::ProviderError {
                    status: 403,
                    message: "API key is invalid: re_secret_detail".to_string(),
                });
            }
            Ok(DeliveryReceipt {
                id: Some("49a3999c-0ce1-4ea6-ab68-afcd6dc2e794".to_string()),
            })
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn sender(&self) -> &str {
            "Portfolio Contact <onboarding@resend.dev>"
        }

        fn recipient(&self) -> &str {
            "owner@example.com"
        }

        fn subject_prefix(&self) -> &str {
            "Portfolio contact from"
        }
    }

    fn relay(sender: MockSender) -> ContactRelay<MockSender, MockConfig> {
        ContactRelay::new(sender, MockConfig)
    }

    #[tokio::test]
    async fn test_valid_submission_is_delivered_once() {
        let sender = MockSender::default();
        let relay = relay(sender.clone());

        let response = relay
            .handle(RelayRequest::post_json(json!({
                "name": "Jane",
                "email": "jane@x.com",
                "message": "Hi"
            })))
            .await;

        assert_eq!(response.status, 200);
        assert!(response.body.ok);
        assert_eq!(response.body.error, None);

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "jane@x.com");
        assert!(sent[0].subject.contains("Jane"));
        assert_eq!(sent[0].to, vec!["owner@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_or_blank_fields_are_rejected_without_delivery() {
        let payloads = vec![
            json!({}),
            json!({"email": "jane@x.com", "message": "Hi"}),
            json!({"name": "Jane", "message": "Hi"}),
            json!({"name": "Jane", "email": "jane@x.com"}),
            json!({"name": "   ", "email": "jane@x.com", "message": "Hi"}),
            json!({"name": "Jane", "email": "\t\n", "message": "Hi"}),
            json!({"name": "Jane", "email": "jane@x.com", "message": " "}),
        ];

        for payload in payloads {
            let sender = MockSender::default();
            let relay = relay(sender.clone());

            let response = relay.handle(RelayRequest::post_json(payload.clone())).await;

            assert_eq!(response.status, 400, "payload: {}", payload);
            assert!(!response.body.ok);
            assert_eq!(response.body.error.as_deref(), Some("Missing fields"));
            assert!(sender.sent().await.is_empty(), "payload: {}", payload);
        }
    }

    #[tokio::test]
    async fn test_unparsable_body_is_rejected() {
        let sender = MockSender::default();
        let relay = relay(sender.clone());

        let response = relay
            .handle(RelayRequest::new(
                "POST",
                RequestBody::Text("{not json".to_string()),
            ))
            .await;

        assert_eq!(response.status, 400);
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_raw_string_body_is_parsed() {
        let sender = MockSender::default();
        let relay = relay(sender.clone());

        let response = relay
            .handle(RelayRequest::new(
                "POST",
                RequestBody::Text(
                    r#"{"name":"Jane","email":"jane@x.com","message":"Hi"}"#.to_string(),
                ),
            ))
            .await;

        assert_eq!(response.status, 200);
        assert_eq!(sender.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_leak_provider_error() {
        let sender = MockSender::failing();
        let relay = relay(sender.clone());

        let response = relay
            .handle(RelayRequest::post_json(json!({
                "name": "Jane",
                "email": "jane@x.com",
                "message": "Hi"
            })))
            .await;

        assert_eq!(response.status, 500);
        assert!(!response.body.ok);
        assert_eq!(response.body.error.as_deref(), Some("Email failed"));

        let body = serde_json::to_string(&response.body).unwrap();
        assert!(!body.contains("API key is invalid"));
        assert!(!body.contains("re_secret_detail"));
        assert_eq!(sender.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_non_post_methods_are_not_allowed() {
        for method in ["GET", "PUT", "DELETE", "OPTIONS", "HEAD", "post"] {
            let sender = MockSender::default();
            let relay = relay(sender.clone());

            let response = relay
                .handle(RelayRequest::new(
                    method,
                    RequestBody::Json(json!({
                        "name": "Jane",
                        "email": "jane@x.com",
                        "message": "Hi"
                    })),
                ))
                .await;

            assert_eq!(response.status, 405, "method: {}", method);
            assert_eq!(response.header("Allow"), Some("POST"));
            assert_eq!(response.body.error.as_deref(), Some("Method not allowed"));
            assert!(sender.sent().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_sequential_submissions_are_independent() {
        let sender = MockSender::default();
        let relay = relay(sender.clone());
        let request = RelayRequest::post_json(json!({
            "name": "Jane",
            "email": "jane@x.com",
            "message": "Hi"
        }));

        let first = relay.handle(request.clone()).await;
        let second = relay.handle(request).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn test_submit_returns_receipt() {
        let relay = relay(MockSender::default());
        let payload = ContactPayload {
            name: Some("Jane".to_string()),
            email: Some("jane@x.com".to_string()),
            message: Some("Hi".to_string()),
        };

        let receipt = relay.submit(payload).await.unwrap();
        assert_eq!(
            receipt.id.as_deref(),
            Some("49a3999c-0ce1-4ea6-ab68-afcd6dc2e794")
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_before_sending() {
        let sender = MockSender::default();
        let relay = relay(sender.clone());

        let err = relay.submit(ContactPayload::default()).await.unwrap_err();

        assert!(matches!(err, RelayError::InvalidPayload { .. }));
        assert!(sender.sent().await.is_empty());
    }
}

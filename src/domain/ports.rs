use crate::domain::model::{DeliveryReceipt, OutboundEmail};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait ConfigProvider: Send + Sync {
    fn sender(&self) -> &str;
    fn recipient(&self) -> &str;
    fn subject_prefix(&self) -> &str;
}

/// Delivers one outbound email. Implementations must not retry.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt>;
}

#[async_trait]
impl<T: EmailSender + ?Sized> EmailSender for Arc<T> {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        (**self).send(email).await
    }
}

pub mod compose;
pub mod relay;

pub use crate::domain::model::{
    ContactPayload, ContactSubmission, DeliveryReceipt, OutboundEmail, RelayRequest,
    RelayResponse, RequestBody, ResponseBody,
};
pub use crate::domain::ports::{ConfigProvider, EmailSender};
pub use crate::utils::error::{RelayError, Result};

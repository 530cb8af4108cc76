// Adapters layer: concrete implementations for external systems (email provider, transports).

#[cfg(feature = "cli")]
pub mod http;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod resend;

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::resend::ResendClient;
pub use config::RelayConfig;
pub use crate::core::relay::{handle_request, ContactRelay};
pub use utils::error::{RelayError, Result};

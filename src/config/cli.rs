use crate::config::RelayConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-relay")]
#[command(about = "Relays portfolio contact-form submissions to the site owner by email")]
pub struct CliConfig {
    /// TOML configuration file; environment variables are used when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the contact endpoints over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Load and validate the configuration
    Check,
    /// Send a single submission through the relay
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

impl CliConfig {
    pub fn load_relay_config(&self) -> Result<RelayConfig> {
        match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                RelayConfig::from_file(path)
            }
            None => RelayConfig::from_env(),
        }
    }
}

use clap::Parser;
use contact_relay::adapters::http;
use contact_relay::config::cli::Command;
use contact_relay::core::ContactPayload;
use contact_relay::utils::{error::ErrorCategory, logger, validation::Validate};
use contact_relay::{CliConfig, ContactRelay, RelayConfig, RelayError, ResendClient};
use std::sync::Arc;

fn exit_code(e: &RelayError) -> i32 {
    match e.category() {
        ErrorCategory::Client => 2,
        ErrorCategory::Delivery => 1,
        ErrorCategory::Configuration => 3,
    }
}

fn load_config(cli: &CliConfig) -> Result<RelayConfig, RelayError> {
    let config = cli.load_relay_config()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting contact-relay CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    match cli.command {
        Command::Check => {
            println!("✅ Configuration is valid");
            println!("{:#?}", config);
        }
        Command::Serve { bind } => {
            let client = ResendClient::from_config(&config);
            let relay = Arc::new(ContactRelay::new(client, config));
            http::serve(relay, bind).await?;
        }
        Command::Send {
            name,
            email,
            message,
        } => {
            let client = ResendClient::from_config(&config);
            let relay = ContactRelay::new(client, config);
            let payload = ContactPayload {
                name: Some(name),
                email: Some(email),
                message: Some(message),
            };

            match relay.submit(payload).await {
                Ok(receipt) => {
                    tracing::info!("✅ Contact email sent");
                    println!(
                        "✅ Email sent (id: {})",
                        receipt.id.as_deref().unwrap_or("unknown")
                    );
                }
                Err(e) => {
                    tracing::error!("❌ Contact email failed: {} (Category: {:?})", e, e.category());
                    eprintln!("❌ {}", e);
                    std::process::exit(exit_code(&e));
                }
            }
        }
    }

    Ok(())
}

use clap::Parser;
use std::path::Path;
use subway_sections::app::commands;
use subway_sections::utils::error::ErrorSeverity;
use subway_sections::utils::{logger, validation::Validate};
use subway_sections::{CliConfig, NetworkConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // A missing file starts an empty network, so the first `add-station --write` creates it.
    let network = if Path::new(&config.network).exists() {
        match NetworkConfig::from_file(&config.network) {
            Ok(network) => network,
            Err(e) => {
                eprintln!("❌ Failed to load network file '{}': {}", config.network, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    } else {
        NetworkConfig::default()
    };

    if config.json_logs {
        logger::init_json_logger(config.verbose, network.log_level());
    } else {
        logger::init_cli_logger(config.verbose, network.log_level());
    }

    tracing::info!("Starting subway CLI with network {}", config.network);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let rejection_status = config
        .rejection_status
        .unwrap_or(network.settings.rejection_status);

    let service = match network.build().await {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("❌ Network validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    match commands::execute(&service, &config.command).await {
        Ok(output) => {
            if let Some(output) = output {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }

            if config.write && config.command.is_mutation() {
                let mut settings = network.settings.clone();
                settings.rejection_status = rejection_status;
                NetworkConfig::snapshot(&service, settings)
                    .await?
                    .write_to_file(&config.network)?;
                tracing::info!("📁 Network saved to: {}", config.network);
            }
        }
        Err(e) => {
            let status = e.status_code(rejection_status);
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?}, Status: {})",
                e,
                e.category(),
                e.severity(),
                status
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ [{}] {}", status, e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

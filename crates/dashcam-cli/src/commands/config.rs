//! Configuration inspection commands.

use clap::{Args, Subcommand};

use dashcam_core::error::AppError;
use dashcam_database::connection::redact_credentials;

use crate::output::{self, OutputFormat};

/// Arguments for the config command
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration with secrets redacted
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    match &args.command {
        ConfigCommand::Show => {
            config.database.url = redact_credentials(&config.database.url);
            match format {
                OutputFormat::Json => output::print_item(&config, format),
                OutputFormat::Text => {
                    output::print_kv("server", &format!("{}:{}", config.server.host, config.server.port));
                    output::print_kv("store provider", &config.database.provider);
                    output::print_kv("database url", &config.database.url);
                    output::print_kv(
                        "access token ttl",
                        &format!("{}s", config.auth.access_token_ttl_seconds),
                    );
                    output::print_kv(
                        "refresh token ttl",
                        &format!("{}d", config.auth.refresh_token_ttl_days),
                    );
                    output::print_kv("max chunk bytes", &config.upload.max_chunk_bytes.to_string());
                    output::print_kv("log level", &config.logging.level);
                }
            }
        }
    }

    Ok(())
}

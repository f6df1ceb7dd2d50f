//! Storage reclamation commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::info;

use dashcam_core::error::AppError;
use dashcam_database::Stores;
use dashcam_service::UploadService;

use crate::output::{self, OutputFormat};

/// Arguments for the purge command
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// What to purge
    #[command(subcommand)]
    pub command: PurgeCommand,
}

/// Purge subcommands
#[derive(Debug, Subcommand)]
pub enum PurgeCommand {
    /// Delete chunks that were never finalized
    Chunks {
        /// Age threshold in hours (defaults to `upload.stale_chunk_hours`)
        #[arg(long)]
        older_than_hours: Option<i64>,
    },
    /// Delete tokens that are revoked or expired
    Tokens,
}

/// Summary printed after a purge.
#[derive(Debug, Serialize)]
pub struct PurgeReport {
    pub target: &'static str,
    pub removed: u64,
}

/// Execute purge commands
pub async fn execute(
    args: &PurgeArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = Stores::connect(&config.database).await?;

    let report = match &args.command {
        PurgeCommand::Chunks { older_than_hours } => {
            let hours = older_than_hours.unwrap_or(config.upload.stale_chunk_hours);
            if hours < 0 {
                return Err(AppError::configuration("Age threshold must not be negative"));
            }
            let uploads = UploadService::new(Arc::clone(&stores.videos));
            PurgeReport {
                target: "chunks",
                removed: uploads.purge_stale_chunks(hours).await?,
            }
        }
        PurgeCommand::Tokens => PurgeReport {
            target: "tokens",
            removed: stores.tokens.purge_dead().await?,
        },
    };

    stores.close().await;
    info!(what = report.target, removed = report.removed, "Purge finished");
    output::print_item(&report, format);
    Ok(())
}

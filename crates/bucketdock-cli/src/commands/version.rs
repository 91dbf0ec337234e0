//! Version history commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::result::AppResult;
use bucketdock_entity::object::format_bytes;

use super::{confirm, format_time};
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `versions`
#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Version action (lists history when omitted)
    #[command(subcommand)]
    pub command: Option<VersionCommand>,
}

/// Version subcommands
#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// List the version history
    List,
    /// Make an older version current again
    Restore {
        /// Version id
        version_id: String,
    },
    /// Print a download URL for a version
    #[command(alias = "url")]
    Download {
        /// Version id
        version_id: String,
    },
    /// Permanently delete a version
    Delete {
        /// Version id
        version_id: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version id
    version_id: String,
    /// Current
    current: String,
    /// Size
    size: String,
    /// Last modified
    modified: String,
}

/// Execute version commands
pub async fn execute(
    app: &App,
    args: &VersionArgs,
    format: OutputFormat,
    yes: bool,
) -> AppResult<()> {
    let (_, access) = app.open_bucket(&args.bucket).await?;
    let versions = app.versions()?;
    match &args.command {
        None | Some(VersionCommand::List) => {
            let history = versions.history(&args.bucket, &args.key).await?;
            if format == OutputFormat::Json {
                output::print_item(&history, format);
                return Ok(());
            }
            let rows: Vec<VersionRow> = history
                .iter()
                .map(|v| VersionRow {
                    version_id: v.version_id.clone(),
                    current: if v.is_latest { "✓" } else { "" }.to_string(),
                    size: format_bytes(v.size as i64),
                    modified: format_time(v.last_modified),
                })
                .collect();
            output::print_list(&rows, format);
            Ok(())
        }
        Some(VersionCommand::Restore { version_id }) => {
            access.require_write()?;
            versions.restore(&args.bucket, &args.key, version_id).await
        }
        Some(VersionCommand::Download { version_id }) => {
            let url = versions
                .download_url(&args.bucket, &args.key, version_id)
                .await?;
            println!("{url}");
            Ok(())
        }
        Some(VersionCommand::Delete { version_id }) => {
            access.require_write()?;
            let prompt = format!(
                "Permanently delete version {version_id} of '{}'? This cannot be undone.",
                args.key
            );
            if !confirm(&prompt, yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            versions.delete(&args.bucket, &args.key, version_id).await
        }
    }
}

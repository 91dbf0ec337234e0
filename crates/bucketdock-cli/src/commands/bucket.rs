//! Bucket management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::result::AppResult;
use bucketdock_entity::bucket::{Bucket, PublicLevel};
use bucketdock_service::BucketFeed;

use super::{confirm, format_time};
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for bucket commands
#[derive(Debug, Args)]
pub struct BucketArgs {
    /// Bucket subcommand
    #[command(subcommand)]
    pub command: BucketCommand,
}

/// Bucket subcommands
#[derive(Debug, Subcommand)]
pub enum BucketCommand {
    /// List your buckets
    List {
        /// Load every page instead of the first
        #[arg(short, long)]
        all: bool,
    },
    /// Create a bucket
    Create {
        /// Bucket name
        name: String,
    },
    /// Delete a bucket and everything in it
    Delete {
        /// Bucket name
        name: String,
    },
    /// Change who can access a bucket without signing in
    Visibility {
        /// Bucket name
        name: String,
        /// private, read-only or read-write
        level: PublicLevel,
    },
}

/// Bucket display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct BucketRow {
    /// Name
    name: String,
    /// Visibility
    visibility: String,
    /// Created at
    created_at: String,
}

impl From<&Bucket> for BucketRow {
    fn from(b: &Bucket) -> Self {
        Self {
            name: b.name.clone(),
            visibility: b.public_level.to_string(),
            created_at: format_time(b.created_at),
        }
    }
}

/// Execute bucket commands
pub async fn execute(
    app: &App,
    args: &BucketArgs,
    format: OutputFormat,
    yes: bool,
) -> AppResult<()> {
    match &args.command {
        BucketCommand::List { all } => list(app, *all, format).await,
        BucketCommand::Create { name } => {
            app.buckets()?.create(&app.ctx(), name).await?;
            Ok(())
        }
        BucketCommand::Delete { name } => {
            let (bucket, access) = app.open_bucket(name).await?;
            access.require_manage()?;
            let prompt = format!(
                "Delete bucket '{}' and every object version in it? This cannot be undone.",
                bucket.name
            );
            if !confirm(&prompt, yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            let report = app.buckets()?.delete(&app.ctx(), &bucket).await?;
            output::print_kv("Versions removed", &report.removed.to_string());
            Ok(())
        }
        BucketCommand::Visibility { name, level } => {
            let (bucket, access) = app.open_bucket(name).await?;
            access.require_manage()?;
            app.buckets()?
                .set_visibility(&app.ctx(), &bucket, *level)
                .await
        }
    }
}

/// Print the bucket feed
pub(crate) async fn list(app: &App, all: bool, format: OutputFormat) -> AppResult<()> {
    let service = app.buckets()?;
    let ctx = app.ctx();
    let mut feed = BucketFeed::new(&app.config().browse);
    feed.load_more(&service, &ctx).await?;
    while all && feed.has_more() {
        if feed.load_more(&service, &ctx).await? == 0 {
            break;
        }
    }

    let rows: Vec<BucketRow> = feed.items().iter().map(BucketRow::from).collect();
    output::print_list(&rows, format);
    if feed.has_more() && format == OutputFormat::Table {
        output::print_warning("More buckets available: pass --all to load every page");
    }
    Ok(())
}

//! Search command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::result::AppResult;
use bucketdock_entity::object::{display_name, format_bytes};
use bucketdock_service::SearchResults;

use super::format_time;
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `search`
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search text
    pub query: String,
}

#[derive(Debug, Serialize, Tabled)]
struct HitRow {
    /// Bucket
    bucket: String,
    /// Name
    name: String,
    /// Folder
    folder: String,
    /// Size
    size: String,
    /// Last modified
    modified: String,
}

/// Execute the search command
pub async fn execute(app: &App, args: &SearchArgs, format: OutputFormat) -> AppResult<()> {
    let results = app.search()?.search(&app.ctx(), &args.query).await?;
    print_results(&results, format);
    Ok(())
}

/// Print search results
pub(crate) fn print_results(results: &SearchResults, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_item(results, format);
        return;
    }
    if results.is_empty() {
        output::print_warning(&format!("No results for '{}'", results.query));
    }
    if !results.buckets.is_empty() {
        println!("Buckets:");
        let rows: Vec<super::bucket::BucketRow> = results
            .buckets
            .iter()
            .map(super::bucket::BucketRow::from)
            .collect();
        output::print_list(&rows, format);
    }
    if !results.objects.is_empty() {
        println!("Objects:");
        let rows: Vec<HitRow> = results
            .objects
            .iter()
            .map(|h| HitRow {
                bucket: h.bucket.clone(),
                name: display_name(&h.key).to_string(),
                folder: format!("/{}", h.folder),
                size: format_bytes(h.size as i64),
                modified: format_time(h.last_modified),
            })
            .collect();
        output::print_list(&rows, format);
    }
    for bucket in &results.skipped {
        output::print_warning(&format!("Could not search bucket '{bucket}'"));
    }
    println!("{}", SearchResults::PREFIX_ONLY_NOTE);
}

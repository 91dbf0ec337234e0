//! Object and folder commands.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_entity::object::{display_name, format_bytes, is_folder_key};
use bucketdock_service::object::SelectionItem;
use bucketdock_service::{ExpiryDuration, FolderTree, ObjectFeed, UploadFile};

use super::{confirm, format_time};
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Bucket name
    pub bucket: String,
    /// Folder prefix
    #[arg(default_value = "")]
    pub prefix: String,
    /// Load every page instead of the first
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for `tree`
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Bucket name
    pub bucket: String,
    /// Expand down to this folder
    #[arg(default_value = "")]
    pub prefix: String,
}

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Bucket name
    pub bucket: String,
    /// Folder name
    pub name: String,
    /// Parent folder prefix
    #[arg(short, long, default_value = "")]
    pub prefix: String,
}

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Bucket name
    pub bucket: String,
    /// Local files or folders
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Target folder prefix
    #[arg(short, long, default_value = "")]
    pub prefix: String,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RmArgs {
    /// Bucket name
    pub bucket: String,
    /// Keys to delete; keys ending in `/` delete the whole folder
    #[arg(required = true)]
    pub keys: Vec<String>,
}

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Local destination (defaults to the file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Specific version
    #[arg(long)]
    pub version: Option<String>,
}

/// Arguments for `preview`
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

/// Arguments for `share`
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Days
    #[arg(short, long, default_value_t = 0)]
    pub days: u64,
    /// Hours (0-23)
    #[arg(short = 'H', long, default_value_t = 0)]
    pub hours: u64,
    /// Minutes (0-59); defaults to the configured link lifetime when nothing is given
    #[arg(short, long)]
    pub minutes: Option<u64>,
}

/// Folder listing row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct ObjectRow {
    /// Name
    name: String,
    /// Size
    size: String,
    /// Last modified
    modified: String,
    /// Full key
    key: String,
}

/// Folder tree row
#[derive(Debug, Serialize, Tabled)]
struct TreeRow {
    /// Folder
    folder: String,
    /// Prefix
    prefix: String,
}

/// List a folder
pub async fn ls(app: &App, args: &LsArgs, format: OutputFormat) -> AppResult<()> {
    app.open_bucket(&args.bucket).await?;
    print_folder(app, &args.bucket, &args.prefix, args.all, format).await
}

/// Print one folder of a bucket
pub(crate) async fn print_folder(
    app: &App,
    bucket: &str,
    prefix: &str,
    all: bool,
    format: OutputFormat,
) -> AppResult<()> {
    let browse = app.browse()?;
    let mut feed = ObjectFeed::new(bucket, prefix);
    if all {
        feed.load_all(&browse).await?;
    } else {
        feed.load_more(&browse).await?;
    }

    if format == OutputFormat::Table {
        let location = std::iter::once(bucket.to_string())
            .chain(browse.breadcrumbs(prefix).into_iter().map(|c| c.name))
            .collect::<Vec<_>>()
            .join(" / ");
        output::print_kv("Location", &location);
    }

    let rows: Vec<ObjectRow> = feed
        .folders()
        .iter()
        .map(|f| ObjectRow {
            name: format!("{}/", display_name(f)),
            size: "-".to_string(),
            modified: "-".to_string(),
            key: f.clone(),
        })
        .chain(feed.files().iter().map(|o| ObjectRow {
            name: display_name(&o.key).to_string(),
            size: format_bytes(o.size as i64),
            modified: format_time(o.last_modified),
            key: o.key.clone(),
        }))
        .collect();
    output::print_list(&rows, format);
    if feed.has_more() && format == OutputFormat::Table {
        output::print_warning("More objects available: pass --all to load every page");
    }
    Ok(())
}

/// Show the folder tree
pub async fn tree(app: &App, args: &TreeArgs, format: OutputFormat) -> AppResult<()> {
    app.open_bucket(&args.bucket).await?;
    let browse = app.browse()?;
    let mut root = FolderTree::root(&args.bucket);
    root.expand_path(&browse, &args.bucket, &args.prefix).await?;

    match format {
        OutputFormat::Json => output::print_item(&root, format),
        OutputFormat::Table => {
            let mut rows = Vec::new();
            flatten(&root, 0, &mut rows);
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

fn flatten(node: &FolderTree, depth: usize, rows: &mut Vec<TreeRow>) {
    let marker = if node.children.is_some() { "▾" } else { "▸" };
    rows.push(TreeRow {
        folder: format!("{}{marker} {}", "  ".repeat(depth), node.name),
        prefix: node.prefix.clone(),
    });
    for child in node.children.iter().flatten() {
        flatten(child, depth + 1, rows);
    }
}

/// Create a folder
pub async fn mkdir(app: &App, args: &MkdirArgs) -> AppResult<()> {
    let (_, access) = app.open_bucket(&args.bucket).await?;
    access.require_write()?;
    app.uploads()?
        .create_folder(&args.bucket, &normalize_prefix(&args.prefix), &args.name)
        .await?;
    Ok(())
}

/// Upload files and folders
pub async fn upload(app: &App, args: &UploadArgs, format: OutputFormat) -> AppResult<()> {
    let (_, access) = app.open_bucket(&args.bucket).await?;
    access.require_write()?;

    let mut files = Vec::new();
    for path in &args.paths {
        collect_files(path, &mut files).await?;
    }
    let report = app
        .uploads()?
        .upload(&app.ctx(), &args.bucket, &normalize_prefix(&args.prefix), &files)
        .await?;
    if format == OutputFormat::Json {
        output::print_item(&report, format);
    } else {
        output::print_kv("Uploaded", &format_bytes(report.bytes as i64));
    }
    Ok(())
}

/// Read `path` into upload files. Folders keep their name as the first path segment.
async fn collect_files(path: &Path, files: &mut Vec<UploadFile>) -> AppResult<()> {
    let metadata = tokio::fs::metadata(path).await?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    if metadata.is_file() {
        files.push(read_file(path, base).await?);
        return Ok(());
    }

    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let entry_path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(entry_path);
            } else {
                files.push(read_file(&entry_path, base).await?);
            }
        }
    }
    Ok(())
}

async fn read_file(path: &Path, base: &Path) -> AppResult<UploadFile> {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let relative_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let body = tokio::fs::read(path).await?;
    Ok(UploadFile::new(relative_path, body))
}

/// Delete files and folders
pub async fn rm(app: &App, args: &RmArgs, format: OutputFormat, yes: bool) -> AppResult<()> {
    let (_, access) = app.open_bucket(&args.bucket).await?;
    access.require_write()?;

    let prompt = format!(
        "Permanently delete {} item(s) from '{}'?",
        args.keys.len(),
        args.bucket
    );
    if !confirm(&prompt, yes)? {
        output::print_warning("Cancelled");
        return Ok(());
    }

    let deletes = app.deletes()?;
    let ctx = app.ctx();
    let outcome = match args.keys.as_slice() {
        [key] if is_folder_key(key) => deletes.delete_folder(&ctx, &args.bucket, key).await?,
        [key] => {
            let size = object_size(app, &args.bucket, key).await?;
            deletes.delete_object(&ctx, &args.bucket, key, size).await?
        }
        keys => {
            let mut items = Vec::with_capacity(keys.len());
            for key in keys {
                if is_folder_key(key) {
                    items.push(SelectionItem::Folder { prefix: key.clone() });
                } else {
                    let size = object_size(app, &args.bucket, key).await?;
                    items.push(SelectionItem::File {
                        key: key.clone(),
                        size,
                    });
                }
            }
            deletes.delete_selection(&ctx, &args.bucket, &items).await?
        }
    };
    if format == OutputFormat::Json {
        output::print_item(&outcome, format);
    } else {
        output::print_kv("Deleted", &outcome.deleted.to_string());
        output::print_kv("Freed", &format_bytes(outcome.bytes as i64));
    }
    Ok(())
}

/// Size of the current version of `key`, from a listing of its parent.
async fn object_size(app: &App, bucket: &str, key: &str) -> AppResult<u64> {
    let browse = app.browse()?;
    let parent = bucketdock_entity::object::parent_prefix(key);
    let mut feed = ObjectFeed::new(bucket, parent);
    feed.load_all(&browse).await?;
    feed.files()
        .iter()
        .find(|o| o.key == key)
        .map(|o| o.size)
        .ok_or_else(|| AppError::not_found(format!("Object '{key}' not found")))
}

/// Download a file
pub async fn download(app: &App, args: &DownloadArgs) -> AppResult<()> {
    app.open_bucket(&args.bucket).await?;
    let body = app
        .previews()?
        .fetch(&args.bucket, &args.key, args.version.as_deref())
        .await?;
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(display_name(&args.key)));
    tokio::fs::write(&target, &body).await?;
    output::print_success(&format!(
        "Saved {} ({})",
        target.display(),
        format_bytes(body.len() as i64)
    ));
    Ok(())
}

/// Preview a file
pub async fn preview(app: &App, args: &PreviewArgs, format: OutputFormat) -> AppResult<()> {
    app.open_bucket(&args.bucket).await?;
    let preview = app.previews()?.preview(&args.bucket, &args.key).await?;
    match format {
        OutputFormat::Json => output::print_item(&preview, format),
        OutputFormat::Table => {
            output::print_kv("File", display_name(&preview.key));
            output::print_kv("Kind", &format!("{:?}", preview.kind));
            output::print_kv("URL", &preview.url);
        }
    }
    Ok(())
}

/// Create a share link
pub async fn share(app: &App, args: &ShareArgs, format: OutputFormat) -> AppResult<()> {
    app.open_bucket(&args.bucket).await?;
    let expiry = match (args.days, args.hours, args.minutes) {
        (0, 0, None) => ExpiryDuration::minutes(app.config().share.default_link_minutes),
        (days, hours, minutes) => ExpiryDuration::new(days, hours, minutes.unwrap_or(0)),
    };
    let link = app
        .shares()?
        .share_link(&args.bucket, &args.key, &expiry)
        .await?;
    match format {
        OutputFormat::Json => output::print_item(&link, format),
        OutputFormat::Table => {
            output::print_kv("URL", &link.url);
            output::print_kv("Expires", &link.expires_at.format("%Y-%m-%d %H:%M UTC").to_string());
        }
    }
    Ok(())
}

/// Ensure a non-empty prefix ends in `/`.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("docs"), "docs/");
        assert_eq!(normalize_prefix("/docs/2024/"), "docs/2024/");
    }

    #[tokio::test]
    async fn test_collect_folder_keeps_folder_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("album");
        tokio::fs::create_dir_all(root.join("2024")).await.unwrap();
        tokio::fs::write(root.join("2024/cat.png"), b"png").await.unwrap();
        tokio::fs::write(root.join("notes.txt"), b"hi").await.unwrap();

        let mut files = Vec::new();
        collect_files(&root, &mut files).await.unwrap();
        let mut paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, ["album/2024/cat.png", "album/notes.txt"]);
    }
}

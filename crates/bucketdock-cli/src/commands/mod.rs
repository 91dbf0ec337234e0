//! CLI command definitions and dispatch.

pub mod access;
pub mod admin;
pub mod auth;
pub mod bucket;
pub mod object;
pub mod quota;
pub mod route;
pub mod search;
pub mod version;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use bucketdock_core::config::AppConfig;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_service::Notifier;

use crate::app::App;
use crate::notifier::ConsoleNotifier;
use crate::output::{self, OutputFormat};

/// BucketDock: a file manager for S3-compatible object storage
#[derive(Debug, Parser)]
#[command(name = "bucketdock", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login(auth::LoginArgs),
    /// Create an account
    Signup(auth::SignupArgs),
    /// Sign out
    Logout,
    /// Send a password reset email
    ForgotPassword(auth::ForgotPasswordArgs),
    /// Set a new password
    UpdatePassword(auth::UpdatePasswordArgs),
    /// Open a route such as `/`, `/bucket/photos/2024/` or `/admin`
    Open(route::OpenArgs),
    /// Bucket management
    Buckets(bucket::BucketArgs),
    /// List a folder
    Ls(object::LsArgs),
    /// Show the folder tree of a bucket
    Tree(object::TreeArgs),
    /// Create a folder
    Mkdir(object::MkdirArgs),
    /// Upload files or folders
    Upload(object::UploadArgs),
    /// Delete files and folders
    Rm(object::RmArgs),
    /// Download a file
    Download(object::DownloadArgs),
    /// Preview a file
    Preview(object::PreviewArgs),
    /// Create a temporary share link
    Share(object::ShareArgs),
    /// Version history
    Versions(version::VersionArgs),
    /// Bucket access management
    Access(access::AccessArgs),
    /// Search buckets and objects
    Search(search::SearchArgs),
    /// Storage quota
    Quota(quota::QuotaArgs),
    /// Administration
    Admin(admin::AdminArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let notifier: Arc<dyn Notifier> = match self.format {
            OutputFormat::Table => Arc::new(ConsoleNotifier::new()),
            OutputFormat::Json => Arc::new(ConsoleNotifier::quiet()),
        };
        let app = App::connect(config, notifier).await?;
        if let Some(banner) = app.banner() {
            output::print_banner(&banner);
        }
        app.restore_session().await?;

        let result = self.dispatch(&app).await;
        app.persist_session().await?;
        result
    }

    /// Run the command against an assembled application.
    pub async fn dispatch(&self, app: &App) -> AppResult<()> {
        let format = self.format;
        let yes = self.yes;
        match &self.command {
            Commands::Login(args) => auth::login(app, args).await,
            Commands::Signup(args) => auth::signup(app, args).await,
            Commands::Logout => auth::logout(app).await,
            Commands::ForgotPassword(args) => auth::forgot_password(app, args).await,
            Commands::UpdatePassword(args) => auth::update_password(app, args).await,
            Commands::Open(args) => route::execute(app, args, format).await,
            Commands::Buckets(args) => bucket::execute(app, args, format, yes).await,
            Commands::Ls(args) => object::ls(app, args, format).await,
            Commands::Tree(args) => object::tree(app, args, format).await,
            Commands::Mkdir(args) => object::mkdir(app, args).await,
            Commands::Upload(args) => object::upload(app, args, format).await,
            Commands::Rm(args) => object::rm(app, args, format, yes).await,
            Commands::Download(args) => object::download(app, args).await,
            Commands::Preview(args) => object::preview(app, args, format).await,
            Commands::Share(args) => object::share(app, args, format).await,
            Commands::Versions(args) => version::execute(app, args, format, yes).await,
            Commands::Access(args) => access::execute(app, args, format, yes).await,
            Commands::Search(args) => search::execute(app, args, format).await,
            Commands::Quota(args) => quota::execute(app, args, format).await,
            Commands::Admin(args) => admin::execute(app, args, format, yes).await,
        }
    }
}

/// Ask before a destructive action unless `--yes` was given.
pub(crate) fn confirm(prompt: &str, yes: bool) -> AppResult<bool> {
    if yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

/// Prompt for a line of text when `value` is missing.
pub(crate) fn input_or_prompt(value: &Option<String>, prompt: &str) -> AppResult<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Prompt for a password when `value` is missing.
pub(crate) fn password_or_prompt(
    value: &Option<String>,
    prompt: &str,
    confirm: bool,
) -> AppResult<String> {
    if let Some(v) = value {
        return Ok(v.clone());
    }
    let mut prompt_builder = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        prompt_builder =
            prompt_builder.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt_builder
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

/// Format an optional timestamp for tables.
pub(crate) fn format_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

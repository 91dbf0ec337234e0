//! Administration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::{SpaceRequestId, UserId};
use bucketdock_entity::object::format_bytes;
use bucketdock_entity::profile::{UpdateProfile, UserAccount, UserRole};
use bucketdock_entity::space_request::SpaceUnit;

use super::quota::RequestRow;
use super::{confirm, input_or_prompt};
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `admin`
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List all users
    Users,
    /// Invite a new user
    AddUser {
        /// Email address
        email: String,
        /// user or admin
        #[arg(short, long, default_value = "user")]
        role: UserRole,
    },
    /// Change a user's role, status or space limit
    EditUser {
        /// User email or id
        user: String,
        /// New role
        #[arg(short, long)]
        role: Option<UserRole>,
        /// Activate or deactivate the account
        #[arg(long)]
        active: Option<bool>,
        /// New space limit
        #[arg(short, long)]
        limit: Option<f64>,
        /// Unit for --limit
        #[arg(short, long, default_value = "GB")]
        unit: SpaceUnit,
    },
    /// Delete a user
    DeleteUser {
        /// User email or id
        user: String,
    },
    /// Show usage statistics
    Stats,
    /// List space requests
    Requests,
    /// Approve a space request
    Approve {
        /// Request id
        id: SpaceRequestId,
    },
    /// Reject a space request
    Reject {
        /// Request id
        id: SpaceRequestId,
        /// Notes for the requester (will prompt if not provided)
        #[arg(short, long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// Email
    email: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Used
    used: String,
    /// Limit
    limit: String,
    /// User id
    id: String,
}

impl From<&UserAccount> for UserRow {
    fn from(u: &UserAccount) -> Self {
        Self {
            email: u.email.clone().unwrap_or_default(),
            role: u.role.to_string(),
            status: if u.is_active { "active" } else { "inactive" }.to_string(),
            used: format_bytes(u.space_used),
            limit: format_bytes(u.space_limit),
            id: u.id.to_string(),
        }
    }
}

/// Execute admin commands
pub async fn execute(
    app: &App,
    args: &AdminArgs,
    format: OutputFormat,
    yes: bool,
) -> AppResult<()> {
    let ctx = app.ctx();
    let admin = app.admin();
    match &args.command {
        AdminCommand::Users => print_users(app, format).await,
        AdminCommand::AddUser { email, role } => admin.invite_user(&ctx, email, *role).await,
        AdminCommand::EditUser {
            user,
            role,
            active,
            limit,
            unit,
        } => {
            let target = resolve_user(app, user).await?;
            let update = UpdateProfile {
                role: *role,
                is_active: *active,
                space_limit: limit.map(|l| (l * unit.multiplier() as f64).round() as i64),
            };
            admin.edit_user(&ctx, target.id, &update).await
        }
        AdminCommand::DeleteUser { user } => {
            let target = resolve_user(app, user).await?;
            let label = target.email.clone().unwrap_or_else(|| target.id.to_string());
            let prompt = format!("Delete user {label}? This cannot be undone.");
            if !confirm(&prompt, yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            admin.delete_user(&ctx, target.id).await
        }
        AdminCommand::Stats => print_stats(app, format).await,
        AdminCommand::Requests => {
            let requests = app.space_requests().list_all(&ctx).await?;
            let rows: Vec<RequestRow> = requests.iter().map(RequestRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
        AdminCommand::Approve { id } => app.space_requests().approve(&ctx, *id).await,
        AdminCommand::Reject { id, notes } => {
            let notes = input_or_prompt(notes, "Notes for the requester")?;
            app.space_requests().reject(&ctx, *id, &notes).await
        }
    }
}

/// Print every user account
pub(crate) async fn print_users(app: &App, format: OutputFormat) -> AppResult<()> {
    let users = app.admin().list_users(&app.ctx()).await?;
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

#[derive(Debug, Serialize)]
struct Stats {
    users: usize,
    active_users: usize,
    admins: usize,
    total_used_bytes: i64,
    pending_requests: usize,
}

/// Print usage statistics
pub(crate) async fn print_stats(app: &App, format: OutputFormat) -> AppResult<()> {
    let ctx = app.ctx();
    let admin = app.admin();
    let users = admin.list_users(&ctx).await?;
    let total = admin.total_used_space(&ctx).await?;
    let pending = app
        .space_requests()
        .list_all(&ctx)
        .await?
        .iter()
        .filter(|r| !r.status.is_final())
        .count();
    let stats = Stats {
        users: users.len(),
        active_users: users.iter().filter(|u| u.is_active).count(),
        admins: users.iter().filter(|u| u.role.is_admin()).count(),
        total_used_bytes: total,
        pending_requests: pending,
    };
    match format {
        OutputFormat::Json => output::print_item(&stats, format),
        OutputFormat::Table => {
            output::print_kv("Users", &stats.users.to_string());
            output::print_kv("Active users", &stats.active_users.to_string());
            output::print_kv("Admins", &stats.admins.to_string());
            output::print_kv("Total space used", &format_bytes(stats.total_used_bytes));
            output::print_kv("Pending space requests", &stats.pending_requests.to_string());
        }
    }
    Ok(())
}

/// Find an account by email (case-insensitive) or id.
async fn resolve_user(app: &App, user: &str) -> AppResult<UserAccount> {
    let by_id = user.parse::<UserId>().ok();
    app.admin()
        .list_users(&app.ctx())
        .await?
        .into_iter()
        .find(|u| {
            Some(u.id) == by_id
                || u.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(user))
        })
        .ok_or_else(|| AppError::not_found(format!("User '{user}' not found")))
}

//! Bucket membership commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::UserId;
use bucketdock_entity::bucket::Bucket;
use bucketdock_entity::member::{BucketMember, MemberRole};

use super::confirm;
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `access`
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Bucket name
    pub bucket: String,
    /// Access subcommand (lists members when omitted)
    #[command(subcommand)]
    pub command: Option<AccessCommand>,
}

/// Access subcommands
#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// List members
    Members,
    /// Invite users by email
    Invite {
        /// Addresses separated by commas, semicolons or newlines
        emails: String,
        /// read-only or read-write
        #[arg(short, long, default_value = "read-only")]
        role: MemberRole,
    },
    /// Change a member's role
    Role {
        /// Member email or user id
        member: String,
        /// read-only or read-write
        role: MemberRole,
    },
    /// Remove a member
    Remove {
        /// Member email or user id
        member: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    /// Email
    email: String,
    /// Role
    role: String,
    /// User id
    user_id: String,
}

#[derive(Debug, Serialize, Tabled)]
struct InviteRow {
    /// Email
    email: String,
    /// Result
    result: String,
}

/// Execute access commands
pub async fn execute(
    app: &App,
    args: &AccessArgs,
    format: OutputFormat,
    yes: bool,
) -> AppResult<()> {
    let (bucket, access) = app.open_bucket(&args.bucket).await?;
    let service = app.access();
    let command = match &args.command {
        None | Some(AccessCommand::Members) => {
            let members = service.members(&bucket).await?;
            let rows: Vec<MemberRow> = members
                .iter()
                .map(|m| MemberRow {
                    email: m.email.clone(),
                    role: m.role.to_string(),
                    user_id: m.user_id.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
            return Ok(());
        }
        Some(command) => command,
    };

    access.require_manage()?;
    match command {
        AccessCommand::Members => Ok(()),
        AccessCommand::Invite { emails, role } => {
            let report = service.invite(&app.ctx(), &bucket, emails, *role).await?;
            if format == OutputFormat::Json {
                output::print_item(&report, format);
                return Ok(());
            }
            let rows: Vec<InviteRow> = report
                .outcomes
                .iter()
                .map(|o| InviteRow {
                    email: o.email.clone(),
                    result: o.error.clone().unwrap_or_else(|| "invited".to_string()),
                })
                .chain(report.skipped.iter().map(|s| InviteRow {
                    email: s.clone(),
                    result: "skipped: invalid address".to_string(),
                }))
                .collect();
            output::print_list(&rows, format);
            Ok(())
        }
        AccessCommand::Role { member, role } => {
            let target = resolve_member(app, &bucket, member).await?;
            service.change_role(&bucket, target.user_id, *role).await
        }
        AccessCommand::Remove { member } => {
            let target = resolve_member(app, &bucket, member).await?;
            let prompt = format!("Remove {} from '{}'?", target.email, bucket.name);
            if !confirm(&prompt, yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            service.remove(&bucket, target.user_id).await?;
            Ok(())
        }
    }
}

/// Find a member by email (case-insensitive) or user id.
async fn resolve_member(app: &App, bucket: &Bucket, member: &str) -> AppResult<BucketMember> {
    let by_id = member.parse::<UserId>().ok();
    let target = app
        .access()
        .members(bucket)
        .await?
        .into_iter()
        .find(|m| Some(m.user_id) == by_id || m.email.eq_ignore_ascii_case(member))
        .ok_or_else(|| {
            AppError::not_found(format!("'{member}' is not a member of '{}'", bucket.name))
        })?;
    if target.is_owner {
        return Err(AppError::validation("The bucket owner cannot be changed or removed"));
    }
    Ok(target)
}

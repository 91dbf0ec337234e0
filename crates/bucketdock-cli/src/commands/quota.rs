//! Storage quota commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketdock_core::result::AppResult;
use bucketdock_entity::object::format_bytes;
use bucketdock_entity::space_request::{SpaceRequest, SpaceUnit};

use super::format_time;
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `quota`
#[derive(Debug, Args)]
pub struct QuotaArgs {
    /// Quota subcommand (shows usage when omitted)
    #[command(subcommand)]
    pub command: Option<QuotaCommand>,
}

/// Quota subcommands
#[derive(Debug, Subcommand)]
pub enum QuotaCommand {
    /// Show used space and limit
    Show,
    /// Ask an administrator for more space
    Request {
        /// Amount of space
        amount: f64,
        /// MB or GB
        #[arg(short, long, default_value = "GB")]
        unit: SpaceUnit,
        /// Why you need it
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// List your space requests
    Requests,
}

/// Space request display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct RequestRow {
    /// Request id
    id: String,
    /// Requester
    email: String,
    /// Requested
    requested: String,
    /// Status
    status: String,
    /// Reason
    reason: String,
    /// Admin notes
    notes: String,
    /// Submitted
    submitted: String,
}

impl From<&SpaceRequest> for RequestRow {
    fn from(r: &SpaceRequest) -> Self {
        Self {
            id: r.id.to_string(),
            email: r.email.clone().unwrap_or_default(),
            requested: format_bytes(r.requested_space),
            status: r.status.as_str().to_string(),
            reason: r.reason.clone().unwrap_or_default(),
            notes: r.admin_notes.clone().unwrap_or_default(),
            submitted: format_time(Some(r.created_at)),
        }
    }
}

/// Execute quota commands
pub async fn execute(app: &App, args: &QuotaArgs, format: OutputFormat) -> AppResult<()> {
    let ctx = app.ctx();
    match &args.command {
        None | Some(QuotaCommand::Show) => {
            let quota = app.quota().current(&ctx).await?;
            match format {
                OutputFormat::Json => output::print_item(&quota, format),
                OutputFormat::Table => {
                    output::print_kv("Used", &format_bytes(quota.used_bytes));
                    let limit = quota
                        .total_bytes
                        .map(format_bytes)
                        .unwrap_or_else(|| "unlimited".to_string());
                    output::print_kv("Limit", &limit);
                    if let Some(percent) = quota.usage_percent {
                        output::print_kv("Usage", &format!("{percent:.1}%"));
                    }
                    if quota.is_exceeded() {
                        output::print_warning(
                            "Storage limit reached: request more space with `quota request`",
                        );
                    }
                }
            }
            Ok(())
        }
        Some(QuotaCommand::Request {
            amount,
            unit,
            reason,
        }) => {
            let request = app
                .space_requests()
                .submit(&ctx, *amount, *unit, reason.clone())
                .await?;
            if format == OutputFormat::Json {
                output::print_item(&request, format);
            }
            Ok(())
        }
        Some(QuotaCommand::Requests) => {
            let requests = app.space_requests().list_own(&ctx).await?;
            let rows: Vec<RequestRow> = requests.iter().map(RequestRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
    }
}

//! Route navigation.
//!
//! `open` renders the page a web route would show, after running the same
//! guard: unauthenticated viewers are sent to `/login`, non-admins away
//! from `/admin`, and buckets shared publicly open without a session.

use clap::Args;

use bucketdock_auth::{GuardDecision, Route, RouteGuard};
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_entity::bucket::PublicLevel;

use crate::app::App;
use crate::output::{self, OutputFormat};

const MAX_REDIRECTS: usize = 4;

/// Arguments for `open`
#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Route path, e.g. `/`, `/bucket/photos/2024/`, `/search?q=cat`
    #[arg(default_value = "/")]
    pub route: String,
}

/// Resolve, guard and render a route
pub async fn execute(app: &App, args: &OpenArgs, format: OutputFormat) -> AppResult<()> {
    let mut route = Route::parse(&args.route);
    for _ in 0..MAX_REDIRECTS {
        let level = bucket_level(app, &route).await;
        let decision = RouteGuard::evaluate(
            &route,
            &app.auth().sessions().state(),
            &app.auth().profiles().state(),
            level,
        );
        match decision {
            GuardDecision::Render => return render(app, &route, format).await,
            GuardDecision::Redirect(to) => {
                tracing::debug!(from = %route, to = %to, "Route redirected");
                output::print_warning(&format!("{route} is not available: redirected to {to}"));
                route = Route::parse(&to);
            }
            GuardDecision::Pending => {
                return Err(AppError::session("Session is still loading, try again"));
            }
        }
    }
    Err(AppError::internal(format!(
        "Too many redirects while opening {}",
        args.route
    )))
}

/// Public level of the bucket a route points at, if it can be read.
async fn bucket_level(app: &App, route: &Route) -> Option<PublicLevel> {
    let Route::Bucket { name, .. } = route else {
        return None;
    };
    match app.find_bucket(name).await {
        Ok(bucket) => Some(bucket.public_level),
        Err(e) => {
            tracing::debug!(bucket = %name, error = %e, "Bucket level unavailable");
            None
        }
    }
}

async fn render(app: &App, route: &Route, format: OutputFormat) -> AppResult<()> {
    match route {
        Route::Login => {
            if app.auth().sessions().session().is_some() {
                output::print_success("Already signed in");
            } else {
                println!("Sign in with `bucketdock login`");
            }
            Ok(())
        }
        Route::UpdatePassword => {
            println!("Set a new password with `bucketdock update-password`");
            Ok(())
        }
        Route::Home => super::bucket::list(app, false, format).await,
        Route::Bucket { name, prefix } => {
            app.open_bucket(name).await?;
            super::object::print_folder(app, name, prefix, false, format).await
        }
        Route::Search { query } => {
            let results = app.search()?.search(&app.ctx(), query).await?;
            super::search::print_results(&results, format);
            Ok(())
        }
        Route::Admin => {
            super::admin::print_stats(app, format).await?;
            super::admin::print_users(app, format).await
        }
        Route::NotFound(path) => Err(AppError::not_found(format!("404: no page at {path}"))),
    }
}

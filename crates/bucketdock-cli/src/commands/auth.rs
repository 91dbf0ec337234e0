//! Sign-in, sign-up and password commands.

use clap::Args;

use bucketdock_core::result::AppResult;

use super::{input_or_prompt, password_or_prompt};
use crate::app::App;
use crate::output;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `signup`
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Email address (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `forgot-password`
#[derive(Debug, Args)]
pub struct ForgotPasswordArgs {
    /// Email address (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Arguments for `update-password`
#[derive(Debug, Args)]
pub struct UpdatePasswordArgs {
    /// New password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Sign in
pub async fn login(app: &App, args: &LoginArgs) -> AppResult<()> {
    let email = input_or_prompt(&args.email, "Email")?;
    let password = password_or_prompt(&args.password, "Password", false)?;
    let profile = app.auth().sign_in(&email, &password).await?;
    output::print_success(&format!(
        "Signed in as {}",
        profile.email.as_deref().unwrap_or(&email)
    ));
    Ok(())
}

/// Create an account
pub async fn signup(app: &App, args: &SignupArgs) -> AppResult<()> {
    let email = input_or_prompt(&args.email, "Email")?;
    let password = password_or_prompt(&args.password, "Password", true)?;
    if app.auth().sign_up(&email, &password).await? {
        output::print_success(&format!("Account created. Signed in as {email}"));
    } else {
        output::print_success("Check your email to confirm your account.");
    }
    Ok(())
}

/// Sign out
pub async fn logout(app: &App) -> AppResult<()> {
    app.auth().sign_out().await?;
    output::print_success("Signed out");
    Ok(())
}

/// Send a password reset email
pub async fn forgot_password(app: &App, args: &ForgotPasswordArgs) -> AppResult<()> {
    let email = input_or_prompt(&args.email, "Email")?;
    app.auth().forgot_password(&email).await?;
    output::print_success("Check your email for a password reset link.");
    Ok(())
}

/// Set a new password
pub async fn update_password(app: &App, args: &UpdatePasswordArgs) -> AppResult<()> {
    let password = password_or_prompt(&args.password, "New password", true)?;
    app.auth().update_password(&password).await?;
    output::print_success("Password updated successfully.");
    Ok(())
}

//! # bucketdock-cli
//!
//! Terminal client for BucketDock. Commands stand in for the pages and
//! dialogs of the web client; `open <route>` resolves a client-side route
//! through the route guard and renders the page it lands on.

pub mod app;
pub mod commands;
pub mod notifier;
pub mod output;
pub mod session_file;

pub use app::App;
pub use commands::Cli;
pub use notifier::ConsoleNotifier;
pub use session_file::SessionFile;

//! Command dispatch: bridges CLI args -> dashboard facade -> output formatting.

pub mod charts;
pub mod config_cmd;
pub mod dashboard;
pub mod employee;
pub mod login;
pub mod payment;
pub mod payrun;

use paydesk_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(dashboard, global),
        Command::Dashboard(args) => dashboard::handle(dashboard, &args, global).await,
        Command::Charts(args) => charts::handle(dashboard, &args, global).await,
        Command::Payrun(args) => payrun::handle(dashboard, args, global).await,
        Command::Employee(args) => employee::handle(dashboard, args, global).await,
        Command::Payment(args) => payment::handle(dashboard, args, global).await,
        // Config is handled before a session is opened
        Command::Config(args) => config_cmd::handle(args, global),
    }
}

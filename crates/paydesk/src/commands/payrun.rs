//! Pay run command handlers.

use tabled::Tabled;

use paydesk_core::{
    Command as CoreCommand, CommandResult, Dashboard, EntityId, FetchKind, ListQuery, PayRun,
};

use crate::cli::{GlobalOpts, PayRunArgs, PayRunCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct PayRunRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl PayRunRow {
    pub fn new(p: &PayRun, color: bool) -> Self {
        Self {
            id: p.id.to_string(),
            period: p.period_type.to_string(),
            from: p.start_date.map(|d| d.to_string()).unwrap_or_default(),
            to: p.end_date.map(|d| d.to_string()).unwrap_or_default(),
            status: output::pay_run_status(p.status, color),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: PayRunArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    let command = match args.command {
        PayRunCommand::List { status } => {
            let mut filters = ListQuery::new();
            filters.status = status;
            dashboard.fetch_filtered(FetchKind::PayRuns, filters).await?;

            let snap = dashboard.store().pay_runs_snapshot();
            let out = output::render_list(&global.output, snap.as_slice(), |p| PayRunRow::new(p, color))?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        PayRunCommand::Approve { id } => CoreCommand::ApprovePayRun {
            id: EntityId::from(id.as_str()),
        },
        PayRunCommand::Close { id } => CoreCommand::ClosePayRun {
            id: EntityId::from(id.as_str()),
        },
    };

    if let CommandResult::PayRun(pay_run) = dashboard.execute(command).await? {
        let out = output::render_single(&global.output, &pay_run, |p| {
            format!(
                "Pay run {} is now {}",
                p.id,
                output::pay_run_status(p.status, color)
            )
        })?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

//! Employee command handlers.

use tabled::Tabled;

use paydesk_core::{
    Command as CoreCommand, CommandResult, Dashboard, Employee, EntityId, FetchKind, ListQuery,
};

use crate::cli::{EmployeeArgs, EmployeeCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Contract")]
    contract: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl EmployeeRow {
    pub fn new(e: &Employee, color: bool) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.full_name.clone(),
            position: e.position.clone(),
            contract: e.contract_type.clone(),
            rate: output::amount(e.pay_rate),
            status: output::employee_status(e.status, color),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: EmployeeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    let command = match args.command {
        EmployeeCommand::List { status, search } => {
            let mut filters = ListQuery::new();
            filters.status = status;
            filters.search = search;
            dashboard
                .fetch_filtered(FetchKind::Employees, filters)
                .await?;

            let snap = dashboard.store().employees_snapshot();
            let out = output::render_list(&global.output, snap.as_slice(), |e| EmployeeRow::new(e, color))?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        EmployeeCommand::Activate { id } => CoreCommand::ActivateEmployee {
            id: EntityId::from(id.as_str()),
        },
        EmployeeCommand::Deactivate { id } => CoreCommand::DeactivateEmployee {
            id: EntityId::from(id.as_str()),
        },
    };

    if let CommandResult::Employee(employee) = dashboard.execute(command).await? {
        let out = output::render_single(&global.output, &employee, |e| {
            format!(
                "Employee {} ({}) is now {}",
                e.id,
                e.full_name,
                output::employee_status(e.status, color)
            )
        })?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

//! Payment command handlers.

use tabled::Tabled;

use paydesk_core::{Dashboard, EntityId, Payment};

use crate::cli::{GlobalOpts, PaymentArgs, PaymentCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct PaymentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Employee")]
    employee: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Paid at")]
    paid_at: String,
}

impl PaymentRow {
    pub fn new(p: &Payment) -> Self {
        Self {
            id: p.id.to_string(),
            employee: p.employee_name.clone().unwrap_or_default(),
            amount: output::amount(p.amount),
            method: p.method.to_string(),
            paid_at: p
                .paid_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: PaymentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PaymentCommand::List => {
            dashboard.fetch_payments().await?;
            let snap = dashboard.store().payments_snapshot();
            let out = output::render_list(&global.output, snap.as_slice(), |p| PaymentRow::new(p))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PaymentCommand::Receipt { id, out } => {
            let bytes = dashboard
                .payment_receipt(&EntityId::from(id.as_str()))
                .await?;
            std::fs::write(&out, &bytes)?;
            if !global.quiet {
                eprintln!("Saved receipt ({} bytes) to {}", bytes.len(), out.display());
            }
            Ok(())
        }
    }
}

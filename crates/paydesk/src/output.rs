//! Output formatting: table or JSON.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use paydesk_core::{EmployeeStatus, PayRunStatus, PayslipStatus};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn pay_run_status(status: PayRunStatus, color: bool) -> String {
    let text = status.to_string();
    if !color {
        return text;
    }
    match status {
        PayRunStatus::Brouillon => text.yellow().to_string(),
        PayRunStatus::Approuve => text.cyan().to_string(),
        PayRunStatus::Cloture => text.green().to_string(),
        PayRunStatus::Unknown => text.dimmed().to_string(),
    }
}

pub fn employee_status(status: EmployeeStatus, color: bool) -> String {
    let text = status.to_string();
    match (color, status) {
        (true, EmployeeStatus::Actif) => text.green().to_string(),
        (true, EmployeeStatus::Inactif) => text.red().to_string(),
        _ => text,
    }
}

pub fn payslip_status(status: PayslipStatus, color: bool) -> String {
    let text = status.to_string();
    match (color, status) {
        (true, PayslipStatus::Paye) => text.green().to_string(),
        (true, PayslipStatus::Partiel) => text.yellow().to_string(),
        (true, PayslipStatus::EnAttente) => text.red().to_string(),
        _ => text,
    }
}

/// Section heading printed above each table.
pub fn heading(title: &str, color: bool) -> String {
    if color {
        title.bold().to_string()
    } else {
        title.to_owned()
    }
}

/// Format an amount with thousands separators and no decimals.
pub fn amount(value: f64) -> String {
    let value = value.round();
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views don't use
/// `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

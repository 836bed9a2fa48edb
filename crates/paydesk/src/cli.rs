//! Clap derive structures for the `paydesk` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use paydesk_core::ChartKey;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// paydesk -- payroll dashboard from the command line
#[derive(Debug, Parser)]
#[command(
    name = "paydesk",
    version,
    about = "Payroll dashboard for the command line",
    long_about = "Log in to a payroll server, refresh the dashboard for your role,\n\
        and act on employees, pay runs and payments.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "PAYDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "PAYDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Login email (overrides profile)
    #[arg(long, short = 'e', env = "PAYDESK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Login password
    #[arg(long, env = "PAYDESK_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PAYDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PAYDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PAYDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the session identity
    Login,

    /// Refresh everything your role can see and print it
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Print dashboard chart series
    Charts(ChartsArgs),

    /// List, approve and close pay runs
    #[command(alias = "pr")]
    Payrun(PayRunArgs),

    /// List, activate and deactivate employees
    #[command(alias = "emp")]
    Employee(EmployeeArgs),

    /// List payments and download receipts
    #[command(alias = "pay")]
    Payment(PaymentArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),
}

// ── Dashboard ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Only print the KPI summary
    #[arg(long)]
    pub kpis_only: bool,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    /// Chart to print (all four when omitted)
    #[arg(value_parser = clap::value_parser!(ChartKey))]
    pub key: Option<ChartKey>,
}

// ── Entities ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PayRunArgs {
    #[command(subcommand)]
    pub command: PayRunCommand,
}

#[derive(Debug, Subcommand)]
pub enum PayRunCommand {
    /// List pay runs
    #[command(alias = "ls")]
    List {
        /// Filter by status (BROUILLON, APPROUVE, CLOTURE)
        #[arg(long)]
        status: Option<String>,
    },

    /// Approve a draft pay run
    Approve {
        /// Pay run ID
        id: String,
    },

    /// Close an approved pay run
    Close {
        /// Pay run ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct EmployeeArgs {
    #[command(subcommand)]
    pub command: EmployeeCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// List employees
    #[command(alias = "ls")]
    List {
        /// Filter by status (ACTIF, INACTIF)
        #[arg(long)]
        status: Option<String>,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Reactivate an employee
    Activate {
        /// Employee ID
        id: String,
    },

    /// Deactivate an employee
    Deactivate {
        /// Employee ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct PaymentArgs {
    #[command(subcommand)]
    pub command: PaymentCommand,
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// List payments
    #[command(alias = "ls")]
    List,

    /// Download a payment receipt as PDF
    Receipt {
        /// Payment ID
        id: String,

        /// Output file
        #[arg(long, short = 'O', default_value = "receipt.pdf")]
        out: PathBuf,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration (passwords masked)
    Show,

    /// Add or replace a profile
    SetProfile {
        /// Profile name
        name: String,

        /// API base URL
        #[arg(long)]
        url: String,

        /// Login email
        #[arg(long)]
        login: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Store a profile's password in the system keyring
    SetPassword,
}

//! Config subcommand handlers.

use std::fmt::Write;

use secrecy::SecretString;

use paydesk_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking passwords.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "error_ttl_secs = {}", cfg.defaults.error_ttl_secs);
    let _ = writeln!(out, "chart_window_months = {}", cfg.defaults.chart_window_months);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ttl) = p.error_ttl_secs {
            let _ = writeln!(out, "error_ttl_secs = {ttl}");
        }
        if let Some(months) = p.chart_window_months {
            let _ = writeln!(out, "chart_window_months = {months}");
        }
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::SetProfile {
            name,
            url,
            login,
            default,
        } => {
            let mut cfg = config::load_config_or_default();
            let profile = Profile {
                api_url: url,
                email: login,
                ..cfg.profiles.remove(&name).unwrap_or_default()
            };
            paydesk_config::profile_to_dashboard_config(&profile, &cfg.defaults)?;

            cfg.profiles.insert(name.clone(), profile);
            if default {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Profile '{name}' saved to {}", config::config_path().display());
            }
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            let password = rpassword::prompt_password(format!("Password for '{name}': "))?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            config::store_password(&name, &SecretString::from(password))?;
            if !global.quiet {
                eprintln!("Password stored in the system keyring for profile '{name}'");
            }
            Ok(())
        }
    }
}

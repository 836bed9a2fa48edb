//! CLI-aware configuration: wraps `paydesk-config` with `GlobalOpts`
//! overrides.

use std::io::IsTerminal;

use secrecy::SecretString;

use paydesk_config::{Config, Profile};
use paydesk_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use paydesk_config::{config_path, load_config_or_default, save_config, store_password};

/// Everything needed to open a session.
pub struct Resolved {
    pub profile: String,
    pub dashboard: DashboardConfig,
    pub email: String,
    pub password: SecretString,
}

/// Determine the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.active_profile_name(global.profile.as_deref())
}

/// Resolve a `DashboardConfig` plus login credentials from the config
/// file, the active profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
            });
        }
        // No profile: build one from flags alone.
        None => Profile {
            api_url: global.api_url.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?,
            ..Profile::default()
        },
    };

    let profile = apply_overrides(profile, global);
    let dashboard = paydesk_config::profile_to_dashboard_config(&profile, &cfg.defaults)?;

    let email = profile
        .email
        .clone()
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;
    let password = resolve_password(global, &profile, &profile_name)?;

    Ok(Resolved {
        profile: profile_name,
        dashboard,
        email,
        password,
    })
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.email.is_some() {
        profile.email.clone_from(&global.email);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    profile
}

/// Password chain: `--password` / `PAYDESK_PASSWORD`, then the profile's
/// credential chain, then an interactive prompt.
fn resolve_password(
    global: &GlobalOpts,
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, CliError> {
    if let Some(ref pw) = global.password {
        return Ok(SecretString::from(pw.clone()));
    }

    match paydesk_config::resolve_password(profile, profile_name) {
        Ok(pw) => Ok(pw),
        Err(_) if std::io::stdin().is_terminal() => {
            let pw = rpassword::prompt_password("Password: ")?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}


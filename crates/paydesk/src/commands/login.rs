//! Login handler: the session is already open, print who we are.

use std::fmt::Write;

use paydesk_core::Dashboard;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let identity = dashboard.identity().ok_or_else(|| CliError::AuthFailed {
        profile: "current".into(),
        message: "no identity after login".into(),
    })?;

    let out = output::render_single(&global.output, &identity, |id| {
        let mut s = String::new();
        let _ = writeln!(s, "User     {}", id.user_id);
        let _ = writeln!(s, "Role     {}", id.role);
        let _ = write!(
            s,
            "Company  {}",
            id.tenant_id
                .as_ref()
                .map_or_else(|| "(all)".to_owned(), ToString::to_string)
        );
        s
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

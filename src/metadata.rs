//! Service metadata reader: extracts `opts`/`description` shell variables
//! by sourcing the resolved script in a subshell.
//!
//! The sourcing command is a fixed template; the script path is always
//! passed as a positional argument (`$1`), never interpolated into the
//! command string, to avoid shell injection (see `SPEC_FULL.md` §9).
use std::process::{Command, Stdio};

use crate::context::Context;
use crate::error::{RcError, Result};
use crate::resolve::service_resolve;

const DEFAULT_SHELL: &str = "sh";

fn run_sourcing_command(script: &std::path::Path, echo_expr: &str) -> Result<String> {
    let command = format!(". \"$1\"; echo {echo_expr}");
    let output = Command::new(DEFAULT_SHELL)
        .arg("-c")
        .arg(&command)
        .arg(DEFAULT_SHELL) // $0
        .arg(script) // $1
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| RcError::io(script, e))?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Sources `service`'s script and returns the sorted, unique, space-split
/// tokens of `${opts}`.
pub fn extra_commands(ctx: &Context, service: &str) -> Result<Vec<String>> {
    let script = service_resolve(ctx, service)?;
    let stdout = run_sourcing_command(&script, "\"${opts}\"")?;
    let mut tokens: Vec<String> = stdout
        .split(' ')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    tokens.sort();
    tokens.dedup();
    Ok(tokens)
}

/// Sources `service`'s script and returns the first line of `${description}`
/// or, if `option` is given, `${description_<option>}`.
pub fn description(ctx: &Context, service: &str, option: Option<&str>) -> Result<String> {
    let script = service_resolve(ctx, service)?;
    if let Some(opt) = option {
        if !opt.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') || opt.is_empty() {
            return Err(RcError::NotFound(format!("invalid option name '{opt}'")));
        }
    }
    let var = match option {
        Some(opt) => format!("\"${{description_{opt}}}\""),
        None => "\"${description}\"".to_string(),
    };
    let stdout = run_sourcing_command(&script, &var)?;
    Ok(stdout.lines().next().unwrap_or("").to_string())
}


#[cfg(test)]
use std::os::unix::fs::PermissionsExt;

use std::convert::Infallible;
use std::os::unix::process::CommandExt;
use std::process::Command;

use crate::{Result, SsmExecError};

/// Replace the current process image with `argv`, running under `env`.
///
/// The executable is resolved on the search path first, so a missing command
/// fails before any exec attempt. `env` entries are `KEY=VALUE`; they are
/// applied in order, so a later entry overrides an earlier one with the same
/// key. On success this call does not return.
pub fn replace_process(argv: &[String], env: &[String]) -> Result<Infallible> {
    let program = argv.first().ok_or(SsmExecError::MissingCommand)?;
    let resolved =
        which::which(program).map_err(|_| SsmExecError::ExecutableNotFound(program.clone()))?;

    let mut command = Command::new(resolved);
    command.arg0(program);
    command.args(&argv[1..]);
    command.env_clear();
    for entry in env {
        if let Some((key, value)) = entry.split_once('=') {
            command.env(key, value);
        }
    }

    Err(SsmExecError::Exec(command.exec()))
}

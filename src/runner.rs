use std::process::Command;

use anyhow::{
    bail,
    Context,
};
use log::info;

use crate::types::Result;


/// Builds the command line: `vasp` alone for a single core, `command -n ncores vasp`
/// otherwise.
pub fn vasp_command(command: &str, ncores: usize, vasp: &str) -> Command {
    if ncores == 1 {
        Command::new(vasp)
    } else {
        let mut cmd = Command::new(command);
        cmd.arg("-n").arg(ncores.to_string()).arg(vasp);
        cmd
    }
}


/// Runs VASP in the working directory and blocks until it exits.
///
/// A nonzero exit status is an error, there is no retry.
pub fn run_vasp(command: &str, ncores: usize, vasp: &str) -> Result<()> {
    let mut cmd = vasp_command(command, ncores, vasp);
    info!("Running {:?}", &cmd);

    let status = cmd.status()
        .with_context(|| format!("Failed to launch {:?}.", &cmd))?;
    if !status.success() {
        bail!("VASP run {:?} failed with {}.", &cmd, status);
    }

    info!("VASP finished with {}", status);
    Ok(())
}

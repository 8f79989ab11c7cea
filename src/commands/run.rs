use clap::Args;

use crate::{
    Result,
    OptProcess,
    Settings,
    runner::run_vasp,
};


#[derive(Debug, Args)]
/// Run VASP in the current directory.
///
/// With one core the executable is started directly, otherwise through the launcher as
/// `<launcher> -n <ncores> <vasp>`. Unset options fall back to ~/.vaspgibbs.toml and
/// VASPGIBBS_* environment variables.
pub struct Run {
    #[arg(short, long)]
    /// Parallel launcher, e.g. mpirun or srun
    launcher: Option<String>,

    #[arg(short, long)]
    /// Number of cores
    ncores: Option<usize>,

    #[arg(short, long)]
    /// VASP executable
    vasp: Option<String>,
}


impl Run {
    pub fn resolve(&self, settings: &Settings) -> (String, usize, String) {
        (
            self.launcher.clone().unwrap_or_else(|| settings.launcher.clone()),
            self.ncores.unwrap_or(settings.ncores),
            self.vasp.clone().unwrap_or_else(|| settings.vasp.clone()),
        )
    }
}


impl OptProcess for Run {
    fn process(&self) -> Result<()> {
        let settings = Settings::from_default()?;
        let (launcher, ncores, vasp) = self.resolve(&settings);
        run_vasp(&launcher, ncores, &vasp)
    }
}

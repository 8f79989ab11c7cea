use std::path::PathBuf;
use clap::Args;
use log::{
    info,
    debug,
};

use crate::{
    Result,
    OptProcess,
    Poscar,
    Settings,
    selective::prepare_poscar,
    vasp_parsers::incar::backup_once,
};


#[derive(Debug, Args)]
/// Set selective dynamics flags in POSCAR.
///
/// All atoms are frozen except the ones listed with `--atoms` and the `--top` highest
/// atoms along c. Without `--atoms` and `--top` every atom is relaxed.
///
/// Hint: The original POSCAR is saved once as POSCAR.save, which `reposition` needs.
pub struct Select {
    #[arg(short, long, default_value = "./POSCAR")]
    /// Specify the POSCAR file to edit
    poscar: PathBuf,

    #[arg(short, long, num_args = 1..)]
    /// Atoms to relax, given as element symbols or indices starting from 0.
    ///
    /// E.g. "--atoms C O 12" relaxes all C and O atoms and the 13th atom.
    atoms: Vec<String>,

    #[arg(short, long, default_value_t = 0)]
    /// Number of topmost atoms to relax in addition to the listed ones
    top: usize,

    #[arg(long)]
    /// Tolerance added to fractional z before wrapping, overrides the settings
    tol: Option<f64>,

    #[arg(long)]
    /// Don't save POSCAR as POSCAR.save
    no_backup: bool,
}


impl OptProcess for Select {
    fn process(&self) -> Result<()> {
        let settings = Settings::from_default()?;
        let tol = self.tol.unwrap_or(settings.position_tolerance);
        debug!("    atoms = {:?}, top = {}, tol = {}", &self.atoms, self.top, tol);

        if !self.no_backup {
            backup_once(&self.poscar)?;
        }

        info!("Reading {:?}", &self.poscar);
        let poscar = Poscar::from_file(&self.poscar)?;
        prepare_poscar(&self.poscar, poscar, &self.atoms, self.top, tol)?;
        Ok(())
    }
}

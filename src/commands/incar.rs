use std::path::PathBuf;
use clap::Args;
use log::info;

use crate::{
    Result,
    OptProcess,
    vasp_parsers::incar::prepare_incar,
};


#[derive(Debug, Args)]
/// Prepare INCAR for a follow-up calculation.
///
/// Sets IBRION (appended if missing), removes NSW and restarts from the previous
/// wavefunction by setting existing ISTART to 1 and ICHARG to 0. Other tags are left
/// untouched. The original INCAR is saved once as INCAR.save.
pub struct Incar {
    #[arg(allow_negative_numbers = true)]
    /// IBRION to set, e.g. 5 for finite-difference vibrational modes
    ibrion: i32,

    #[arg(short, long, default_value = "./INCAR")]
    /// Specify the INCAR file to edit
    incar: PathBuf,
}


impl OptProcess for Incar {
    fn process(&self) -> Result<()> {
        info!("Editing {:?}", &self.incar);
        prepare_incar(&self.incar, self.ibrion)
    }
}

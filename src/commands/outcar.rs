use std::path::PathBuf;
use clap::Args;
use log::info;

use crate::{
    Result,
    OptProcess,
    vasp_parsers::outcar::read_outcar,
};


#[derive(Debug, Args)]
/// Summarize a finished calculation.
///
/// Prints whether the job finished, the IBRION used, the energy(sigma->0) and the
/// vibrational frequencies (THz) if the dynamical matrix was diagonalized.
pub struct Outcar {
    #[arg(default_value = "./OUTCAR")]
    /// Specify the input OUTCAR file
    outcar: PathBuf,

    #[arg(long)]
    /// Prints the summary as JSON
    json: bool,
}


impl OptProcess for Outcar {
    fn process(&self) -> Result<()> {
        info!("Parsing file {:?}", &self.outcar);
        let summary = read_outcar(&self.outcar)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", summary);
        }
        Ok(())
    }
}

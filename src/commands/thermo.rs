use std::path::PathBuf;
use anyhow::{
    Context,
    ensure,
};
use clap::Args;
use log::info;

use crate::{
    Result,
    OptProcess,
    vasp_parsers::outcar::read_outcar,
    thermo,
};


#[derive(Debug, Args)]
/// Vibrational free energy from a finished frequency calculation.
///
/// Zero point energy, vibrational internal energy and entropy are evaluated in the
/// harmonic approximation from the Gamma-point modes. Imaginary modes are skipped.
pub struct Thermo {
    #[arg(default_value = "./OUTCAR")]
    /// Specify the input OUTCAR file
    outcar: PathBuf,

    #[arg(short = 'T', long, default_value_t = 298.15)]
    /// Temperature in K
    temperature: f64,

    #[arg(long)]
    /// Prints the result as JSON
    json: bool,
}


impl OptProcess for Thermo {
    fn process(&self) -> Result<()> {
        info!("Parsing file {:?}", &self.outcar);
        let summary = read_outcar(&self.outcar)?;
        ensure!(summary.success, "Calculation in {:?} is not finished.", &self.outcar);

        let freqs = summary.modes.as_deref()
            .context("No vibrational modes found, was IBRION set to 5, 6, 7 or 8?")?;
        let thermo = thermo::Thermo::from_frequencies(freqs, self.temperature)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&thermo)?);
        } else {
            print!("{}", thermo);
            if let Some(energy) = summary.energy {
                println!("{:>12} {:14.6} eV", "E_dft", energy);
                println!("{:>12} {:14.6} eV", "G", thermo.total_gibbs(energy));
            }
        }
        Ok(())
    }
}

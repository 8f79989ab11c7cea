use std::path::Path;
use anyhow::{
    Context,
    ensure,
};
use clap::Args;
use log::{
    info,
    warn,
};

use crate::{
    Result,
    OptProcess,
    Poscar,
    Settings,
    Thermo,
    vasp_parsers::{
        incar::{
            backup_once,
            prepare_incar,
        },
        outcar::read_outcar,
    },
    selective::prepare_poscar,
    runner::run_vasp,
};


/// Finite differences with symmetry off
const IBRION_VIBRATION: i32 = 5;


#[derive(Debug, Args)]
/// Run a frequency calculation and report the Gibbs free energy.
///
/// Works in the current directory: saves POSCAR as POSCAR.save and INCAR as INCAR.save,
/// sets IBRION = 5, freezes all atoms but the selected ones, runs VASP and evaluates
/// the vibrational contributions from OUTCAR.
pub struct Gibbs {
    #[arg(short, long, num_args = 1..)]
    /// Atoms to vibrate, given as element symbols or indices starting from 0
    atoms: Vec<String>,

    #[arg(short, long, default_value_t = 0)]
    /// Number of topmost atoms to vibrate in addition to the listed ones
    top: usize,

    #[arg(short = 'T', long, default_value_t = 298.15)]
    /// Temperature in K
    temperature: f64,

    #[arg(short, long)]
    /// Number of cores, overrides the settings
    ncores: Option<usize>,

    #[arg(long)]
    /// Skip the VASP run and only analyze an existing OUTCAR
    skip_run: bool,
}


impl Gibbs {
    fn prepare_and_run(&self, settings: &Settings) -> Result<()> {
        let poscar_path = Path::new("POSCAR");

        backup_once(poscar_path)?;
        prepare_incar("INCAR", IBRION_VIBRATION)?;

        let poscar = Poscar::from_file(poscar_path)?;
        prepare_poscar(poscar_path, poscar, &self.atoms, self.top, settings.position_tolerance)?;

        let ncores = self.ncores.unwrap_or(settings.ncores);
        run_vasp(&settings.launcher, ncores, &settings.vasp)
    }
}


impl OptProcess for Gibbs {
    fn process(&self) -> Result<()> {
        let settings = Settings::from_default()?;

        if self.skip_run {
            info!("Skipping VASP run, analyzing the existing OUTCAR.");
        } else {
            self.prepare_and_run(&settings)?;
        }

        let summary = read_outcar("OUTCAR")?;
        ensure!(summary.success, "VASP did not finish, check OUTCAR.");
        if summary.ibrion != Some(IBRION_VIBRATION) {
            warn!("OUTCAR was produced with IBRION = {:?}, not {}.", summary.ibrion, IBRION_VIBRATION);
        }

        let freqs = summary.modes.as_deref()
            .context("No vibrational modes found in OUTCAR.")?;
        let energy = summary.energy
            .context("No energy found in OUTCAR.")?;
        let thermo = Thermo::from_frequencies(freqs, self.temperature)?;

        print!("{}", thermo);
        println!("{:>12} {:14.6} eV", "E_dft", energy);
        println!("{:>12} {:14.6} eV", "G", thermo.total_gibbs(energy));
        Ok(())
    }
}

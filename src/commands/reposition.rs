use std::path::PathBuf;
use clap::Args;

use crate::{
    Result,
    OptProcess,
    reposition::reposition,
};


#[derive(Debug, Args)]
/// Move the atoms of POSCAR back next to their positions in POSCAR.save.
///
/// VASP may wrap atoms to the other side of the cell. Each atom is moved to the
/// periodic image, among shifts of 0 or -1 along each lattice vector, closest to the
/// atom with the same index in the reference file.
pub struct Reposition {
    #[arg(long, default_value = "./POSCAR.save")]
    /// Reference POSCAR
    old: PathBuf,

    #[arg(long, default_value = "./POSCAR")]
    /// POSCAR to reposition, rewritten in place
    new: PathBuf,
}


impl OptProcess for Reposition {
    fn process(&self) -> Result<()> {
        reposition(&self.old, &self.new)?;
        Ok(())
    }
}

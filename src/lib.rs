pub mod vasp_parsers;
pub mod commands;
pub mod cli;
pub mod types;
pub mod settings;
pub mod selective;
pub mod runner;
pub mod reposition;
pub mod thermo;

pub use types::{
    Result,
    Atom,
};

pub use cli::OptProcess;

pub use vasp_parsers::poscar::Poscar;

pub use vasp_parsers::potcar::Potcar;

pub use vasp_parsers::incar::{
    prepare_incar,
    backup_once,
};

pub use vasp_parsers::outcar::{
    OutcarSummary,
    read_outcar,
};

pub use selective::prepare_poscar;

pub use runner::run_vasp;

pub use reposition::reposition;

pub use thermo::Thermo;

pub use settings::Settings;

use std::sync::OnceLock;
use clap::{
    Parser,
    builder::styling::{
        AnsiColor,
        Effects,
        Styles,
    },
};
use enum_dispatch::enum_dispatch;

use crate::{
    types::Result,
    commands::{
        incar::Incar,
        select::Select,
        run::Run,
        outcar::Outcar,
        reposition::Reposition,
        thermo::Thermo,
        gibbs::Gibbs,
        config::Config,
    },
};


pub fn get_style() -> Styles {
    static INSTANCE: OnceLock<Styles> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Styles::styled()
            .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
            .usage(AnsiColor::Green.on_default()   | Effects::BOLD)
            .literal(AnsiColor::Green.on_default() | Effects::BOLD)
            .placeholder(AnsiColor::BrightBlue.on_default())
            .error(AnsiColor::BrightRed.on_default())
            .valid(AnsiColor::BrightYellow.on_default())
    }).to_owned()
}


#[enum_dispatch]
pub trait OptProcess {
    fn process(&self) -> Result<()>;
}


#[enum_dispatch(OptProcess)]
#[derive(Debug, Parser)]
#[command(name = "vaspgibbs",
            about = r"Prepare, run and post-process VASP frequency calculations.
Edits INCAR/POSCAR in place, launches VASP and extracts energies, vibrational modes
and free energy corrections from OUTCAR.",
            version,
            author = "@Ionizing",
            styles = get_style()
            )]
enum Opt {
    Incar,

    Select,

    Run,

    Outcar,

    Reposition,

    Thermo,

    Gibbs,

    Config,
}


pub fn run() -> Result<()> {
    Opt::parse().process()
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Opt::command().debug_assert();
    }
}

use std::path::PathBuf;
use anyhow::Context;
use clap::Args;
use log::info;

use crate::{
    Result,
    OptProcess,
    Settings,
};


#[derive(Debug, Args)]
/// Show the effective settings or write a settings template.
///
/// Settings are read from ~/.vaspgibbs.toml, then overridden by VASPGIBBS_* environment
/// variables, e.g. VASPGIBBS_NCORES=16.
pub struct Config {
    #[arg(long)]
    /// Write the default settings to ~/.vaspgibbs.toml, or to `--output` if given
    gen_template: bool,

    #[arg(short, long)]
    /// Where to write the template
    output: Option<PathBuf>,
}


impl OptProcess for Config {
    fn process(&self) -> Result<()> {
        if self.gen_template {
            let path = match &self.output {
                Some(p) => p.clone(),
                None => Settings::config_path()
                    .context("Cannot determine the home directory, use `--output` instead.")?,
            };
            Settings::write_template(&path)?;
            info!("Settings template written to {:?}", &path);
        } else {
            print!("{}", Settings::from_default()?.to_toml()?);
        }
        Ok(())
    }
}

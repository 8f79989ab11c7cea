use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use anyhow::Context;
use directories::BaseDirs;
use figment::{
    Figment,
    providers::{
        Env,
        Format,
        Serialized,
        Toml,
    },
};
use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    selective::POSITION_TOLERANCE,
    types::Result,
};


pub const CONFIG_NAME: &str = ".vaspgibbs.toml";
pub const ENV_PREFIX: &str = "VASPGIBBS_";


/// Defaults for the command line, read from `~/.vaspgibbs.toml` and `VASPGIBBS_*`
/// environment variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Parallel launcher, invoked as `<launcher> -n <ncores> <vasp>`
    pub launcher: String,
    pub ncores: usize,
    /// VASP executable
    pub vasp: String,
    pub position_tolerance: f64,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            launcher: "mpirun".to_string(),
            ncores: 1,
            vasp: "vasp_std".to_string(),
            position_tolerance: POSITION_TOLERANCE,
        }
    }
}


impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(CONFIG_NAME))
    }

    pub fn from_default() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        let figment = match Self::config_path() {
            Some(path) => {
                debug!("Reading settings from {:?}", &path);
                figment.merge(Toml::file(path))
            },
            None => figment,
        };
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        Self::extract(Figment::from(Serialized::defaults(Settings::default()))
                      .merge(Toml::file(path.as_ref())))
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment.extract::<Self>()
            .context("Invalid vaspgibbs settings.")
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn write_template(path: &(impl AsRef<Path> + ?Sized)) -> Result<()> {
        let content = Settings::default().to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write file {:?}.", path.as_ref()))
    }
}

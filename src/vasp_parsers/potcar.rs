use std::{
    fs,
    path::Path,
    sync::OnceLock,
};

use anyhow::{
    Context,
    ensure,
};
use regex::Regex;

use crate::types::Result;


/// Element symbols listed in a POTCAR, in the order of its single-element blocks.
///
/// Each block carries a header line like `TITEL  = PAW_PBE Fe_pv 06Sep2000`, the
/// symbol is the word following the functional tag (valence annotations such as
/// `_pv` are kept).
#[derive(Clone, Debug, PartialEq)]
pub struct Potcar {
    pub symbols: Vec<String>,
}


impl Potcar {
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("Failed to open file {:?}.", path.as_ref()))?;
        Self::from_str(&txt)
            .with_context(|| format!("Parse POTCAR {:?} failed.", path.as_ref()))
    }

    pub fn from_str(txt: &str) -> Result<Self> {
        static TITEL: OnceLock<Regex> = OnceLock::new();
        let symbols = TITEL.get_or_init(|| Regex::new(r"TITEL\s*=\s*\w+\s*(\w+)").unwrap())
            .captures_iter(txt)
            .map(|c| c[1].to_string())
            .collect::<Vec<_>>();

        ensure!(!symbols.is_empty(), "No TITEL entry found.");
        Ok(Self { symbols })
    }
}

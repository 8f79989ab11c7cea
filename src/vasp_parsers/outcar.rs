use std::{
    fmt,
    fs,
    io,
    path::Path,
};

use anyhow::Context;
use colored::Colorize;
use num::complex::Complex64;
use regex::Regex;
use serde::Serialize;

use crate::types::Result;


const FINISH_BANNER: &str = "General timing and accounting informations for this job";
const DYNMAT_BANNER: &str = "Eigenvectors and eigenvalues of the dynamical matrix";
const SQRT_MASS_BANNER: &str = "Eigenvectors after division by SQRT(mass)";


/// What the post-processing needs from an OUTCAR.
///
/// Frequencies are in THz, imaginary modes are stored as `0 + ν·i`. Energy is the
/// `energy(sigma->0)` value in eV.
///
/// `frequencies` holds every `f =` line of the file, so modes printed again after the
/// mass-weighting appear twice. `modes` holds each mode once, taken from the
/// dynamical matrix block only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutcarSummary {
    pub success     : bool,
    pub ibrion      : Option<i32>,
    pub frequencies : Option<Vec<Complex64>>,
    pub modes       : Option<Vec<Complex64>>,
    pub energy      : Option<f64>,
}


impl OutcarSummary {
    pub fn unsuccessful() -> Self {
        Self {
            success: false,
            ibrion: None,
            frequencies: None,
            modes: None,
            energy: None,
        }
    }

    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let path = path.as_ref();
        let context = match fs::read_to_string(path) {
            Ok(txt) => txt,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::unsuccessful()),
            Err(e) => return Err(e).with_context(|| format!("Failed to open file {:?}.", path)),
        };

        Self::from_str(&context)
            .with_context(|| format!("Parse OUTCAR {:?} failed.", path))
    }

    pub fn from_str(context: &str) -> Result<Self> {
        if !context.contains(FINISH_BANNER) {
            return Ok(Self::unsuccessful());
        }

        Ok(Self {
            success: true,
            ibrion: Some(Self::parse_ibrion(context)?),
            frequencies: Self::parse_frequencies(context)?,
            modes: Self::parse_modes(context)?,
            energy: Some(Self::parse_energy(context)?),
        })
    }

    pub fn imaginary_modes(&self) -> usize {
        self.modes.as_ref()
            .map(|v| v.iter().filter(|f| f.im != 0.0).count())
            .unwrap_or(0)
    }

    // The last IBRION printed wins.
    fn parse_ibrion(context: &str) -> Result<i32> {
        let ibrion = Regex::new(r"IBRION\s*=\s*([-0-9]+)")
            .unwrap()
            .captures_iter(context)
            .last()
            .context("No IBRION found.")?
            .get(1)
            .unwrap()
            .as_str();
        ibrion.parse::<i32>()
            .with_context(|| format!("Invalid IBRION value {:?}", ibrion))
    }

    fn parse_frequencies(context: &str) -> Result<Option<Vec<Complex64>>> {
        if !context.contains(DYNMAT_BANNER) {
            return Ok(None);
        }

        Regex::new(r"[0-9]+\sf(/i)*\s*=\s*([0-9.]+)")
            .unwrap()
            .captures_iter(context)
            .map(|x| -> Result<Complex64> {
                let v = x.get(2).unwrap().as_str();
                let v = v.parse::<f64>()
                    .with_context(|| format!("Invalid frequency value {:?}", v))?;
                Ok(match x.get(1) {
                    None    => Complex64::new(v, 0.0),
                    Some(_) => Complex64::new(0.0, v),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    // Only the block before the mass-weighted eigenvectors, one entry per mode.
    fn parse_modes(context: &str) -> Result<Option<Vec<Complex64>>> {
        let head = context.split_once(SQRT_MASS_BANNER)
            .map_or(context, |(head, _)| head);
        Self::parse_frequencies(head)
    }

    // The first energy printed wins.
    fn parse_energy(context: &str) -> Result<f64> {
        let energy = Regex::new(r"energy  without.*sigma->0\)\s*=\s*([-0-9.]+)\s*")
            .unwrap()
            .captures(context)
            .context("No `energy  without entropy` line found.")?
            .get(1)
            .unwrap()
            .as_str();
        energy.parse::<f64>()
            .with_context(|| format!("Invalid energy value {:?}", energy))
    }
}


/// Reads the OUTCAR at `path`, a missing file yields an unsuccessful summary.
pub fn read_outcar(path: &(impl AsRef<Path> + ?Sized)) -> Result<OutcarSummary> {
    OutcarSummary::from_file(path)
}


impl fmt::Display for OutcarSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.success {
            return writeln!(f, "{}", "Calculation not finished (or OUTCAR missing).".bright_red());
        }

        writeln!(f, "{:>10} {}", "Status:", "finished".bright_green())?;
        if let Some(ibrion) = self.ibrion {
            writeln!(f, "{:>10} {}", "IBRION:", ibrion)?;
        }
        if let Some(energy) = self.energy {
            writeln!(f, "{:>10} {:.8} eV", "Energy:", energy)?;
        }

        if let Some(freqs) = &self.modes {
            writeln!(f, "{:>10} {} modes, {} imaginary", "Modes:", freqs.len(), self.imaginary_modes())?;
            for (i, freq) in freqs.iter().enumerate() {
                let line = if freq.im != 0.0 {
                    format!("{:6} {:>12.6} THz  f/i", i + 1, freq.im).bright_yellow().to_string()
                } else {
                    format!("{:6} {:>12.6} THz", i + 1, freq.re)
                };
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ibrion() {
        let input = r#"
   IBRION =      2    ionic relax: 0-MD 1-quasi-New 2-CG
   NFREE  =      2    steps in history (QN), initial steepest desc. (CG)
 ......
   IBRION =      5    ionic relax: 0-MD 1-quasi-New 2-CG
"#;
        assert_eq!(OutcarSummary::parse_ibrion(input).unwrap(), 5);
        assert!(OutcarSummary::parse_ibrion("NSW = 0").is_err());
    }

    #[test]
    fn test_parse_energy() {
        let input = r#"
  energy  without entropy=      -19.27710387  energy(sigma->0) =      -19.26937333
  energy  without entropy=      -19.26679174  energy(sigma->0) =      -19.25906120
"#;
        assert_eq!(OutcarSummary::parse_energy(input).unwrap(), -19.26937333);
        assert!(OutcarSummary::parse_energy("free  energy   TOTEN  = -19.26 eV").is_err());
    }

    #[test]
    fn test_parse_frequencies() {
        let input = r#"
 Eigenvectors and eigenvalues of the dynamical matrix
 ----------------------------------------------------


   1 f  =  100.187946 THz   629.489771 2PiTHz 3341.889155 cm-1   414.342054 meV
             X         Y         Z           dx          dy          dz
      3.113300  3.964300  4.000000     0.256766    0.000000    0.000000

   2 f/i=    5.218422 THz    32.788383 2PiTHz  174.068497 cm-1    21.581576 meV
             X         Y         Z           dx          dy          dz
      3.113300  3.964300  4.000000     0.000000    0.000000    0.671269
"#;
        let output = vec![Complex64::new(100.187946, 0.0),
                          Complex64::new(0.0, 5.218422)];
        assert_eq!(OutcarSummary::parse_frequencies(input).unwrap(), Some(output));
        assert_eq!(OutcarSummary::parse_frequencies("   1 f  =  100.187946 THz").unwrap(), None);
    }

    #[test]
    fn test_parse_modes() {
        let input = r#"
 Eigenvectors and eigenvalues of the dynamical matrix
 ----------------------------------------------------

   1 f  =   64.185137 THz   403.290035 2PiTHz 2141.021813 cm-1   265.451524 meV
   2 f/i=    0.903412 THz     5.676319 2PiTHz   30.134690 cm-1     3.736212 meV

 Eigenvectors after division by SQRT(mass)
 -----------------------------------------

   1 f  =   64.185137 THz   403.290035 2PiTHz 2141.021813 cm-1   265.451524 meV
   2 f/i=    0.903412 THz     5.676319 2PiTHz   30.134690 cm-1     3.736212 meV
"#;
        let output = vec![Complex64::new(64.185137, 0.0),
                          Complex64::new(0.0, 0.903412)];
        assert_eq!(OutcarSummary::parse_modes(input).unwrap(), Some(output));
        assert_eq!(OutcarSummary::parse_frequencies(input).unwrap().unwrap().len(), 4);
        assert_eq!(OutcarSummary::parse_modes("NSW = 0").unwrap(), None);
    }

    #[test]
    fn test_malformed_frequency() {
        let input = r#"
   IBRION =      5    ionic relax: 0-MD 1-quasi-New 2-CG
  energy  without entropy=      -14.80000000  energy(sigma->0) =      -14.80325012
 Eigenvectors and eigenvalues of the dynamical matrix
   1 f  = . THz
   2 f  = 1.2.3 THz
 General timing and accounting informations for this job:
"#;
        assert!(OutcarSummary::parse_frequencies("Eigenvectors and eigenvalues of the dynamical matrix\n 1 f  = 1.2.3 THz").is_err());
        assert!(OutcarSummary::from_str(input).is_err());
    }

    #[test]
    fn test_unfinished() {
        let input = "   IBRION =      2\n  energy  without entropy=  -1.0  energy(sigma->0) =  -1.0\n";
        assert_eq!(OutcarSummary::from_str(input).unwrap(), OutcarSummary::unsuccessful());
        assert_eq!(OutcarSummary::from_str("").unwrap(), OutcarSummary::unsuccessful());
    }

    #[test]
    fn test_finished() {
        let input = r#"
   IBRION =      2    ionic relax: 0-MD 1-quasi-New 2-CG
  energy  without entropy=     -123.400000  energy(sigma->0) =     -123.456
 General timing and accounting informations for this job:
"#;
        let summary = OutcarSummary::from_str(input).unwrap();
        assert!(summary.success);
        assert_eq!(summary.ibrion, Some(2));
        assert_eq!(summary.frequencies, None);
        assert_eq!(summary.modes, None);
        assert_eq!(summary.energy, Some(-123.456));
        assert_eq!(summary.imaginary_modes(), 0);
    }
}

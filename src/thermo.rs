//! Harmonic vibrational thermochemistry from the Gamma-point modes in OUTCAR.

use std::fmt;

use anyhow::ensure;
use colored::Colorize;
use log::warn;
use num::complex::Complex64;
use serde::Serialize;

use crate::types::{
    Result,
    Vector,
};


/// Planck constant in eV/THz
pub const PLANCK: f64 = 4.135667696E-3;

/// Boltzmann constant in eV/K
pub const BOLTZMANN: f64 = 8.617333262E-5;


/// Vibrational contributions at a given temperature, energies in eV, entropy in eV/K.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Thermo {
    pub temperature     : f64,
    pub nmodes          : usize,
    pub nimaginary      : usize,
    pub zpe             : f64,
    pub internal_energy : f64,
    pub entropy         : f64,
    pub gibbs           : f64,
}


impl Thermo {
    /// Imaginary and zero modes carry no thermal contribution and are skipped.
    pub fn from_frequencies(freqs: &[Complex64], temperature: f64) -> Result<Self> {
        ensure!(temperature >= 0.0, "Temperature must not be negative, got {} K.", temperature);

        let nimaginary = freqs.iter().filter(|f| f.im != 0.0).count();
        if nimaginary > 0 {
            warn!("{} imaginary modes are excluded from the vibrational contribution.", nimaginary);
        }

        let energies: Vector<f64> = freqs.iter()
            .filter(|f| f.im == 0.0 && f.re > 0.0)
            .map(|f| f.re * PLANCK)
            .collect();

        let zpe = 0.5 * energies.sum();

        let (internal_energy, entropy) = if temperature == 0.0 || energies.is_empty() {
            (0.0, 0.0)
        } else {
            let x = &energies / (BOLTZMANN * temperature);
            let bose = x.mapv(f64::exp_m1);
            let u = (&energies / &bose).sum();
            let s = BOLTZMANN * (&x / &bose - x.mapv(|v| (-(-v).exp()).ln_1p())).sum();
            (u, s)
        };

        Ok(Self {
            temperature,
            nmodes: energies.len(),
            nimaginary,
            zpe,
            internal_energy,
            entropy,
            gibbs: zpe + internal_energy - temperature * entropy,
        })
    }

    /// Total free energy `E_dft + G_vib`.
    pub fn total_gibbs(&self, e_dft: f64) -> f64 {
        e_dft + self.gibbs
    }
}


impl fmt::Display for Thermo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", format!("Vibrational contributions at {:.2} K ({} modes, {} imaginary skipped)",
                                  self.temperature, self.nmodes, self.nimaginary).bright_yellow())?;
        writeln!(f, "{:>12} {:14.6} eV", "ZPE", self.zpe)?;
        writeln!(f, "{:>12} {:14.6} eV", "U_vib", self.internal_energy)?;
        writeln!(f, "{:>12} {:14.6} eV", "T*S_vib", self.temperature * self.entropy)?;
        writeln!(f, "{:>12} {:14.6} eV", "G_vib", self.gibbs)
    }
}

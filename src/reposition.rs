use std::path::Path;

use anyhow::ensure;
use log::{
    debug,
    info,
};

use crate::{
    types::{
        Result,
        frac_to_cart,
        norm,
    },
    vasp_parsers::poscar::Poscar,
};


const SHIFTS: [f64; 2] = [0.0, -1.0];


/// Moves every atom of `new` to the periodic image closest to the atom with the same
/// index in `old`.
///
/// Only the images shifted by 0 or -1 along each lattice vector are tried, the first
/// minimum in (a, b, c) order wins. Atoms without flags become fully relaxed.
pub fn reposition_atoms(old: &Poscar, new: &mut Poscar) -> Result<()> {
    ensure!(old.atoms.len() >= new.atoms.len(),
            "Reference structure holds {} atoms, but {} atoms to reposition.",
            old.atoms.len(), new.atoms.len());

    for (i, atom) in new.atoms.iter_mut().enumerate() {
        let target = frac_to_cart(&old.atoms[i].frac_pos, &old.cell);

        let mut distmin: Option<f64> = None;
        let mut shift = [0.0f64; 3];
        for &j in SHIFTS.iter() {
            for &k in SHIFTS.iter() {
                for &l in SHIFTS.iter() {
                    let p = atom.frac_pos;
                    let cart = frac_to_cart(&[p[0] + j, p[1] + k, p[2] + l], &new.cell);
                    let dist = norm(&[cart[0] - target[0], cart[1] - target[1], cart[2] - target[2]]);
                    if distmin.map_or(true, |d| dist < d) {
                        distmin = Some(dist);
                        shift = [j, k, l];
                    }
                }
            }
        }

        if shift != [0.0; 3] {
            debug!("Atom #{} ({}) shifted by {:?}", i, atom.element, shift);
        }
        for (p, s) in atom.frac_pos.iter_mut().zip(shift.iter()) {
            *p += s;
        }
        if atom.flags.is_none() {
            atom.flags = Some([true; 3]);
        }
    }

    Ok(())
}


/// Reads `old` and `new`, repositions the atoms of `new` and writes it back.
pub fn reposition(old: &(impl AsRef<Path> + ?Sized), new: &(impl AsRef<Path> + ?Sized)) -> Result<Poscar> {
    info!("Repositioning atoms of {:?} against {:?}", new.as_ref(), old.as_ref());
    let reference = Poscar::from_file(old)?;
    let mut poscar = Poscar::from_file(new)?;

    reposition_atoms(&reference, &mut poscar)?;
    poscar.to_file(new)?;
    Ok(poscar)
}

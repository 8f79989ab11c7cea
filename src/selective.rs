//! Selective dynamics setup: freeze the substrate, relax the listed atoms and the
//! topmost layer.

use std::path::Path;

use log::{
    info,
    warn,
};

use crate::{
    types::Result,
    vasp_parsers::poscar::Poscar,
};


/// Tolerance added to fractional z before wrapping it into [0, 1).
pub const POSITION_TOLERANCE: f64 = 1E-5;

const RELAX: [bool; 3] = [true; 3];
const FREEZE: [bool; 3] = [false; 3];


/// Sets the selective dynamics flags of every atom in place.
///
/// Atoms listed in `list_atoms`, by element symbol or by 0-based index, are relaxed and
/// all the others frozen. Then the `top` atoms with the highest `(z + tol) mod 1` are
/// relaxed as well. An empty list with `top == 0` relaxes every atom.
pub fn select_atoms(poscar: &mut Poscar, list_atoms: &[String], top: usize, tol: f64) {
    let natoms = poscar.atoms.len();

    for (i, atom) in poscar.atoms.iter_mut().enumerate() {
        let listed = list_atoms.iter()
            .any(|x| x == &atom.element || *x == i.to_string());
        atom.flags = Some(if listed { RELAX } else { FREEZE });
    }

    let mut top = top;
    if list_atoms.is_empty() && top == 0 {
        top = natoms;
    }
    if top > natoms {
        warn!("Only {} atoms available, cannot relax the top {} of them.", natoms, top);
        top = natoms;
    }

    // stable sort, equal heights keep the order of the atom list
    let mut idx = (0 .. natoms).collect::<Vec<usize>>();
    let z = poscar.atoms.iter()
        .map(|a| (a.frac_pos[2] + tol).rem_euclid(1.0))
        .collect::<Vec<f64>>();
    idx.sort_by(|&a, &b| z[a].total_cmp(&z[b]));

    for &i in idx.iter().rev().take(top) {
        poscar.atoms[i].flags = Some(RELAX);
    }
}


/// Selects atoms on `poscar`, writes the result to `path` and returns it.
pub fn prepare_poscar(path: &(impl AsRef<Path> + ?Sized), mut poscar: Poscar,
                      list_atoms: &[String], top: usize, tol: f64) -> Result<Poscar> {
    select_atoms(&mut poscar, list_atoms, top, tol);

    let nrelax = poscar.atoms.iter()
        .filter(|a| a.flags == Some(RELAX))
        .count();
    info!("{} of {} atoms are relaxed, writing {:?}", nrelax, poscar.atoms.len(), path.as_ref());

    poscar.to_file(path)?;
    Ok(poscar)
}

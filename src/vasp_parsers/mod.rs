pub mod incar;
pub mod outcar;
pub mod poscar;
pub mod potcar;

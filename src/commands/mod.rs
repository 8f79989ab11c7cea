pub mod incar;
pub mod select;
pub mod run;
pub mod outcar;
pub mod reposition;
pub mod thermo;
pub mod gibbs;
pub mod config;

use std::path::PathBuf;
use std::fs;

use approx::assert_abs_diff_eq;
use tempdir::TempDir;
use vaspgibbs::{
    Result,
    Poscar,
    backup_once,
    prepare_poscar,
    reposition,
};


macro_rules! get_fpath_in_current_dir {
    ($fname:expr) => {{
        let mut path = PathBuf::from(file!());
        path.pop();
        path.push($fname);
        path
    }}
}


fn relaxed(pos: &Poscar) -> Vec<bool> {
    pos.atoms.iter().map(|a| a.flags == Some([true; 3])).collect()
}


#[test]
fn test_select_top_and_listed() -> Result<()> {
    let tmpdir = TempDir::new("vaspgibbs_test")?;
    let fname = tmpdir.path().join("POSCAR");
    fs::copy(get_fpath_in_current_dir!("POSCAR.CO_Cu"), &fname)?;

    let pos = Poscar::from_file(&fname)?;
    let ret = prepare_poscar(&fname, pos, &["C".to_string()], 1, 1E-5)?;
    assert_eq!(relaxed(&ret), vec![false, false, false, false, true, true]);

    let back = Poscar::from_file(&fname)?;
    assert_eq!(back.atoms, ret.atoms);
    Ok(())
}


#[test]
fn test_select_everything_by_default() -> Result<()> {
    let tmpdir = TempDir::new("vaspgibbs_test")?;
    let fname = tmpdir.path().join("POSCAR");
    fs::copy(get_fpath_in_current_dir!("POSCAR.CO_Cu"), &fname)?;

    let pos = Poscar::from_file(&fname)?;
    let ret = prepare_poscar(&fname, pos, &[], 0, 1E-5)?;
    assert!(relaxed(&ret).into_iter().all(|x| x));
    Ok(())
}


#[test]
fn test_reposition_identical() -> Result<()> {
    let tmpdir = TempDir::new("vaspgibbs_test")?;
    let fname = tmpdir.path().join("POSCAR");
    fs::copy(get_fpath_in_current_dir!("POSCAR.CO_Cu"), &fname)?;
    assert!(backup_once(&fname)?);
    assert!(!backup_once(&fname)?);

    let before = Poscar::from_file(&fname)?;
    let after = reposition(&tmpdir.path().join("POSCAR.save"), &fname)?;
    assert_eq!(after.atoms, before.atoms);
    assert_eq!(Poscar::from_file(&fname)?.atoms, before.atoms);
    Ok(())
}


#[test]
fn test_reposition_wrapped_atoms() -> Result<()> {
    let tmpdir = TempDir::new("vaspgibbs_test")?;
    let old = tmpdir.path().join("POSCAR.save");
    let new = tmpdir.path().join("POSCAR");

    fs::write(&old, "\
reference
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
H
2
Direct
0.02 0.5 0.01
0.5 0.5 0.5
")?;

    // first atom wrapped to the other side of the cell along a and c
    fs::write(&new, "\
moved
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
H
2
Selective dynamics
Direct
0.99 0.5 0.995 T T T
0.5 0.5 0.5 F F T
")?;

    let ret = reposition(&old, &new)?;
    let p = ret.atoms[0].frac_pos;
    assert_abs_diff_eq!(p[0], -0.01, epsilon = 1E-12);
    assert_eq!(p[1], 0.5);
    assert_abs_diff_eq!(p[2], -0.005, epsilon = 1E-12);
    assert_eq!(ret.atoms[1].frac_pos, [0.5, 0.5, 0.5]);
    assert_eq!(ret.atoms[1].flags, Some([false, false, true]));

    assert_eq!(Poscar::from_file(&new)?.atoms, ret.atoms);
    Ok(())
}


#[test]
fn test_reposition_sets_missing_flags() -> Result<()> {
    let tmpdir = TempDir::new("vaspgibbs_test")?;
    let old = tmpdir.path().join("POSCAR.save");
    let new = tmpdir.path().join("POSCAR");
    fs::copy(get_fpath_in_current_dir!("POSCAR.no_symbols"), &old)?;
    fs::copy(get_fpath_in_current_dir!("POSCAR.no_symbols"), &new)?;
    fs::copy(get_fpath_in_current_dir!("POTCAR"), tmpdir.path().join("POTCAR"))?;

    let before = Poscar::from_file(&new)?;
    let ret = reposition(&old, &new)?;
    assert!(relaxed(&ret).into_iter().all(|x| x));
    for (a, b) in ret.atoms.iter().zip(before.atoms.iter()) {
        assert_eq!(a.frac_pos, b.frac_pos);
        assert_eq!(a.element, b.element);
    }
    Ok(())
}

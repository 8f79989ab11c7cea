use std::{
    ffi::OsString,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::OnceLock,
};

use anyhow::Context;
use log::{
    debug,
    info,
};
use regex::Regex;

use crate::types::Result;


struct IncarPatterns {
    ibrion: Regex,
    nsw:    Regex,
    istart: Regex,
    icharg: Regex,
}


fn patterns() -> &'static IncarPatterns {
    static INSTANCE: OnceLock<IncarPatterns> = OnceLock::new();
    INSTANCE.get_or_init(|| IncarPatterns {
        ibrion: Regex::new(r"(IBRION\s*=\s*)[-0-9]+").unwrap(),
        nsw:    Regex::new(r"NSW\s*=\s*[-0-9]+").unwrap(),
        istart: Regex::new(r"(ISTART\s*=\s*)[-0-9]+").unwrap(),
        icharg: Regex::new(r"(ICHARG\s*=\s*)[-0-9]+").unwrap(),
    })
}


/// `INCAR` -> `INCAR.save`, `POSCAR` -> `POSCAR.save`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".save");
    PathBuf::from(s)
}


/// Copies `path` to `<path>.save` unless the backup already exists.
///
/// Returns true if a new backup was made.
pub fn backup_once(path: &Path) -> Result<bool> {
    let save = backup_path(path);
    if save.is_file() {
        debug!("Backup {:?} exists already, keep it untouched.", &save);
        return Ok(false);
    }

    fs::copy(path, &save)
        .with_context(|| format!("Failed to backup {:?} to {:?}.", path, &save))?;
    info!("Saved {:?} as {:?}", path, &save);
    Ok(true)
}


/// Rewrites the INCAR content for a calculation with the given IBRION.
///
/// IBRION is replaced or appended, NSW assignments are dropped, existing ISTART and
/// ICHARG are set to restart from the previous wavefunction (1 and 0). Other tags are
/// kept verbatim.
///
/// An appended IBRION reuses the trailing newline of the file, no blank line is put in
/// front of it, so editing twice gives the same content.
pub fn edit_incar(content: &str, ibrion: i32) -> String {
    let pat = patterns();

    let mut ret = if pat.ibrion.is_match(content) {
        pat.ibrion.replace_all(content, format!("${{1}}{}", ibrion)).into_owned()
    } else {
        let mut s = content.to_string();
        if !s.is_empty() && !s.ends_with('\n') {
            s.push('\n');
        }
        s.push_str(&format!("IBRION = {}\n", ibrion));
        s
    };

    ret = pat.nsw.replace_all(&ret, "").into_owned();
    ret = pat.istart.replace_all(&ret, "${1}1").into_owned();
    ret = pat.icharg.replace_all(&ret, "${1}0").into_owned();
    ret
}


/// Edits the INCAR at `path` in place, backing it up to `<path>.save` first.
pub fn prepare_incar(path: &(impl AsRef<Path> + ?Sized), ibrion: i32) -> Result<()> {
    let path = path.as_ref();
    let old = fs::read_to_string(path)
        .with_context(|| format!("Failed to open file {:?}.", path))?;
    backup_once(path)?;

    fs::write(path, edit_incar(&old, ibrion))
        .with_context(|| format!("Failed to write file {:?}.", path))?;
    info!("Set IBRION = {} in {:?}", ibrion, path);
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_ibrion() {
        let input = "\
SYSTEM = CO on Cu
ISTART = 0
ICHARG = 2
IBRION = 2
NSW = 200
EDIFF = 1E-6
";
        let expected = "\
SYSTEM = CO on Cu
ISTART = 1
ICHARG = 0
IBRION = 5

EDIFF = 1E-6
";
        assert_eq!(edit_incar(input, 5), expected);
    }

    #[test]
    fn test_append_ibrion() {
        assert_eq!(edit_incar("ENCUT = 400", 5), "ENCUT = 400\nIBRION = 5\n");
        assert_eq!(edit_incar("ENCUT = 400\n", -1), "ENCUT = 400\nIBRION = -1\n");
        assert_eq!(edit_incar("", 5), "IBRION = 5\n");
        assert!(!edit_incar("ENCUT = 400\n\n", 5).contains("\n\n\n"));
    }

    #[test]
    fn test_keys_untouched_when_absent() {
        let output = edit_incar("PREC = Accurate\nIBRION=1  ! comment\n", 7);
        assert_eq!(output, "PREC = Accurate\nIBRION=7  ! comment\n");
    }

    #[test]
    fn test_idempotent() {
        let input = "ISTART = 0\nNSW = 10\nPREC = Normal\n";
        let once = edit_incar(input, 5);
        assert_eq!(edit_incar(&once, 5), once);
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(backup_path(Path::new("INCAR")), PathBuf::from("INCAR.save"));
        assert_eq!(backup_path(Path::new("run/POSCAR")), PathBuf::from("run/POSCAR.save"));
    }
}

use std::{
    fmt::Write,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::OnceLock,
};

use anyhow::{
    bail,
    ensure,
    Context,
};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use regex::Regex;

use crate::{
    types::{
        Atom,
        Mat33,
        Result,
        cart_to_frac,
    },
    vasp_parsers::potcar::Potcar,
};


const HEADER: &str = "This poscar was generated by VaspGibbs";


fn re_integers() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"^\s*(?:[0-9]+\s*)+$").unwrap())
}


fn re_atom_line() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"^\s*(?:[-0-9.]+(?:e[-+]?[0-9]{1,3})?\s*){3}").unwrap())
}


/// Crystal structure read from or written to a POSCAR.
///
/// `cell` holds the scaled lattice vectors row by row, `atoms` keeps the order of
/// the atom block. Positions are always fractional.
#[derive(Clone, Debug, PartialEq)]
pub struct Poscar {
    pub cell: Mat33<f64>,
    pub atoms: Vec<Atom>,
}


impl Poscar {
    /// Reads a POSCAR. If the species line holds counts only, the element symbols are
    /// taken from the POTCAR sitting in the same directory.
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("Failed to open file {:?}.", path))?;
        Self::from_str_with_potcar(&txt, &sibling_potcar(path))
            .with_context(|| format!("Parse POSCAR {:?} failed.", path))
    }

    /// Parses POSCAR content, element symbols may be looked up in `./POTCAR`.
    pub fn from_str(txt: &str) -> Result<Self> {
        Self::from_str_with_potcar(txt, Path::new("POTCAR"))
    }

    pub fn from_str_with_potcar(txt: &str, potcar: &Path) -> Result<Self> {
        let lines = txt.lines().collect::<Vec<_>>();
        let line = |i: usize| nth_line(&lines, i);

        let scale = line(1)?.trim().parse::<f64>()
            .with_context(|| format!("Invalid scale factor: {:?}", lines[1]))?;

        let mut cell = [[0.0f64; 3]; 3];
        for (i, row) in cell.iter_mut().enumerate() {
            let v = parse_floats(line(i + 2)?)
                .with_context(|| format!("Invalid lattice vector at line {}.", i + 3))?;
            ensure!(v.len() >= 3, "Lattice vector at line {} needs three components.", i + 3);
            *row = [v[0] * scale, v[1] * scale, v[2] * scale];
        }

        let (elements, counts_line, mut last) = if re_integers().is_match(line(5)?) {
            debug!("No element symbols in POSCAR, reading them from {:?}", potcar);
            let potcar = Potcar::from_file(potcar)?;
            (potcar.symbols, line(5)?, 5usize)
        } else {
            let elements = line(5)?.split_whitespace().map(str::to_string).collect::<Vec<_>>();
            (elements, line(6)?, 6usize)
        };

        let nelem = counts_line.split_whitespace()
            .map(|x| x.parse::<usize>()
                 .with_context(|| format!("Invalid atom count: {:?}", x)))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .scan(0usize, |acc, n| { *acc += n; Some(*acc) })
            .collect::<Vec<_>>();

        let selective = first_char_in(line(last + 1)?, &['s']);
        if selective {
            last += 1;
        }
        let cartesian = first_char_in(line(last + 1)?, &['c', 'k']);

        let mut atoms = vec![];
        for (i, l) in lines.iter().skip(last + 2).enumerate() {
            if !re_atom_line().is_match(l) {
                break;
            }
            let content = l.split_whitespace().collect::<Vec<_>>();
            ensure!(content.len() >= 3, "Atom #{} needs three coordinates: {:?}", i, l);

            let mut pos = [0.0f64; 3];
            for (p, x) in pos.iter_mut().zip(content.iter()) {
                *p = x.parse::<f64>()
                    .with_context(|| format!("Invalid coordinate {:?} of atom #{}", x, i))?;
            }

            if cartesian {
                pos = cart_to_frac(&pos.map(|x| x * scale), &cell)?;
            }

            let element = nelem.iter()
                .position(|&n| i < n)
                .and_then(|ityp| elements.get(ityp))
                .with_context(|| format!("Atom #{} is not covered by the element list {:?} with counts {:?}",
                                         i, elements, nelem))?
                .clone();

            let flags = if selective {
                Some(parse_flags(&content[3..])
                     .with_context(|| format!("Invalid selective dynamics flags of atom #{}: {:?}", i, l))?)
            } else {
                None
            };

            atoms.push(Atom { element, frac_pos: pos, flags });
        }

        Ok(Self { cell, atoms })
    }

    /// Renders the structure in Direct coordinates with selective dynamics.
    ///
    /// Every atom must carry flags, an atom read from a POSCAR without selective
    /// dynamics makes this fail.
    pub fn render(&self) -> Result<String> {
        let mut s = format!("{}\n1.0\n", HEADER);

        for v in self.cell.iter() {
            writeln!(s, "{:.6} {:.6} {:.6}", v[0], v[1], v[2])?;
        }

        let mut elements: IndexMap<&str, usize> = IndexMap::new();
        for atom in self.atoms.iter() {
            *elements.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        writeln!(s, "{}", elements.keys().join(" "))?;
        writeln!(s, "{}", elements.values().join(" "))?;
        s.push_str("Selective dynamics\nDirect\n");

        for (i, atom) in self.atoms.iter().enumerate() {
            let flags = atom.flags
                .with_context(|| format!("Atom #{} ({}) has no selective dynamics flags.", i, atom.element))?;
            let p = atom.frac_pos;
            writeln!(s, "{:>20} {:>20} {:>20} {}", p[0], p[1], p[2],
                     flags.iter().map(|&f| if f { "T" } else { "F" }).join(" "))?;
        }

        Ok(s)
    }

    pub fn to_file(&self, path: &(impl AsRef<Path> + ?Sized)) -> Result<()> {
        let content = self.render()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write file {:?}.", path.as_ref()))
    }
}


fn sibling_potcar(poscar: &Path) -> PathBuf {
    match poscar.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join("POTCAR"),
        _ => PathBuf::from("POTCAR"),
    }
}


fn nth_line<'a>(lines: &[&'a str], i: usize) -> Result<&'a str> {
    lines.get(i).copied()
        .with_context(|| format!("POSCAR truncated, line {} is missing.", i + 1))
}


fn parse_floats(line: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|x| x.parse::<f64>().with_context(|| format!("Cannot parse {} as f64.", x)))
        .collect()
}


fn first_char_in(line: &str, candidates: &[char]) -> bool {
    line.trim()
        .chars()
        .next()
        .map(|c| candidates.contains(&c.to_ascii_lowercase()))
        .unwrap_or(false)
}


fn parse_flags(tokens: &[&str]) -> Result<[bool; 3]> {
    ensure!(tokens.len() >= 3, "Three flags are needed, found {}.", tokens.len());
    let mut ret = [false; 3];
    for (r, t) in ret.iter_mut().zip(tokens.iter()) {
        *r = match t.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('T') => true,
            Some('F') => false,
            _ => bail!("Invalid flag {:?}, expect `T` or `F`.", t),
        };
    }
    Ok(ret)
}

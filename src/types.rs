use anyhow::ensure;
use ndarray::Array1;

pub type Result<T> = anyhow::Result<T>;

pub type Vector<T> = Array1<T>;  // Define this type to use broadcast operations.
pub type Mat33<T> = [[T;3];3];   // 3x3 matrix, one lattice vector per row


/// Single atom as listed in the POSCAR atom block.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub element  : String,
    pub frac_pos : [f64; 3],
    pub flags    : Option<[bool; 3]>,  // None when selective dynamics is absent
}


impl Atom {
    pub fn new(element: impl Into<String>, frac_pos: [f64; 3], flags: Option<[bool; 3]>) -> Self {
        Self { element: element.into(), frac_pos, flags }
    }
}


/// Fractional coordinates to Cartesian coordinates, `frac · cell`.
pub fn frac_to_cart(frac: &[f64; 3], cell: &Mat33<f64>) -> [f64; 3] {
    let mut ret = [0.0; 3];
    for (j, r) in ret.iter_mut().enumerate() {
        *r = frac[0] * cell[0][j] + frac[1] * cell[1][j] + frac[2] * cell[2][j];
    }
    ret
}


pub fn det33(m: &Mat33<f64>) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
        m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
        m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}


pub fn inv33(m: &Mat33<f64>) -> Result<Mat33<f64>> {
    let det = det33(m);
    ensure!(det.abs() > 1E-10, "Singular lattice matrix, determinant = {}", det);

    Ok([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
        ],
    ])
}


/// Cartesian coordinates to fractional coordinates, `cart · cell⁻¹`.
pub fn cart_to_frac(cart: &[f64; 3], cell: &Mat33<f64>) -> Result<[f64; 3]> {
    let inv = inv33(cell)?;
    Ok(frac_to_cart(cart, &inv))
}


pub fn norm(v: &[f64; 3]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

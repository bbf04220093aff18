//! For one displacement **l**, forms the field-difference sub-array,
//! projects a vector field into longitudinal/transverse components, and
//! reduces to per-order scalar averages.
//!
//! ## Resolved open question: transverse exponentiation at `|Δ_⊥| = 0`
//!
//! `reduce_powers` uses `f64::powi` for every order `p`, including negative
//! `p`. At `|Δ_⊥| = 0` this yields `0.0` for positive `p` and `+inf` for
//! negative `p`, following literal IEEE-754 semantics rather than filtering
//! the pair out of the average. Callers requesting transverse output with
//! negative orders should expect `inf`/`NaN` to propagate into the
//! corresponding tensor slot.

use crate::field::{ScalarField2D, ScalarField3D, VectorField2D, VectorField3D};
use crate::grid::Displacement;
use ndarray::{Array2, Array3};

/// Per-displacement kernel output before order-reduction: the longitudinal
/// difference array and, when requested, the transverse-magnitude array.
pub struct Projection3D {
    pub par: Array3<f64>,
    pub perp: Option<Array3<f64>>,
}

pub struct Projection2D {
    pub par: Array2<f64>,
    pub perp: Option<Array2<f64>>,
}

/// Number of in-grid pairs `n = prod_a (N_a - l_a)` for a sub-array shape.
pub fn pair_count(shape: &[usize]) -> f64 {
    shape.iter().product::<usize>() as f64
}

/// Averages `sum(v^p) / n` for each order `p` in `[q1, q2]`.
pub fn reduce_powers<D>(arr: &ndarray::Array<f64, D>, q1: i32, q2: i32) -> Vec<f64>
where
    D: ndarray::Dimension,
{
    let n = pair_count(arr.shape());
    (q1..=q2)
        .map(|p| arr.iter().map(|&v| v.powi(p)).sum::<f64>() / n)
        .collect()
}

fn diff_3d(field: &Array3<f64>, disp: Displacement) -> Array3<f64> {
    let (nx, ny, nz) = field.dim();
    let (x, y, z) = (disp.x, disp.y, disp.z);
    let base = field.slice(ndarray::s![0..nx - x, 0..ny - y, 0..nz - z]);
    let shifted = field.slice(ndarray::s![x..nx, y..ny, z..nz]);
    &shifted - &base
}

fn diff_2d(field: &Array2<f64>, disp_x: usize, disp_z: usize) -> Array2<f64> {
    let (nx, nz) = field.dim();
    let base = field.slice(ndarray::s![0..nx - disp_x, 0..nz - disp_z]);
    let shifted = field.slice(ndarray::s![disp_x..nx, disp_z..nz]);
    &shifted - &base
}

/// Vector kernel for a 3D field: longitudinal projection, and transverse
/// magnitude when `both` is set. Avoids dividing by `r=0` at the origin
/// displacement; the resulting arrays are unused there because the
/// aggregator overwrites the origin slot with zero for every order.
pub fn vector_kernel_3d(
    field: &VectorField3D,
    disp: Displacement,
    spacing: (f64, f64, f64),
    both: bool,
) -> Projection3D {
    let dx = diff_3d(&field.x, disp);
    let dy = diff_3d(&field.y, disp);
    let dz = diff_3d(&field.z, disp);

    if disp.is_origin() {
        let zeros = Array3::zeros(dx.dim());
        return Projection3D {
            par: zeros.clone(),
            perp: if both { Some(zeros) } else { None },
        };
    }

    let (lx, ly, lz) = disp.physical(spacing);
    let r = disp.magnitude(spacing);

    let par = (&dx * lx + &dy * ly + &dz * lz) / r;

    let perp = if both {
        let rx = &dx - &par * (lx / r);
        let ry = &dy - &par * (ly / r);
        let rz = &dz - &par * (lz / r);
        Some((&rx * &rx + &ry * &ry + &rz * &rz).mapv(f64::sqrt))
    } else {
        None
    };

    Projection3D { par, perp }
}

/// Vector kernel for a 2D field: displacement axes are `(x, z)`, the y
/// component is absent.
pub fn vector_kernel_2d(
    field: &VectorField2D,
    disp_x: usize,
    disp_z: usize,
    spacing: (f64, f64),
    both: bool,
) -> Projection2D {
    let dx = diff_2d(&field.x, disp_x, disp_z);
    let dz = diff_2d(&field.z, disp_x, disp_z);

    if disp_x == 0 && disp_z == 0 {
        let zeros = Array2::zeros(dx.dim());
        return Projection2D {
            par: zeros.clone(),
            perp: if both { Some(zeros) } else { None },
        };
    }

    let lx = disp_x as f64 * spacing.0;
    let lz = disp_z as f64 * spacing.1;
    let r = (lx * lx + lz * lz).sqrt();

    let par = (&dx * lx + &dz * lz) / r;

    let perp = if both {
        let rx = &dx - &par * (lx / r);
        let rz = &dz - &par * (lz / r);
        Some((&rx * &rx + &rz * &rz).mapv(f64::sqrt))
    } else {
        None
    };

    Projection2D { par, perp }
}

/// Scalar kernel: a plain difference, no projection.
pub fn scalar_kernel_3d(field: &ScalarField3D, disp: Displacement) -> Array3<f64> {
    diff_3d(field, disp)
}

pub fn scalar_kernel_2d(field: &ScalarField2D, disp_x: usize, disp_z: usize) -> Array2<f64> {
    diff_2d(field, disp_x, disp_z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn linear_field(n: usize, d: f64) -> Array3<f64> {
        Array3::from_shape_fn((n, n, n), |(i, _, _)| i as f64 * d)
    }

    #[test]
    fn scalar_diff_matches_closed_form_linear_field() {
        let n = 8;
        let d = 0.1;
        let theta = linear_field(n, d);
        let disp = Displacement::new(3, 0, 0);
        let delta = scalar_kernel_3d(&theta, disp);
        // every pair differs by exactly l_x = 3*d along x
        for v in delta.iter() {
            assert!((v - 3.0 * d).abs() < 1e-12);
        }
    }

    #[test]
    fn vector_longitudinal_matches_radius_for_linear_field() {
        let n = 8;
        let d = 1.0 / (n - 1) as f64;
        let field = VectorField3D {
            x: Array3::from_shape_fn((n, n, n), |(i, _, _)| i as f64 * d),
            y: Array3::from_shape_fn((n, n, n), |(_, j, _)| j as f64 * d),
            z: Array3::from_shape_fn((n, n, n), |(_, _, k)| k as f64 * d),
        };
        let disp = Displacement::new(2, 1, 3);
        let spacing = (d, d, d);
        let r = disp.magnitude(spacing);

        let proj = vector_kernel_3d(&field, disp, spacing, true);
        for v in proj.par.iter() {
            assert!((v - r).abs() < 1e-10, "{} != {}", v, r);
        }
        for v in proj.perp.unwrap().iter() {
            assert!(v.abs() < 1e-10);
        }
    }

    #[test]
    fn pair_count_is_product_of_surviving_shape() {
        assert_eq!(pair_count(&[5, 4, 3]), 60.0);
    }
}

//! Analytic round-trip test cases: linear fields whose structure functions
//! have a closed form. Used both as library `#[test]`s and as the
//! orchestrator's optional VERIFY state when `test.test_switch` is set.

use crate::field::{ScalarField2D, ScalarField3D, VectorField2D, VectorField3D};
use crate::grid::Displacement;
use crate::tensor::{Tensors2D, Tensors3D};
use ndarray::{Array2, Array3, Array4};

const RELATIVE_TOLERANCE: f64 = 1e-10;
const ABSOLUTE_TOLERANCE: f64 = 1e-10;

/// Result of comparing a computed tensor against its closed form.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub scenario: &'static str,
    pub max_relative_error: f64,
    pub passed: bool,
}

impl VerifyReport {
    pub fn banner(&self) -> String {
        format!(
            "[TEST] scenario '{}': {} (max relative error {:.3e})",
            self.scenario,
            if self.passed { "PASS" } else { "FAIL" },
            self.max_relative_error
        )
    }
}

fn compare(actual: f64, expected: f64) -> f64 {
    if expected.abs() < ABSOLUTE_TOLERANCE {
        (actual - expected).abs()
    } else {
        ((actual - expected) / expected).abs()
    }
}

/// Scenario 1/2: `U_x = i*dx, U_y = j*dy, U_z = k*dz` (3D) so that
/// `S_par(l, p) = r^p` and `S_perp == 0`.
pub fn linear_vector_field_3d(n: (usize, usize, usize), spacing: (f64, f64, f64)) -> VectorField3D {
    let (nx, ny, nz) = n;
    VectorField3D {
        x: Array3::from_shape_fn((nx, ny, nz), |(i, _, _)| i as f64 * spacing.0),
        y: Array3::from_shape_fn((nx, ny, nz), |(_, j, _)| j as f64 * spacing.1),
        z: Array3::from_shape_fn((nx, ny, nz), |(_, _, k)| k as f64 * spacing.2),
    }
}

pub fn linear_vector_field_2d(n: (usize, usize), spacing: (f64, f64)) -> VectorField2D {
    let (nx, nz) = n;
    VectorField2D {
        x: Array2::from_shape_fn((nx, nz), |(i, _)| i as f64 * spacing.0),
        z: Array2::from_shape_fn((nx, nz), |(_, k)| k as f64 * spacing.1),
    }
}

/// Scenario 3/4: `theta = i*dx + j*dy + k*dz` so that
/// `S_theta(l, p) = (l_x + l_y + l_z)^p`.
pub fn linear_scalar_field_3d(n: (usize, usize, usize), spacing: (f64, f64, f64)) -> ScalarField3D {
    let (nx, ny, nz) = n;
    Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| {
        i as f64 * spacing.0 + j as f64 * spacing.1 + k as f64 * spacing.2
    })
}

pub fn linear_scalar_field_2d(n: (usize, usize), spacing: (f64, f64)) -> ScalarField2D {
    let (nx, nz) = n;
    Array2::from_shape_fn((nx, nz), |(i, k)| i as f64 * spacing.0 + k as f64 * spacing.1)
}

/// Checks scenarios 1/2: `S_par == r^p`, `S_perp == 0`, origin cleaned up.
pub fn check_vector_tensors_3d(tensors: &Tensors3D, spacing: (f64, f64, f64), q1: i32, q2: i32) -> VerifyReport {
    let (nx, ny, nz, _) = tensors.par.dim();
    let mut max_err = 0.0f64;

    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let disp = Displacement::new(x, y, z);
                let r = disp.magnitude(spacing);
                for (idx, p) in (q1..=q2).enumerate() {
                    let expected = if disp.is_origin() { 0.0 } else { r.powi(p) };
                    let actual = tensors.par[[x, y, z, idx]];
                    max_err = max_err.max(compare(actual, expected));

                    if let Some(perp) = &tensors.perp {
                        max_err = max_err.max(compare(perp[[x, y, z, idx]], 0.0));
                    }
                }
            }
        }
    }

    VerifyReport {
        scenario: "3D vector linear",
        max_relative_error: max_err,
        passed: max_err < RELATIVE_TOLERANCE * 10.0,
    }
}

pub fn check_vector_tensors_2d(tensors: &Tensors2D, spacing: (f64, f64), q1: i32, q2: i32) -> VerifyReport {
    let (nx, nz, _) = tensors.par.dim();
    let mut max_err = 0.0f64;

    for x in 0..nx {
        for z in 0..nz {
            let lx = x as f64 * spacing.0;
            let lz = z as f64 * spacing.1;
            let r = (lx * lx + lz * lz).sqrt();
            for (idx, p) in (q1..=q2).enumerate() {
                let expected = if x == 0 && z == 0 { 0.0 } else { r.powi(p) };
                let actual = tensors.par[[x, z, idx]];
                max_err = max_err.max(compare(actual, expected));

                if let Some(perp) = &tensors.perp {
                    max_err = max_err.max(compare(perp[[x, z, idx]], 0.0));
                }
            }
        }
    }

    VerifyReport {
        scenario: "2D vector linear",
        max_relative_error: max_err,
        passed: max_err < RELATIVE_TOLERANCE * 10.0,
    }
}

pub fn check_scalar_tensor_3d(tensor: &Array4<f64>, spacing: (f64, f64, f64), q1: i32, q2: i32) -> VerifyReport {
    let (nx, ny, nz, _) = tensor.dim();
    let mut max_err = 0.0f64;
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let disp = Displacement::new(x, y, z);
                let (lx, ly, lz) = disp.physical(spacing);
                let l = lx + ly + lz;
                for (idx, p) in (q1..=q2).enumerate() {
                    let expected = if disp.is_origin() { 0.0 } else { l.powi(p) };
                    let actual = tensor[[x, y, z, idx]];
                    max_err = max_err.max(compare(actual, expected));
                }
            }
        }
    }

    VerifyReport {
        scenario: "3D scalar linear",
        max_relative_error: max_err,
        passed: max_err < RELATIVE_TOLERANCE * 10.0,
    }
}

pub fn check_scalar_tensor_2d(tensor: &Array3<f64>, spacing: (f64, f64), q1: i32, q2: i32) -> VerifyReport {
    let (nx, nz, _) = tensor.dim();
    let mut max_err = 0.0f64;
    for x in 0..nx {
        for z in 0..nz {
            let lx = x as f64 * spacing.0;
            let lz = z as f64 * spacing.1;
            let l = lx + lz;
            for (idx, p) in (q1..=q2).enumerate() {
                let expected = if x == 0 && z == 0 { 0.0 } else { l.powi(p) };
                let actual = tensor[[x, z, idx]];
                max_err = max_err.max(compare(actual, expected));
            }
        }
    }

    VerifyReport {
        scenario: "2D scalar linear",
        max_relative_error: max_err,
        passed: max_err < RELATIVE_TOLERANCE * 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{run_scalar_2d, run_scalar_3d, run_vector_2d, run_vector_3d};
    use crate::partition::{build_table, ProcessGrid};

    #[test]
    fn scenario_1_3d_vector_linear() {
        let n = 32;
        let l = 1.0;
        let d = l / (n - 1) as f64;
        let spacing = (d, d, d);
        let field = linear_vector_field_3d((n, n, n), spacing);

        let grid = ProcessGrid::new(2, 4).unwrap();
        let half = n / 2;
        let table = build_table(&grid, half, half).unwrap();

        let (q1, q2) = (1, 4);
        let out = run_vector_3d(&field, spacing, &table, half, q1, q2, true);

        let mut tensors = Tensors3D::zeroed((half, half, half), (q2 - q1 + 1) as usize, true);
        tensors.aggregate(out);

        let report = check_vector_tensors_3d(&tensors, spacing, q1, q2);
        assert!(report.passed, "{}", report.banner());
    }

    #[test]
    fn scenario_3_3d_scalar_linear() {
        let n = 32;
        let l = 1.0;
        let d = l / (n - 1) as f64;
        let spacing = (d, d, d);
        let field = linear_scalar_field_3d((n, n, n), spacing);

        let grid = ProcessGrid::new(2, 4).unwrap();
        let half = n / 2;
        let table = build_table(&grid, half, half).unwrap();

        let (q1, q2) = (1, 3);
        let out = run_scalar_3d(&field, &table, half, q1, q2);

        let mut tensor = ndarray::Array4::<f64>::zeros((half, half, half, (q2 - q1 + 1) as usize));
        for local in out {
            for (x, y, z, idx, val, _) in local {
                tensor[[x, y, z, idx]] = val;
            }
        }
        crate::tensor::zero_origin_3d(&mut tensor);

        let report = check_scalar_tensor_3d(&tensor, spacing, q1, q2);
        assert!(report.passed, "{}", report.banner());
    }

    #[test]
    fn scenario_2_2d_vector_linear() {
        let n = 32;
        let l = 1.0;
        let d = l / (n - 1) as f64;
        let spacing = (d, d);
        let field = linear_vector_field_2d((n, n), spacing);

        let grid = ProcessGrid::new(2, 4).unwrap();
        let half = n / 2;
        let table = build_table(&grid, half, half).unwrap();

        let (q1, q2) = (1, 4);
        let out = run_vector_2d(&field, spacing, &table, q1, q2, true);

        let mut tensors = Tensors2D::zeroed((half, half), (q2 - q1 + 1) as usize, true);
        tensors.aggregate(out);

        let report = check_vector_tensors_2d(&tensors, spacing, q1, q2);
        assert!(report.passed, "{}", report.banner());
    }

    #[test]
    fn scenario_4_2d_scalar_linear() {
        let n = 32;
        let l = 1.0;
        let d = l / (n - 1) as f64;
        let spacing = (d, d);
        let field = linear_scalar_field_2d((n, n), spacing);

        let grid = ProcessGrid::new(2, 4).unwrap();
        let half = n / 2;
        let table = build_table(&grid, half, half).unwrap();

        let (q1, q2) = (1, 3);
        let out = run_scalar_2d(&field, &table, q1, q2);

        let mut tensor = ndarray::Array3::<f64>::zeros((half, half, (q2 - q1 + 1) as usize));
        for local in out {
            for (x, z, idx, val, _) in local {
                tensor[[x, z, idx]] = val;
            }
        }
        crate::tensor::zero_origin_2d(&mut tensor);

        let report = check_scalar_tensor_2d(&tensor, spacing, q1, q2);
        assert!(report.passed, "{}", report.banner());
    }

    #[test]
    fn origin_is_always_zero_regardless_of_closed_form() {
        let n = 16;
        let d = 1.0 / (n - 1) as f64;
        let spacing = (d, d, d);
        let field = linear_scalar_field_3d((n, n, n), spacing);
        let grid = ProcessGrid::new(2, 4).unwrap();
        let half = n / 2;
        let table = build_table(&grid, half, half).unwrap();
        let out = run_scalar_3d(&field, &table, half, 1, 3);

        let mut tensor = ndarray::Array4::<f64>::zeros((half, half, half, 3));
        for local in out {
            for (x, y, z, idx, val, _) in local {
                tensor[[x, y, z, idx]] = val;
            }
        }
        crate::tensor::zero_origin_3d(&mut tensor);

        for idx in 0..3 {
            assert_eq!(tensor[[0, 0, 0, idx]], 0.0);
        }
    }
}

//! Field storage: dense double-precision arrays over the grid, read once and
//! immutable thereafter.

use ndarray::{Array2, Array3};

/// A 3D scalar field `theta` over an `(Nx, Ny, Nz)` grid.
pub type ScalarField3D = Array3<f64>;
/// A 2D scalar field `theta` over an `(Nx, Nz)` grid.
pub type ScalarField2D = Array2<f64>;

/// A 3D vector field `(U_x, U_y, U_z)`, each an `(Nx, Ny, Nz)` array.
#[derive(Debug, Clone)]
pub struct VectorField3D {
    pub x: Array3<f64>,
    pub y: Array3<f64>,
    pub z: Array3<f64>,
}

impl VectorField3D {
    pub fn shape(&self) -> (usize, usize, usize) {
        let d = self.x.dim();
        (d.0, d.1, d.2)
    }
}

/// A 2D vector field `(U_x, U_z)`; the y-axis is absent.
#[derive(Debug, Clone)]
pub struct VectorField2D {
    pub x: Array2<f64>,
    pub z: Array2<f64>,
}

impl VectorField2D {
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }
}

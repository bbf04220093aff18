//! Result tensors and the aggregator that merges per-worker buffers into
//! them.
//!
//! Each worker's local compute pass returns one flat buffer of
//! `(coords, order_index, values)` entries; the aggregator merges every
//! worker's buffer in one batched pass and writes the disjoint slots into
//! the dense tensors, then zeroes the origin.

use ndarray::{Array3, Array4};

/// One emitted sample for the 3D driver: `(x, y, z, order_index, par, perp)`.
pub type Entry3D = (usize, usize, usize, usize, f64, Option<f64>);
/// One emitted sample for the 2D driver: `(x, z, order_index, par, perp)`.
pub type Entry2D = (usize, usize, usize, f64, Option<f64>);

/// 3D result tensors, shape `(Nx/2, Ny/2, Nz/2, M)`.
pub struct Tensors3D {
    pub par: Array4<f64>,
    pub perp: Option<Array4<f64>>,
}

/// 2D result tensors, shape `(Nx/2, Nz/2, M)`.
pub struct Tensors2D {
    pub par: Array3<f64>,
    pub perp: Option<Array3<f64>>,
}

impl Tensors3D {
    pub fn zeroed(half: (usize, usize, usize), orders: usize, both: bool) -> Self {
        let shape = (half.0, half.1, half.2, orders);
        Tensors3D {
            par: Array4::zeros(shape),
            perp: if both { Some(Array4::zeros(shape)) } else { None },
        }
    }

    /// Merge every worker's local buffer into the tensor, then zero the
    /// **l** = 0 slot for every order.
    pub fn aggregate(&mut self, per_rank: Vec<Vec<Entry3D>>) {
        for local in per_rank {
            for (x, y, z, p_idx, par_val, perp_val) in local {
                self.par[[x, y, z, p_idx]] = par_val;
                if let (Some(perp_arr), Some(v)) = (self.perp.as_mut(), perp_val) {
                    perp_arr[[x, y, z, p_idx]] = v;
                }
            }
        }
        let orders = self.par.dim().3;
        for p_idx in 0..orders {
            self.par[[0, 0, 0, p_idx]] = 0.0;
            if let Some(perp_arr) = self.perp.as_mut() {
                perp_arr[[0, 0, 0, p_idx]] = 0.0;
            }
        }
    }
}

impl Tensors2D {
    pub fn zeroed(half: (usize, usize), orders: usize, both: bool) -> Self {
        let shape = (half.0, half.1, orders);
        Tensors2D {
            par: Array3::zeros(shape),
            perp: if both { Some(Array3::zeros(shape)) } else { None },
        }
    }

    pub fn aggregate(&mut self, per_rank: Vec<Vec<Entry2D>>) {
        for local in per_rank {
            for (x, z, p_idx, par_val, perp_val) in local {
                self.par[[x, z, p_idx]] = par_val;
                if let (Some(perp_arr), Some(v)) = (self.perp.as_mut(), perp_val) {
                    perp_arr[[x, z, p_idx]] = v;
                }
            }
        }
        let orders = self.par.dim().2;
        for p_idx in 0..orders {
            self.par[[0, 0, p_idx]] = 0.0;
            if let Some(perp_arr) = self.perp.as_mut() {
                perp_arr[[0, 0, p_idx]] = 0.0;
            }
        }
    }
}

/// Scalar tensors share the same shapes as the longitudinal vector tensor
/// but carry a single field, so they reuse the `par` slot under the name
/// `theta` at the call site instead of introducing a third near-identical
/// struct.
pub type ScalarTensor3D = Array4<f64>;
pub type ScalarTensor2D = Array3<f64>;

pub fn zero_origin_3d(tensor: &mut Array4<f64>) {
    let orders = tensor.dim().3;
    for p_idx in 0..orders {
        tensor[[0, 0, 0, p_idx]] = 0.0;
    }
}

pub fn zero_origin_2d(tensor: &mut Array3<f64>) {
    let orders = tensor.dim().2;
    for p_idx in 0..orders {
        tensor[[0, 0, p_idx]] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_populates_disjoint_slots_and_zeroes_origin() {
        let mut t = Tensors3D::zeroed((2, 2, 2), 2, true);
        let per_rank = vec![
            vec![(0, 0, 0, 0, 5.0, Some(1.0)), (1, 1, 1, 1, 9.0, Some(2.0))],
            vec![(1, 0, 0, 0, 3.0, Some(0.5))],
        ];
        t.aggregate(per_rank);
        assert_eq!(t.par[[0, 0, 0, 0]], 0.0); // overwritten by origin cleanup
        assert_eq!(t.par[[1, 1, 1, 1]], 9.0);
        assert_eq!(t.par[[1, 0, 0, 0]], 3.0);
        assert_eq!(t.perp.as_ref().unwrap()[[0, 0, 0, 0]], 0.0);
        assert_eq!(t.perp.as_ref().unwrap()[[1, 1, 1, 1]], 2.0);
    }
}

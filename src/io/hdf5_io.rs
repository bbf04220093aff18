//! HDF5 field/tensor I/O. Input fields and output tensors are external
//! collaborators, not owned by this crate; this adapter exists only to feed
//! the core engine and drain its results.

use crate::error::{ErrorKind, Result, ResultExt};
use ndarray::{Array2, Array3, Array4};
use std::path::Path;

/// Reads a 3D dataset, validating that its shape matches the configured
/// grid exactly.
pub fn read_dataset_3d(dir: &Path, base: &str, expected: (usize, usize, usize)) -> Result<Array3<f64>> {
    let path = dir.join(format!("{}.h5", base));
    let file = hdf5::File::open(&path)
        .chain_err(|| ErrorKind::CompatibilityError(format!("cannot open '{}'", path.display())))?;
    let dataset = file
        .dataset(base)
        .chain_err(|| ErrorKind::CompatibilityError(format!("no dataset named '{}' in '{}'", base, path.display())))?;

    let shape = dataset.shape();
    if shape.len() != 3 {
        bail!(ErrorKind::CompatibilityError(format!(
            "dataset '{}' has rank {}, expected 3",
            base,
            shape.len()
        )));
    }
    if (shape[0], shape[1], shape[2]) != expected {
        bail!(ErrorKind::CompatibilityError(format!(
            "dataset '{}' has shape {:?}, expected {:?}",
            base, shape, expected
        )));
    }

    dataset
        .read::<f64, ndarray::Ix3>()
        .chain_err(|| ErrorKind::RuntimeError(format!("failed to read dataset '{}'", base)))
}

pub fn read_dataset_2d(dir: &Path, base: &str, expected: (usize, usize)) -> Result<Array2<f64>> {
    let path = dir.join(format!("{}.h5", base));
    let file = hdf5::File::open(&path)
        .chain_err(|| ErrorKind::CompatibilityError(format!("cannot open '{}'", path.display())))?;
    let dataset = file
        .dataset(base)
        .chain_err(|| ErrorKind::CompatibilityError(format!("no dataset named '{}' in '{}'", base, path.display())))?;

    let shape = dataset.shape();
    if shape.len() != 2 {
        bail!(ErrorKind::CompatibilityError(format!(
            "dataset '{}' has rank {}, expected 2",
            base,
            shape.len()
        )));
    }
    if (shape[0], shape[1]) != expected {
        bail!(ErrorKind::CompatibilityError(format!(
            "dataset '{}' has shape {:?}, expected {:?}",
            base, shape, expected
        )));
    }

    dataset
        .read::<f64, ndarray::Ix2>()
        .chain_err(|| ErrorKind::RuntimeError(format!("failed to read dataset '{}'", base)))
}

/// Writes one HDF5 file per order for a 3D tensor, e.g. `SF_Grid_pll3.h5`
/// holding the third-order slice as a dataset named `SF_Grid_pll3`.
pub fn write_tensor_3d(dir: &Path, base: &str, tensor: &Array4<f64>, q1: i32) -> Result<()> {
    std::fs::create_dir_all(dir)
        .chain_err(|| ErrorKind::RuntimeError(format!("cannot create output directory '{}'", dir.display())))?;

    let orders = tensor.dim().3;
    for idx in 0..orders {
        let order = q1 + idx as i32;
        let name = format!("{}{}", base, order);
        let path = dir.join(format!("{}.h5", name));
        let file = hdf5::File::create(&path)
            .chain_err(|| ErrorKind::RuntimeError(format!("cannot create '{}'", path.display())))?;
        let slice = tensor.index_axis(ndarray::Axis(3), idx).to_owned();
        let ds = file
            .new_dataset::<f64>()
            .shape(slice.dim())
            .create(name.as_str())
            .chain_err(|| ErrorKind::RuntimeError(format!("cannot create dataset '{}'", name)))?;
        ds.write(&slice)
            .chain_err(|| ErrorKind::RuntimeError(format!("cannot write dataset '{}'", name)))?;
    }
    Ok(())
}

pub fn write_tensor_2d(dir: &Path, base: &str, tensor: &Array3<f64>, q1: i32) -> Result<()> {
    std::fs::create_dir_all(dir)
        .chain_err(|| ErrorKind::RuntimeError(format!("cannot create output directory '{}'", dir.display())))?;

    let orders = tensor.dim().2;
    for idx in 0..orders {
        let order = q1 + idx as i32;
        let name = format!("{}{}", base, order);
        let path = dir.join(format!("{}.h5", name));
        let file = hdf5::File::create(&path)
            .chain_err(|| ErrorKind::RuntimeError(format!("cannot create '{}'", path.display())))?;
        let slice = tensor.index_axis(ndarray::Axis(2), idx).to_owned();
        let ds = file
            .new_dataset::<f64>()
            .shape(slice.dim())
            .create(name.as_str())
            .chain_err(|| ErrorKind::RuntimeError(format!("cannot create dataset '{}'", name)))?;
        ds.write(&slice)
            .chain_err(|| ErrorKind::RuntimeError(format!("cannot write dataset '{}'", name)))?;
    }
    Ok(())
}

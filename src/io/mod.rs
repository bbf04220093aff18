//! External boundary adapters: thin layers over HDF5 field I/O. YAML config
//! parsing and CLI overlay live in [`crate::config`]; this module is purely
//! the field/tensor I/O boundary.

pub mod hdf5_io;

pub use hdf5_io::{read_dataset_2d, read_dataset_3d, write_tensor_2d, write_tensor_3d};

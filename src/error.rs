//! Fatal-error taxonomy.
//!
//! Mirrors the `error_chain!{}` pattern used throughout this crate's own
//! binary: a single `Error`/`ErrorKind`/`Result`/`ResultExt` family, with
//! `bail!` for early aborts and `.chain_err(|| "...")` for adding context as
//! an error propagates up through the orchestrator.

error_chain! {
    foreign_links {
        Yaml(serde_yaml::Error);
        Io(std::io::Error);
        Hdf5(hdf5::Error);
    }

    errors {
        /// Missing YAML file, unparseable boolean, or an invalid grid size.
        ConfigError(msg: String) {
            description("invalid configuration")
            display("configuration error: {}", msg)
        }
        /// Dataset missing, wrong rank, or wrong shape.
        CompatibilityError(msg: String) {
            description("incompatible input data")
            display("compatibility error: {}", msg)
        }
        /// Violates the process-grid divisibility or power-of-two constraints.
        DecompositionError(msg: String) {
            description("invalid process decomposition")
            display("decomposition error: {}", msg)
        }
        /// I/O failure during read or write that is not itself a foreign
        /// `io::Error` (e.g. a malformed HDF5 layout the adapter refuses to
        /// trust).
        RuntimeError(msg: String) {
            description("runtime I/O failure")
            display("runtime error: {}", msg)
        }
    }
}

/// The seven-point checklist printed alongside `CompatibilityError`
/// diagnostics.
pub const COMPATIBILITY_CHECKLIST: &str = "\
Checklist:
  1. Input files live under `in/` and are named `<base>.h5`.
  2. Each file contains exactly one dataset, named identically to the file's base name.
  3. Dataset rank is 2 for 2D mode, 3 for 3D mode.
  4. Dataset shape matches `grid.{Nx,Ny,Nz}` from the parameter file exactly.
  5. Vector fields supply all required components (`U.V1r`/`U.V3r`, plus `U.V2r` in 3D).
  6. Scalar fields supply the single `T.Fr` dataset (or the configured override).
  7. `out/` is writable, or does not exist and can be created.";

//! Single-pass state machine dispatching to the correct 2D/3D x scalar/vector
//! x longitudinal-only/both variant.

use crate::config::{Config, Mode};
use crate::driver::{run_scalar_2d, run_scalar_3d, run_vector_2d, run_vector_3d};
use crate::error::{ErrorKind, Result};
use crate::field::{VectorField2D, VectorField3D};
use crate::io;
use crate::partition::{build_table, ProcessGrid};
use crate::tensor::{Tensors2D, Tensors3D};
use crate::verify;
use log::info;

/// Final outputs of a COMPUTE pass, ready for WRITE.
pub enum RunOutput {
    Vector3D(Tensors3D),
    Vector2D(Tensors2D),
    Scalar3D(ndarray::Array4<f64>),
    Scalar2D(ndarray::Array3<f64>),
}

/// Runs the full INIT -> LOAD -> ALLOC -> COMPUTE -> WRITE -> VERIFY ->
/// TEARDOWN pipeline for one configuration.
pub fn run(config: &Config) -> Result<()> {
    // INIT
    info!("INIT: grid ({}, {}, {}), mode {:?}, dims {}", config.nx, config.ny, config.nz, config.mode, if config.three_d { "3D" } else { "2D" });
    let grid = config.grid_spec();
    let spacing = grid.spacing();
    let process_grid = ProcessGrid::new(config.processors_x, config.total_processors)?;

    if config.three_d {
        run_3d(config, &grid, spacing, &process_grid)
    } else {
        run_2d(config, &grid, spacing, &process_grid)
    }
}

fn run_3d(
    config: &Config,
    grid: &crate::grid::GridSpec,
    spacing: (f64, f64, f64),
    process_grid: &ProcessGrid,
) -> Result<()> {
    let half = grid.half();
    let table = build_table(process_grid, half.0, half.1)?;
    info!("ALLOC: half-domain ({}, {}, {}), {} workers", half.0, half.1, half.2, process_grid.total);

    let output = match config.mode {
        Mode::Scalar => {
            // LOAD
            info!("LOAD: scalar field theta, test_mode={}", config.test_mode);
            let theta = if config.test_mode {
                verify::linear_scalar_field_3d((config.nx, config.ny, config.nz), spacing)
            } else {
                io::read_dataset_3d(&config.input_dir, &config.scalar_name, (config.nx, config.ny, config.nz))?
            };

            // COMPUTE
            info!("COMPUTE: SF_scalar_3D");
            let out = run_scalar_3d(&theta, &table, half.2, config.q1, config.q2);
            let mut tensor = ndarray::Array4::<f64>::zeros((half.0, half.1, half.2, config.orders()));
            for local in out {
                for (x, y, z, idx, val, _) in local {
                    tensor[[x, y, z, idx]] = val;
                }
            }
            crate::tensor::zero_origin_3d(&mut tensor);

            if config.test_mode {
                let report = verify::check_scalar_tensor_3d(&tensor, spacing, config.q1, config.q2);
                info!("{}", report.banner());
            }

            RunOutput::Scalar3D(tensor)
        }
        Mode::VectorLongitudinalOnly | Mode::VectorBoth => {
            let both = config.mode == Mode::VectorBoth;
            info!("LOAD: vector field (U_x, U_y, U_z), test_mode={}", config.test_mode);
            let field = if config.test_mode {
                verify::linear_vector_field_3d((config.nx, config.ny, config.nz), spacing)
            } else {
                VectorField3D {
                    x: io::read_dataset_3d(&config.input_dir, &config.u_name, (config.nx, config.ny, config.nz))?,
                    y: io::read_dataset_3d(&config.input_dir, &config.v_name, (config.nx, config.ny, config.nz))?,
                    z: io::read_dataset_3d(&config.input_dir, &config.w_name, (config.nx, config.ny, config.nz))?,
                }
            };

            info!("COMPUTE: {}", if both { "SF_both_3D" } else { "SF_long_3D" });
            let out = run_vector_3d(&field, spacing, &table, half.2, config.q1, config.q2, both);
            let mut tensors = Tensors3D::zeroed(half, config.orders(), both);
            tensors.aggregate(out);

            if config.test_mode {
                let report = verify::check_vector_tensors_3d(&tensors, spacing, config.q1, config.q2);
                info!("{}", report.banner());
            }

            RunOutput::Vector3D(tensors)
        }
    };

    write_output(config, output)
}

fn run_2d(
    config: &Config,
    grid: &crate::grid::GridSpec,
    spacing3: (f64, f64, f64),
    process_grid: &ProcessGrid,
) -> Result<()> {
    let half = grid.half();
    let table = build_table(process_grid, half.0, half.2)?;
    info!("ALLOC: half-domain ({}, {}), {} workers", half.0, half.2, process_grid.total);
    let spacing = (spacing3.0, spacing3.2);

    let output = match config.mode {
        Mode::Scalar => {
            info!("LOAD: scalar field theta, test_mode={}", config.test_mode);
            let theta = if config.test_mode {
                verify::linear_scalar_field_2d((config.nx, config.nz), spacing)
            } else {
                io::read_dataset_2d(&config.input_dir, &config.scalar_name, (config.nx, config.nz))?
            };

            info!("COMPUTE: SF_scalar_2D");
            let out = run_scalar_2d(&theta, &table, config.q1, config.q2);
            let mut tensor = ndarray::Array3::<f64>::zeros((half.0, half.2, config.orders()));
            for local in out {
                for (x, z, idx, val, _) in local {
                    tensor[[x, z, idx]] = val;
                }
            }
            crate::tensor::zero_origin_2d(&mut tensor);

            if config.test_mode {
                let report = verify::check_scalar_tensor_2d(&tensor, spacing, config.q1, config.q2);
                info!("{}", report.banner());
            }

            RunOutput::Scalar2D(tensor)
        }
        Mode::VectorLongitudinalOnly | Mode::VectorBoth => {
            let both = config.mode == Mode::VectorBoth;
            info!("LOAD: vector field (U_x, U_z), test_mode={}", config.test_mode);
            let field = if config.test_mode {
                verify::linear_vector_field_2d((config.nx, config.nz), spacing)
            } else {
                VectorField2D {
                    x: io::read_dataset_2d(&config.input_dir, &config.u_name, (config.nx, config.nz))?,
                    z: io::read_dataset_2d(&config.input_dir, &config.w_name, (config.nx, config.nz))?,
                }
            };

            info!("COMPUTE: {}", if both { "SF_both_2D" } else { "SF_long_2D" });
            let out = run_vector_2d(&field, spacing, &table, config.q1, config.q2, both);
            let mut tensors = Tensors2D::zeroed((half.0, half.2), config.orders(), both);
            tensors.aggregate(out);

            if config.test_mode {
                let report = verify::check_vector_tensors_2d(&tensors, spacing, config.q1, config.q2);
                info!("{}", report.banner());
            }

            RunOutput::Vector2D(tensors)
        }
    };

    write_output(config, output)
}

fn write_output(config: &Config, output: RunOutput) -> Result<()> {
    if config.test_mode {
        info!("WRITE: skipped in test mode");
        info!("TEARDOWN");
        return Ok(());
    }

    info!("WRITE: writing tensors to '{}'", config.output_dir.display());
    match output {
        RunOutput::Vector3D(tensors) => {
            io::write_tensor_3d(&config.output_dir, &config.pll_out_base, &tensors.par, config.q1)?;
            if let Some(perp) = &tensors.perp {
                io::write_tensor_3d(&config.output_dir, &config.perp_out_base, perp, config.q1)?;
            }
        }
        RunOutput::Vector2D(tensors) => {
            io::write_tensor_2d(&config.output_dir, &config.pll_out_base, &tensors.par, config.q1)?;
            if let Some(perp) = &tensors.perp {
                io::write_tensor_2d(&config.output_dir, &config.perp_out_base, perp, config.q1)?;
            }
        }
        RunOutput::Scalar3D(tensor) => {
            io::write_tensor_3d(&config.output_dir, &config.scalar_out_base, &tensor, config.q1)?;
        }
        RunOutput::Scalar2D(tensor) => {
            io::write_tensor_2d(&config.output_dir, &config.scalar_out_base, &tensor, config.q1)?;
        }
    }

    info!("TEARDOWN");
    Ok(())
}

/// Renders a fatal error as a short line, plus the input-data checklist
/// when the failure is a `CompatibilityError`.
pub fn render_fatal(err: &crate::error::Error) -> String {
    use colored::*;
    let mut out = format!("{}: {}", "error".red().bold(), err);
    if matches!(err.kind(), ErrorKind::CompatibilityError(_)) {
        out.push('\n');
        out.push_str(crate::error::COMPATIBILITY_CHECKLIST);
    }
    out
}

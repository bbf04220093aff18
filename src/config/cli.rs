//! CLI overlay. Every flag is optional and, when present, overrides the
//! corresponding YAML value. Boolean-valued flags accept
//! `"true"|"1"|"false"|"0"`.

use crate::error::{ErrorKind, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sfgrid", about = "Parallel velocity/scalar structure functions over gridded turbulence fields")]
pub struct Cli {
    /// Parameter file
    #[arg(short = 'c', long = "config", default_value = "in/para.yaml")]
    pub config: PathBuf,

    /// Input directory
    #[arg(short = 'i', long = "input-dir", default_value = "in")]
    pub input_dir: PathBuf,

    /// Output directory
    #[arg(short = 'o', long = "output-dir", default_value = "out")]
    pub output_dir: PathBuf,

    /// Worker count; stands in for an `mpirun -np P` launch parameter since
    /// this crate runs all workers in one process on a `rayon` thread pool.
    #[arg(short = 'n', long = "workers")]
    pub workers: Option<usize>,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'X')]
    pub nx: Option<usize>,
    #[arg(short = 'Y')]
    pub ny: Option<usize>,
    #[arg(short = 'Z')]
    pub nz: Option<usize>,
    #[arg(short = 'x')]
    pub lx: Option<f64>,
    #[arg(short = 'y')]
    pub ly: Option<f64>,
    #[arg(short = 'z')]
    pub lz: Option<f64>,
    #[arg(short = 'p')]
    pub processors_x: Option<usize>,
    #[arg(short = '1')]
    pub q1: Option<i32>,
    #[arg(short = '2')]
    pub q2: Option<i32>,

    #[arg(short = 't')]
    pub test: Option<String>,
    #[arg(short = 's')]
    pub scalar: Option<String>,
    #[arg(short = 'd')]
    pub two_dim: Option<String>,
    #[arg(short = 'l')]
    pub longitudinal: Option<String>,

    #[arg(short = 'U')]
    pub u_name: Option<String>,
    #[arg(short = 'V')]
    pub v_name: Option<String>,
    #[arg(short = 'W')]
    pub w_name: Option<String>,

    #[arg(short = 'P')]
    pub perp_out_base: Option<String>,
    #[arg(short = 'L')]
    pub pll_out_base: Option<String>,
    #[arg(short = 'M')]
    pub scalar_out_base: Option<String>,
}

/// Parses a CLI boolean override (`"true"|"1"|"false"|"0"`).
pub fn parse_bool_flag(name: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => bail!(ErrorKind::ConfigError(format!(
            "flag -{} expects true|1|false|0, got '{}'",
            name, other
        ))),
    }
}

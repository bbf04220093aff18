//! Assembles the layered configuration: YAML parameter file, then CLI
//! overlay, then validation.

pub mod cli;
pub mod yaml;

use crate::error::{ErrorKind, Result, ResultExt};
use cli::{parse_bool_flag, Cli};
use std::path::PathBuf;

/// Which tensors the run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scalar,
    VectorLongitudinalOnly,
    VectorBoth,
}

/// Fully resolved, validated run configuration, threaded explicitly through
/// every call rather than held as global mutable state.
#[derive(Debug, Clone)]
pub struct Config {
    pub three_d: bool,
    pub mode: Mode,

    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,

    pub q1: i32,
    pub q2: i32,

    pub processors_x: usize,
    pub total_processors: usize,

    pub test_mode: bool,

    pub u_name: String,
    pub v_name: String,
    pub w_name: String,
    pub scalar_name: String,

    pub pll_out_base: String,
    pub perp_out_base: String,
    pub scalar_out_base: String,

    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Config> {
        let raw = yaml::load(&cli.config)?;

        let nx = cli.nx.unwrap_or(raw.grid.nx);
        let ny = cli.ny.unwrap_or(raw.grid.ny);
        let nz = cli.nz.unwrap_or(raw.grid.nz);
        let lx = cli.lx.unwrap_or(raw.domain_dimension.lx);
        let ly = cli.ly.unwrap_or(raw.domain_dimension.ly);
        let lz = cli.lz.unwrap_or(raw.domain_dimension.lz);
        let q1 = cli.q1.unwrap_or(raw.structure_function.q1);
        let q2 = cli.q2.unwrap_or(raw.structure_function.q2);
        let processors_x = cli.processors_x.unwrap_or(raw.program.processors_x);

        let scalar = match &cli.scalar {
            Some(s) => parse_bool_flag("s", s)?,
            None => raw.program.scalar_switch,
        };
        let two_dim = match &cli.two_dim {
            Some(s) => parse_bool_flag("d", s)?,
            None => raw.program.two_dim_switch,
        };
        let longitudinal_only = match &cli.longitudinal {
            Some(s) => parse_bool_flag("l", s)?,
            None => raw.program.only_longitudinal,
        };
        let test_mode = match &cli.test {
            Some(s) => parse_bool_flag("t", s)?,
            None => raw.test.test_switch,
        };

        let mode = if scalar {
            Mode::Scalar
        } else if longitudinal_only {
            Mode::VectorLongitudinalOnly
        } else {
            Mode::VectorBoth
        };

        let total_processors = cli
            .workers
            .or(raw.program.total_processors)
            .unwrap_or_else(rayon::current_num_threads);

        let u_name = cli.u_name.clone().unwrap_or_else(|| "U.V1r".to_string());
        let v_name = cli.v_name.clone().unwrap_or_else(|| "U.V2r".to_string());
        let w_name = cli.w_name.clone().unwrap_or_else(|| "U.V3r".to_string());
        let scalar_name = "T.Fr".to_string();

        let pll_out_base = cli.pll_out_base.clone().unwrap_or_else(|| "SF_Grid_pll".to_string());
        let perp_out_base = cli.perp_out_base.clone().unwrap_or_else(|| "SF_Grid_perp".to_string());
        let scalar_out_base = cli.scalar_out_base.clone().unwrap_or_else(|| "SF_Grid_scalar".to_string());

        let config = Config {
            three_d: !two_dim,
            mode,
            nx,
            ny,
            nz,
            lx,
            ly,
            lz,
            q1,
            q2,
            processors_x,
            total_processors,
            test_mode,
            u_name,
            v_name,
            w_name,
            scalar_name,
            pll_out_base,
            perp_out_base,
            scalar_out_base,
            input_dir: cli.input_dir.clone(),
            output_dir: cli.output_dir.clone(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.lx <= 0.0 || self.ly <= 0.0 || self.lz <= 0.0 {
            bail!(ErrorKind::ConfigError(format!(
                "domain extents must be positive, got (Lx={}, Ly={}, Lz={})",
                self.lx, self.ly, self.lz
            )));
        }
        if self.q2 < self.q1 {
            bail!(ErrorKind::ConfigError(format!(
                "q2 ({}) must be >= q1 ({})",
                self.q2, self.q1
            )));
        }
        let grid = crate::grid::GridSpec::new(self.nx, self.ny, self.nz, self.lx, self.ly, self.lz)
            .chain_err(|| ErrorKind::ConfigError("invalid grid".into()))?;
        grid.validate_even(self.three_d)?;
        Ok(())
    }

    /// Orders `[q1, q2]`, inclusive.
    pub fn orders(&self) -> usize {
        (self.q2 - self.q1 + 1) as usize
    }

    pub fn grid_spec(&self) -> crate::grid::GridSpec {
        crate::grid::GridSpec {
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
            lx: self.lx,
            ly: self.ly,
            lz: self.lz,
        }
    }
}

//! The `in/para.yaml` schema, parsed with `serde_yaml`.

use crate::error::{ErrorKind, Result, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramSection {
    pub scalar_switch: bool,
    #[serde(rename = "Only_longitudinal")]
    pub only_longitudinal: bool,
    #[serde(rename = "2D_switch")]
    pub two_dim_switch: bool,
    #[serde(rename = "Processors_X")]
    pub processors_x: usize,
    /// Total worker count; stands in for an `mpirun -np P` launch parameter.
    #[serde(rename = "Total_Processors", default)]
    pub total_processors: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    #[serde(rename = "Nx")]
    pub nx: usize,
    #[serde(rename = "Ny")]
    pub ny: usize,
    #[serde(rename = "Nz")]
    pub nz: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainSection {
    #[serde(rename = "Lx")]
    pub lx: f64,
    #[serde(rename = "Ly")]
    pub ly: f64,
    #[serde(rename = "Lz")]
    pub lz: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureFunctionSection {
    pub q1: i32,
    pub q2: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSection {
    pub test_switch: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub program: ProgramSection,
    pub grid: GridSection,
    pub domain_dimension: DomainSection,
    pub structure_function: StructureFunctionSection,
    pub test: TestSection,
}

pub fn load(path: &Path) -> Result<RawConfig> {
    let text = fs::read_to_string(path)
        .chain_err(|| ErrorKind::ConfigError(format!("cannot read parameter file '{}'", path.display())))?;
    let raw: RawConfig = serde_yaml::from_str(&text)
        .chain_err(|| ErrorKind::ConfigError(format!("cannot parse YAML in '{}'", path.display())))?;
    Ok(raw)
}

//! Parallel velocity and scalar structure functions over gridded turbulence
//! fields.
//!
//! The crate is organized around the data flow described in the design
//! notes: a [`config`] is validated into a [`grid::GridSpec`] and a
//! [`partition::ProcessGrid`], fields are read through [`io`], the
//! [`partition`] module hands each logical worker its slice of the
//! half-domain, [`kernel`] and [`driver`] do the per-displacement reduction,
//! [`tensor`] aggregates the result, and [`orchestrator`] wires the whole
//! state machine together.

#[macro_use]
extern crate error_chain;

pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod grid;
pub mod io;
pub mod kernel;
pub mod orchestrator;
pub mod partition;
pub mod tensor;
pub mod verify;

pub use config::Config;
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use grid::{Displacement, GridSpec};
pub use orchestrator::run;

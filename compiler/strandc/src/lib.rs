//! Strand compiler driver.
//!
//! The binary is a thin shell over this library: [`options::parse_args`]
//! turns the command line into [`Options`], and [`commands::run`]
//! executes one command, writing its results and diagnostics to the
//! given writers.
//!
//! Set `STRAND_LOG` (or `RUST_LOG`) to an `EnvFilter` directive such as
//! `strand_resolve=debug` to see the resolver's phase tree on stderr.

pub mod commands;
pub mod options;
pub mod tracing_setup;

pub use options::{CliError, Command, Options};

//! covstage CLI Library
//!
//! Command-line driver for the covstage coverage lifecycle: resolve the
//! options, stage directories before a run, emit the report after it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CleanArgs, Cli, ColorArg, Commands, ConfigFormat, CoverageFlags, PrepareArgs, ReportArgs,
    ResolveArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity, CONFIG_FILE_NAMES};
pub use error::{CliError, CliResult};
pub use output::StatusReporter;

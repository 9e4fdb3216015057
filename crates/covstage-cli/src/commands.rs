//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use covstage::{Arrayable, RawCoverageConfig, Reporter};
use std::path::PathBuf;

/// covstage: prepare and emit coverage reports around a test run
#[derive(Parser, Debug)]
#[command(name = "covstage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Project root; relative paths in the configuration resolve against it
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Coverage configuration file (YAML or JSON); defaults to covstage.yaml in the root
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved coverage configuration
    Resolve(ResolveArgs),

    /// Stage report directories before a test run
    Prepare(PrepareArgs),

    /// Remove previous reports and recreate the temp directory
    Clean(CleanArgs),

    /// Register source maps and run the report engine after a test run
    Report(ReportArgs),
}

/// Coverage options accepted by every subcommand
///
/// Flags given here take precedence over the configuration file.
#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CoverageFlags {
    /// Enable coverage collection
    #[arg(long)]
    pub coverage: bool,

    /// Reporter to emit (repeatable)
    #[arg(long = "reporter", value_name = "NAME", value_parser = parse_reporter)]
    pub reporters: Vec<Reporter>,

    /// Reports directory
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Keep previous reports before a run
    #[arg(long)]
    pub no_clean: bool,

    /// Remove previous reports before a watch-mode rerun
    #[arg(long)]
    pub clean_on_rerun: bool,

    /// Glob to include (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Glob to exclude (repeatable); replaces the default list
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Hide fully covered files
    #[arg(long)]
    pub skip_full: bool,

    /// Report files outside the project root
    #[arg(long)]
    pub allow_external: bool,

    /// Keep node_modules in the report
    #[arg(long)]
    pub include_node_modules: bool,

    /// Temporary coverage-data directory
    #[arg(long, value_name = "DIR", env = covstage::TEMP_DIRECTORY_ENV)]
    pub temp_dir: Option<PathBuf>,
}

impl CoverageFlags {
    /// Options explicitly set on the command line
    #[must_use]
    pub fn to_raw(&self) -> RawCoverageConfig {
        RawCoverageConfig {
            enabled: self.coverage.then_some(true),
            reports_directory: self.reports_dir.clone(),
            clean: self.no_clean.then_some(false),
            clean_on_rerun: self.clean_on_rerun.then_some(true),
            allow_external: self.allow_external.then_some(true),
            reporter: (!self.reporters.is_empty())
                .then(|| Arrayable::Many(self.reporters.clone())),
            exclude_node_modules: self.include_node_modules.then_some(false),
            include: (!self.include.is_empty()).then(|| self.include.clone()),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            skip_full: self.skip_full.then_some(true),
        }
    }
}

fn parse_reporter(value: &str) -> Result<Reporter, String> {
    value.parse::<Reporter>().map_err(|e| e.to_string())
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Coverage options
    #[command(flatten)]
    pub flags: CoverageFlags,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: ConfigFormat,
}

/// Serialization format for the resolve command
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Arguments for the prepare command
#[derive(Parser, Debug)]
pub struct PrepareArgs {
    /// Coverage options
    #[command(flatten)]
    pub flags: CoverageFlags,

    /// Prepare for a watch-mode rerun (cleans per --clean-on-rerun)
    #[arg(long)]
    pub rerun: bool,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Coverage options
    #[command(flatten)]
    pub flags: CoverageFlags,

    /// Only ensure the temp directory exists
    #[arg(long)]
    pub keep_reports: bool,
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Coverage options
    #[command(flatten)]
    pub flags: CoverageFlags,

    /// JSON file mapping visited file paths to their coverage maps
    #[arg(long, value_name = "FILE")]
    pub visited: PathBuf,

    /// Reporter program to run
    #[arg(long, value_name = "PROGRAM", default_value = "c8")]
    pub engine: String,

    /// Arguments passed to the reporter program before the generated flags
    #[arg(last = true, value_name = "ENGINE_ARGS")]
    pub engine_args: Vec<String>,
}

/// Color output argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

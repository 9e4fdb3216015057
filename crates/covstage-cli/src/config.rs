//! CLI configuration

use crate::commands::CoverageFlags;
use crate::error::{CliError, CliResult};
use covstage::{
    absolute_path, resolve_coverage_options, RawCoverageConfig, ResolvedCoverageConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration files looked up in the project root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["covstage.yaml", "covstage.yml", "covstage.json"];

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Default `tracing` filter directive for this level
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Project root as given on the command line
    pub root: PathBuf,
    /// Explicit configuration file
    pub config_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            root: PathBuf::from("."),
            config_file: None,
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set project root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set configuration file
    #[must_use]
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Absolute project root, with `.` and `..` collapsed
    pub fn absolute_root(&self) -> CliResult<PathBuf> {
        if self.root.is_absolute() {
            return Ok(absolute_path(&self.root, &self.root));
        }
        Ok(absolute_path(&std::env::current_dir()?, &self.root))
    }

    /// Configuration file to load, if any
    ///
    /// An explicit file must exist; otherwise the first of
    /// [`CONFIG_FILE_NAMES`] present in `root` is used.
    pub fn config_path(&self, root: &Path) -> CliResult<Option<PathBuf>> {
        if let Some(ref path) = self.config_file {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            };
            if !path.is_file() {
                return Err(CliError::config(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path));
        }

        Ok(CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file()))
    }

    /// Resolve coverage options: defaults, then the file, then command-line flags
    pub fn resolve_coverage(&self, flags: &CoverageFlags) -> CliResult<ResolvedCoverageConfig> {
        let root = self.absolute_root()?;

        let file = match self.config_path(&root)? {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading coverage configuration");
                RawCoverageConfig::load(&path)?
            }
            None => RawCoverageConfig::default(),
        };
        let raw = file.overlay(flags.to_raw());

        Ok(resolve_coverage_options(
            raw,
            &root,
            flags.temp_dir.as_deref(),
        ))
    }
}

//! Report Engine Seam
//!
//! The reporting engine is an external collaborator. This module exposes
//! only the two capabilities the emitter needs from it: register a source
//! map under a file URL, and run report generation.
//!
//! # Implementations
//!
//! - [`CommandEngine`] - stages the cache on disk and spawns a reporter process
//! - [`MockEngine`] - records calls, for unit testing

use crate::options::ResolvedCoverageConfig;
use crate::result::{CovError, CovResult};
use crate::source_map::SourceMapData;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// Source-map cache keyed by `file://` URL
pub type SourceMapCache = HashMap<String, SourceMapData>;

/// File name of the staged cache inside the temp directory
pub const SOURCE_MAP_CACHE_FILE: &str = "source-map-cache.json";

/// Abstract reporting engine
#[async_trait]
pub trait ReportEngine: Send {
    /// Register the source map for one file
    fn register_source_map(&mut self, url: String, data: SourceMapData);

    /// Everything registered so far
    fn source_maps(&self) -> &SourceMapCache;

    /// Generate all configured reports
    async fn run(&mut self) -> CovResult<()>;
}

/// Mock engine for unit testing
#[derive(Debug, Default)]
pub struct MockEngine {
    /// Registered source maps
    pub cache: SourceMapCache,
    /// Configuration the engine was created with
    pub config: Option<ResolvedCoverageConfig>,
    /// Fail `run` with this message when set
    pub fail_with: Option<String>,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl MockEngine {
    /// Create a new mock engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock engine holding the configuration it was built from
    #[must_use]
    pub fn from_config(config: &ResolvedCoverageConfig) -> Self {
        Self {
            config: Some(config.clone()),
            ..Self::default()
        }
    }

    /// Make `run` fail
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }
}

#[async_trait]
impl ReportEngine for MockEngine {
    fn register_source_map(&mut self, url: String, data: SourceMapData) {
        self.call_history.push(format!("register:{url}"));
        self.cache.insert(url, data);
    }

    fn source_maps(&self) -> &SourceMapCache {
        &self.cache
    }

    async fn run(&mut self) -> CovResult<()> {
        self.call_history.push("run".to_string());
        match self.fail_with {
            Some(ref message) => Err(CovError::engine(message.clone())),
            None => Ok(()),
        }
    }
}

/// Engine that hands the work to an external reporter program
///
/// `run` writes the cache to [`SOURCE_MAP_CACHE_FILE`] inside the temp
/// directory and spawns the program with the resolved options as flags.
#[derive(Debug)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    config: ResolvedCoverageConfig,
    cache: SourceMapCache,
}

impl CommandEngine {
    /// Create an engine for `program`
    #[must_use]
    pub fn new(program: impl Into<String>, config: &ResolvedCoverageConfig) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            config: config.clone(),
            cache: SourceMapCache::new(),
        }
    }

    /// Extra arguments placed before the generated flags
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Where the cache is staged
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.config.temp_directory.join(SOURCE_MAP_CACHE_FILE)
    }

    /// Full argument list passed to the program
    #[must_use]
    pub fn command_args(&self) -> Vec<String> {
        let config = &self.config;
        let mut args = self.args.clone();

        for reporter in &config.reporter {
            args.push("--reporter".to_string());
            args.push(reporter.to_string());
        }
        args.push("--reports-dir".to_string());
        args.push(config.reports_directory.display().to_string());
        args.push("--temp-directory".to_string());
        args.push(config.temp_directory.display().to_string());
        for glob in config.include.iter().flatten() {
            args.push("--include".to_string());
            args.push(glob.clone());
        }
        for glob in &config.exclude {
            args.push("--exclude".to_string());
            args.push(glob.clone());
        }
        args.push(format!("--exclude-node-modules={}", config.exclude_node_modules));
        if config.skip_full {
            args.push("--skip-full".to_string());
        }
        if config.allow_external {
            args.push("--allow-external".to_string());
        }
        args.push("--source-map-cache".to_string());
        args.push(self.cache_path().display().to_string());
        args
    }
}

#[async_trait]
impl ReportEngine for CommandEngine {
    fn register_source_map(&mut self, url: String, data: SourceMapData) {
        self.cache.insert(url, data);
    }

    fn source_maps(&self) -> &SourceMapCache {
        &self.cache
    }

    async fn run(&mut self) -> CovResult<()> {
        let cache_path = self.cache_path();
        let json = serde_json::to_vec_pretty(&self.cache)?;
        tokio::fs::create_dir_all(&self.config.temp_directory)
            .await
            .map_err(|e| CovError::io(&self.config.temp_directory, e))?;
        tokio::fs::write(&cache_path, json)
            .await
            .map_err(|e| CovError::io(&cache_path, e))?;

        let args = self.command_args();
        tracing::info!(program = %self.program, ?args, "running report engine");

        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .current_dir(&self.config.root)
            .status()
            .await
            .map_err(|e| CovError::engine(format!("failed to spawn `{}`: {e}", self.program)))?;

        if status.success() {
            Ok(())
        } else {
            Err(CovError::EngineExit {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

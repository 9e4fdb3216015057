//! covstage: Coverage Option Resolution and Report Staging
//!
//! Resolves a test runner's coverage options and drives the lifecycle of the
//! coverage report around a test run. Instrumentation and the report
//! formats themselves belong to an external reporting engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    COVSTAGE Lifecycle                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Option     │    │ Lifecycle  │    │ Report     │            │
//! │   │ Resolver   │───►│ (pre-run)  │───►│ Emitter    │──► Engine  │
//! │   │            │    │            │    │ (post-run) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use covstage::{
//!     prepare_coverage, report_coverage, resolve_coverage_options, temp_directory_override,
//!     CommandEngine, RawCoverageConfig, VisitedFileMap,
//! };
//! use std::path::Path;
//!
//! # async fn demo() -> covstage::CovResult<()> {
//! let raw = RawCoverageConfig::new().with_enabled(true);
//! let override_dir = temp_directory_override();
//! let config = resolve_coverage_options(raw, Path::new("/proj"), override_dir.as_deref());
//!
//! if prepare_coverage(&config).await?.is_enabled() {
//!     // ... run tests, collecting visited files ...
//!     let visited = VisitedFileMap::new();
//!     report_coverage(&visited, &config, |c| Ok(CommandEngine::new("c8", c))).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod lifecycle;
pub mod options;
pub mod report;
mod result;
pub mod source_map;

pub use engine::{CommandEngine, MockEngine, ReportEngine, SourceMapCache, SOURCE_MAP_CACHE_FILE};
pub use lifecycle::{clean_coverage, prepare_coverage, prepare_rerun, Preparation};
pub use options::{
    absolute_path, resolve_coverage_options, temp_directory_override, Arrayable, CoverageDefaults,
    RawCoverageConfig, Reporter, ResolvedCoverageConfig, DEFAULT_EXCLUDES, TEMP_DIRECTORY_ENV,
};
pub use report::report_coverage;
pub use result::{CovError, CovResult};
pub use source_map::{
    cache_entry, file_url, is_dependency_path, load_visited_files, RawCoverageMap,
    SourceMapCacheEntry, SourceMapData, VisitedFileMap,
};

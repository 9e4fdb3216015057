//! Report Lifecycle
//!
//! Pre-run staging of the on-disk report state.
//!
//! ```text
//! prepare_coverage ──disabled──► Preparation::Disabled (no filesystem access)
//!        │
//!     enabled
//!        ▼
//! clean_coverage(config.clean) ──► Preparation::Ready
//! ```
//!
//! Watch-mode reruns go through [`prepare_rerun`], which is the same gate
//! but cleans according to `cleanOnRerun`.

use crate::options::ResolvedCoverageConfig;
use crate::result::{CovError, CovResult};

/// Outcome of the pre-run gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preparation {
    /// Coverage is disabled; skip instrumentation setup entirely
    Disabled,
    /// Directories are staged and coverage collection can start
    Ready,
}

impl Preparation {
    /// Check if coverage collection should run
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Optionally delete the reports directory, then ensure the temp directory exists
///
/// Deletion is recursive. Creating the temp directory is idempotent. I/O
/// failures are returned to the caller untouched apart from the path.
pub async fn clean_coverage(config: &ResolvedCoverageConfig, clean: bool) -> CovResult<()> {
    let reports = &config.reports_directory;
    let exists = clean
        && tokio::fs::try_exists(reports)
            .await
            .map_err(|e| CovError::io(reports, e))?;
    if exists {
        tracing::info!(path = %reports.display(), "removing previous coverage reports");
        tokio::fs::remove_dir_all(reports)
            .await
            .map_err(|e| CovError::io(reports, e))?;
    }

    let temp = &config.temp_directory;
    tokio::fs::create_dir_all(temp)
        .await
        .map_err(|e| CovError::io(temp, e))?;
    tracing::debug!(path = %temp.display(), "coverage temp directory ready");

    Ok(())
}

/// Pre-run gate; call once per run, before any test executes
pub async fn prepare_coverage(config: &ResolvedCoverageConfig) -> CovResult<Preparation> {
    prepare_with(config, config.clean).await
}

/// Pre-rerun gate for watch mode; cleans only when `cleanOnRerun` is set
pub async fn prepare_rerun(config: &ResolvedCoverageConfig) -> CovResult<Preparation> {
    prepare_with(config, config.clean_on_rerun).await
}

async fn prepare_with(config: &ResolvedCoverageConfig, clean: bool) -> CovResult<Preparation> {
    if !config.enabled {
        tracing::debug!("coverage disabled, skipping preparation");
        return Ok(Preparation::Disabled);
    }

    clean_coverage(config, clean).await?;
    Ok(Preparation::Ready)
}

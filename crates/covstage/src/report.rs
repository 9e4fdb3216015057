//! Report Emitter
//!
//! Post-run step: feeds each visited file's source map to the reporting
//! engine, keyed by the file's `file://` URL, then runs the engine.
//!
//! Files under `node_modules` are never registered. Files that no longer
//! exist (transient or virtual modules) are skipped; the engine still counts
//! them from its own instrumentation data, only without a source map.

use crate::engine::ReportEngine;
use crate::options::ResolvedCoverageConfig;
use crate::result::CovResult;
use crate::source_map::{cache_entry, is_dependency_path, VisitedFileMap};

/// Register source maps for `visited` and generate the report
///
/// `create_engine` receives the resolved configuration unchanged. Call once,
/// after every worker has flushed its instrumentation maps. Engine errors
/// propagate; nothing is retried. The engine is returned after its run.
pub async fn report_coverage<E, F>(
    visited: &VisitedFileMap,
    config: &ResolvedCoverageConfig,
    create_engine: F,
) -> CovResult<E>
where
    E: ReportEngine,
    F: FnOnce(&ResolvedCoverageConfig) -> CovResult<E>,
{
    let mut engine = create_engine(config)?;

    let mut registered = 0usize;
    for (file, map) in visited {
        if is_dependency_path(file) {
            continue;
        }
        match tokio::fs::try_exists(file).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    file = %file.display(),
                    "visited file is gone, skipping source map"
                );
                continue;
            }
            // ENOTDIR and friends: the path cannot name a file on disk
            Err(error) => {
                tracing::debug!(
                    file = %file.display(),
                    %error,
                    "visited file cannot be checked, skipping source map"
                );
                continue;
            }
        }

        let (url, data) = cache_entry(file, map, &config.root)?.into_parts();
        engine.register_source_map(url, data);
        registered += 1;
    }

    tracing::info!(
        registered,
        visited = visited.len(),
        reporters = ?config.reporter,
        "generating coverage report"
    );
    engine.run().await?;
    Ok(engine)
}

//! Report command handler

use crate::commands::ReportArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::StatusReporter;
use covstage::{load_visited_files, report_coverage, CommandEngine, ReportEngine};

/// Execute the report command
///
/// Returns the number of source maps handed to the engine.
pub async fn execute_report(
    config: &CliConfig,
    args: &ReportArgs,
    status: &StatusReporter,
) -> CliResult<usize> {
    let resolved = config.resolve_coverage(&args.flags)?;
    if !resolved.enabled {
        status.warning("Coverage is disabled in the configuration; reporting anyway");
    }

    let visited = load_visited_files(&args.visited)?;
    status.info(&format!(
        "Loaded {} visited file(s) from {}",
        visited.len(),
        args.visited.display()
    ));

    let engine = report_coverage(&visited, &resolved, |c| {
        Ok(CommandEngine::new(args.engine.as_str(), c).with_args(args.engine_args.iter().cloned()))
    })
    .await?;

    let registered = engine.source_maps().len();
    status.success(&format!(
        "Coverage report written ({registered} source map(s))"
    ));
    status.path("reports", &resolved.reports_directory);
    Ok(registered)
}

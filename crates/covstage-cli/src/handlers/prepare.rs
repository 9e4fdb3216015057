//! Prepare and clean command handlers

use crate::commands::{CleanArgs, PrepareArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::StatusReporter;
use covstage::{clean_coverage, prepare_coverage, prepare_rerun, Preparation};

/// Execute the prepare command
pub async fn execute_prepare(
    config: &CliConfig,
    args: &PrepareArgs,
    status: &StatusReporter,
) -> CliResult<Preparation> {
    let resolved = config.resolve_coverage(&args.flags)?;

    let outcome = if args.rerun {
        prepare_rerun(&resolved).await?
    } else {
        prepare_coverage(&resolved).await?
    };

    match outcome {
        Preparation::Disabled => status.info("Coverage disabled, nothing to prepare"),
        Preparation::Ready => {
            status.success("Coverage directories ready");
            status.path("reports", &resolved.reports_directory);
            status.path("temp", &resolved.temp_directory);
        }
    }
    Ok(outcome)
}

/// Execute the clean command
///
/// Runs regardless of `enabled`, unlike `prepare`.
pub async fn execute_clean(
    config: &CliConfig,
    args: &CleanArgs,
    status: &StatusReporter,
) -> CliResult<()> {
    let resolved = config.resolve_coverage(&args.flags)?;
    clean_coverage(&resolved, !args.keep_reports).await?;

    if args.keep_reports {
        status.success("Temp directory ready");
    } else {
        status.success("Previous coverage reports removed");
    }
    status.path("temp", &resolved.temp_directory);
    Ok(())
}

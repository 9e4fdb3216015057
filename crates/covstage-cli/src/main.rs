//! covstage: coverage report staging for test runners
//!
//! ## Usage
//!
//! ```bash
//! covstage resolve --format yaml             # Show resolved options
//! covstage prepare --coverage                # Before the test run
//! covstage report --visited visited.json     # After the test run
//! covstage prepare --rerun                   # Before a watch-mode rerun
//! ```

use clap::Parser;
use covstage_cli::{
    handlers, logging, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, StatusReporter,
    Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let status = StatusReporter::new(ColorChoice::Auto.should_color(), false);
            status.failure(&format!("Error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    let use_color = config.color.should_color();
    logging::init_logging(config.verbosity, use_color);
    let status = StatusReporter::new(use_color, config.verbosity.is_quiet());

    // Phases never overlap, so a single-threaded runtime is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::config(format!("Failed to create runtime: {e}")))?;

    rt.block_on(async {
        match cli.command {
            Commands::Resolve(args) => handlers::execute_resolve(&config, &args),
            Commands::Prepare(args) => handlers::execute_prepare(&config, &args, &status)
                .await
                .map(|_| ()),
            Commands::Clean(args) => handlers::execute_clean(&config, &args, &status).await,
            Commands::Report(args) => handlers::execute_report(&config, &args, &status)
                .await
                .map(|_| ()),
        }
    })
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_root(&cli.root)
        .with_config_file(cli.config.clone())
}

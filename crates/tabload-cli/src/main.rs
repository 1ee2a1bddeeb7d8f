//! tabload command line.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tabload_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use tabload_cli::commands::{run_import, run_infer, run_preview, run_validate};
use tabload_cli::logging::{LogConfig, LogFormat, init_logging};
use tabload_cli::summary::{print_import_summary, print_inferred, print_plan, print_preview};
use tabload_ingest::IngestError;
use tabload_output::OutputError;
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Preview(args) => run_preview(args).map(|lines| print_preview(&lines)),
        Command::Infer(args) => run_infer(args).map(|result| print_inferred(&result)),
        Command::Validate(args) => run_validate(args).map(|result| print_plan(&result)),
        Command::Import(args) => run_import(args).map(|result| print_import_summary(&result)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) {
    eprintln!("error: {error:#}");
    if let Some(ingest) = error.downcast_ref::<IngestError>() {
        eprintln!("code: {}", ingest.code());
    }
    if let Some(output) = error.downcast_ref::<OutputError>() {
        eprintln!("{}", output.user_message());
        if let Some(suggestion) = output.suggestion() {
            eprintln!("hint: {suggestion}");
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

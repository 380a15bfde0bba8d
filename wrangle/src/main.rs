//! Command-line interface for wrangle

use clap::Parser;
use std::process;
use tracing::{debug, error, Level};

mod cli;
mod commands;
mod config;
mod output;

use cli::*;
use commands::export::ExportKind;
use config::WrangleConfig;
use wrangle_core::ExitStatus;

#[tokio::main]
async fn main() {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let status = if e.use_stderr() {
                ExitStatus::BADCMD
            } else {
                ExitStatus::SUCCESS
            };
            let _ = e.print();
            process::exit(status);
        }
    };

    // Initialize logging
    let log_level = if args.debug {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match WrangleConfig::load(&args.config) {
        Ok(config) => config.with_overrides(&args),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(e.exit_code());
        }
    };

    debug!("Collection directory: {}", config.collection_dir.display());

    // Execute command
    let result = match &args.command {
        Commands::ExploreAnalysis(location) => {
            commands::explore::handle_explore_command(location, &config).await
        }
        Commands::ExportMetadata(location) => {
            commands::export::handle_export_command(ExportKind::Metadata, location, &config, args.dry_run).await
        }
        Commands::ExportSubjects(location) => {
            commands::export::handle_export_command(ExportKind::Subjects, location, &config, args.dry_run).await
        }
        Commands::ExportMultipleAnalyses(location) => {
            commands::export::handle_export_command(ExportKind::Multiple, location, &config, args.dry_run).await
        }
        Commands::ExportAll(location) => {
            commands::export::handle_export_command(ExportKind::All, location, &config, args.dry_run).await
        }
        Commands::Help { topics } => commands::help::handle_help_command(topics),
        Commands::Version => commands::help::handle_version_command(),
    };

    match result {
        Ok(()) => {
            debug!("{} completed successfully", args.command.name());
        }
        Err(e) => {
            error!("{} failed: {}", args.command.name(), e);
            process::exit(e.exit_code());
        }
    }
}

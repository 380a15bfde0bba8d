//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wrangle_core::errors::{CoreError, CoreResult};

#[derive(Parser, Debug)]
#[command(name = "wrangle")]
#[command(about = "CALMA data wrangling utility")]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Collection directory the documents are written under
    #[arg(long, global = true)]
    pub collection: Option<PathBuf>,

    /// Run with full debug output enabled
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// List the documents an export would write without writing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarise the types and properties of the graph at URL
    #[command(name = "explore_analysis", alias = "explore")]
    ExploreAnalysis(LocationArgs),
    /// Export type, list, view and field descriptions for the graph at URL
    #[command(name = "export_metadata", alias = "export_met")]
    ExportMetadata(LocationArgs),
    /// Export an entity record for every typed subject of the graph at URL
    #[command(name = "export_subjects", alias = "export_sub")]
    ExportSubjects(LocationArgs),
    /// Merge every activity listed at URL, then export metadata and subjects
    #[command(name = "export_multiple_analyses", alias = "export_mul")]
    ExportMultipleAnalyses(LocationArgs),
    /// Export metadata and subjects for the graph at URL
    #[command(name = "export_all", aliases = ["export_analysis", "export_ana"])]
    ExportAll(LocationArgs),
    /// Show the command summary, or help for one command
    #[command(name = "help")]
    Help {
        #[arg(value_name = "COMMAND")]
        topics: Vec<String>,
    },
    /// Send the software version string to standard output
    #[command(name = "version", alias = "ver")]
    Version,
}

impl Commands {
    /// Canonical command name
    pub fn name(&self) -> &'static str {
        match self {
            Commands::ExploreAnalysis(_) => "explore_analysis",
            Commands::ExportMetadata(_) => "export_metadata",
            Commands::ExportSubjects(_) => "export_subjects",
            Commands::ExportMultipleAnalyses(_) => "export_multiple_analyses",
            Commands::ExportAll(_) => "export_all",
            Commands::Help { .. } => "help",
            Commands::Version => "version",
        }
    }
}

/// Positional arguments of a command that reads one graph
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Graph location: http(s) URL, file URL or path
    #[arg(value_name = "URL")]
    pub args: Vec<String>,
}

impl LocationArgs {
    /// The single location argument of `command`
    pub fn location(&self, command: &str) -> CoreResult<&str> {
        match self.args.as_slice() {
            [location] => Ok(location.as_str()),
            [] => Err(CoreError::MissingArgument {
                command: command.to_string(),
                label: "analysis URL".to_string(),
                supplied: String::new(),
            }),
            more => Err(CoreError::UnexpectedArguments {
                command: command.to_string(),
                supplied: more.join(" "),
            }),
        }
    }
}

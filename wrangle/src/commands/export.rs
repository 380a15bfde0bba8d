//! Export command implementations

use crate::cli::LocationArgs;
use crate::config::WrangleConfig;
use crate::output;
use tracing::info;
use wrangle_adapter_http::HttpGraphSource;
use wrangle_core::errors::CoreResult;
use wrangle_core::extract::ExportMode;
use wrangle_core::pipeline::{export_multiple, load, ExportScope, ExportSummary, Exporter};
use wrangle_core::sink::{DocumentSink, FsDocumentSink, MemorySink};
use wrangle_core::GraphSource;

/// Which export a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Metadata,
    Subjects,
    All,
    Multiple,
}

impl ExportKind {
    pub fn command_name(&self) -> &'static str {
        match self {
            ExportKind::Metadata => "export_metadata",
            ExportKind::Subjects => "export_subjects",
            ExportKind::All => "export_all",
            ExportKind::Multiple => "export_multiple_analyses",
        }
    }
}

/// Handle an export command
pub async fn handle_export_command(
    kind: ExportKind,
    args: &LocationArgs,
    config: &WrangleConfig,
    dry_run: bool,
) -> CoreResult<()> {
    let location = args.location(kind.command_name())?;
    let source = HttpGraphSource::new(config.source_config())?;
    run_export(kind, location, &source, config, dry_run).await?;
    Ok(())
}

/// Run an export against `source`, into the collection or, for a dry run, into memory
pub async fn run_export(
    kind: ExportKind,
    location: &str,
    source: &dyn GraphSource,
    config: &WrangleConfig,
    dry_run: bool,
) -> CoreResult<ExportSummary> {
    info!("{} {} into {}", kind.command_name(), location, config.collection_dir.display());
    let summary = if dry_run {
        let mut sink = MemorySink::new(config.layout());
        let summary = export_into(kind, location, source, config, &mut sink).await?;
        output::display_dry_run(&sink, &config.collection_dir);
        summary
    } else {
        let mut sink = FsDocumentSink::new(&config.collection_dir, config.layout());
        export_into(kind, location, source, config, &mut sink).await?
    };
    output::display_summary(kind.command_name(), &summary, &config.collection_dir);
    Ok(summary)
}

async fn export_into(
    kind: ExportKind,
    location: &str,
    source: &dyn GraphSource,
    config: &WrangleConfig,
    sink: &mut dyn DocumentSink,
) -> CoreResult<ExportSummary> {
    let scope = match kind {
        ExportKind::Multiple => {
            return export_multiple(source, location, &config.activity_type(), sink).await;
        }
        ExportKind::Metadata => ExportScope::Metadata,
        ExportKind::Subjects => ExportScope::Subjects,
        ExportKind::All => ExportScope::All,
    };
    let graph = load(source, location).await?;
    Exporter::new(&graph, ExportMode::Resource).export(scope, sink)
}

//! explore_analysis command implementation

use crate::cli::LocationArgs;
use crate::config::WrangleConfig;
use crate::output;
use tracing::info;
use wrangle_adapter_http::HttpGraphSource;
use wrangle_core::classify::{ExploreReport, TypeClassifier};
use wrangle_core::errors::CoreResult;
use wrangle_core::pipeline::load;
use wrangle_core::GraphSource;

/// Handle the explore_analysis command
pub async fn handle_explore_command(args: &LocationArgs, config: &WrangleConfig) -> CoreResult<()> {
    let location = args.location("explore_analysis")?;
    let source = HttpGraphSource::new(config.source_config())?;
    let report = explore(&source, location).await?;
    output::display_explore_report(location, &report);
    Ok(())
}

/// Fetch the graph at `location` and outline it
pub async fn explore(source: &dyn GraphSource, location: &str) -> CoreResult<ExploreReport> {
    let graph = load(source, location).await?;
    let report = TypeClassifier::default().explore(&graph);
    info!("Found {} types in {}", report.types.len(), location);
    Ok(report)
}

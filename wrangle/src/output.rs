//! Output formatting utilities for wrangle

use colored::*;
use std::path::Path;
use wrangle_core::classify::ExploreReport;
use wrangle_core::pipeline::ExportSummary;
use wrangle_core::sink::MemorySink;

/// Display the outline of an explored graph
pub fn display_explore_report(location: &str, report: &ExploreReport) {
    println!("{} {}", "CALMA analysis URL".bold(), location);
    println!("Read {} triples", report.triple_count);
    if report.types.is_empty() {
        println!("{}", "No typed subjects found".yellow());
        return;
    }
    for explored in &report.types {
        println!(
            "{} {} ({} instances)",
            "RDF type:".bold().blue(),
            explored.type_term,
            explored.instance_count
        );
        if !explored.additional_types.is_empty() {
            let others: Vec<String> = explored.additional_types.iter().map(|t| t.to_string()).collect();
            println!("    Additional types {}", others.join(", ").cyan());
        }
        for property in &explored.properties {
            println!("    property: {}", property);
        }
    }
}

/// Display the document counts of a finished export
pub fn display_summary(command: &str, summary: &ExportSummary, root: &Path) {
    println!(
        "{} {} documents under {}",
        format!("✓ {}:", command).green().bold(),
        summary.total(),
        root.display()
    );
    println!("{:<10} {}", "Types:".bold(), summary.types);
    println!("{:<10} {}", "Lists:".bold(), summary.lists);
    println!("{:<10} {}", "Views:".bold(), summary.views);
    println!("{:<10} {}", "Fields:".bold(), summary.fields);
    println!("{:<10} {}", "Entities:".bold(), summary.entities);
}

/// Display the documents a dry run would have written
pub fn display_dry_run(sink: &MemorySink, root: &Path) {
    println!(
        "{} {} documents would be written under {}",
        "Dry run:".yellow().bold(),
        sink.documents().len(),
        root.display()
    );
    for path in sink.documents().keys() {
        println!("  {}", path.display());
    }
}

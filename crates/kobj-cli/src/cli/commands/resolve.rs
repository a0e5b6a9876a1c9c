//! Resolve command: cluster one document's annotations.

use std::path::Path;

use console::style;

use kobj::config::Config;
use kobj::models::{DocumentInput, KnowledgeObject};
use kobj_resolve::services::KnowledgeObjectStrategy;

use super::OutputFormat;

pub async fn cmd_resolve(config: &Config, input: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?;
    let document: DocumentInput = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Invalid document file {}: {}", input.display(), e))?;

    let label = document
        .id
        .clone()
        .unwrap_or_else(|| input.display().to_string());
    let mut analysis = document.into_analysis()?;

    let strategy = KnowledgeObjectStrategy::new(&config.resolution);
    let outcome = strategy.resolve(&mut analysis)?;
    tracing::info!(
        "{}: {} annotations kept, {} dropped, {} knowledge objects",
        label,
        outcome.kept,
        outcome.dropped,
        outcome.text_objects
    );

    match format {
        OutputFormat::Json => {
            let records: Vec<_> = analysis
                .knowledge_objects
                .iter()
                .map(KnowledgeObject::to_record)
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Summary => {
            let summaries: Vec<_> = analysis
                .knowledge_objects
                .iter()
                .map(KnowledgeObject::summary)
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Text => {
            eprintln!(
                "{} {}: {} annotations into {} knowledge objects",
                style("✓").green(),
                style(&label).bold(),
                outcome.kept,
                outcome.text_objects
            );
            if outcome.dropped > 0 {
                eprintln!(
                    "  {} {} overlapping annotations dropped",
                    style("→").dim(),
                    outcome.dropped
                );
            }
            for object in &analysis.knowledge_objects {
                print_object(object);
            }
        }
    }

    Ok(())
}

fn print_object(object: &KnowledgeObject) {
    let category = if object.specific_category().is_empty() {
        object.category()
    } else {
        object.specific_category()
    };
    let members: Vec<String> = object
        .annotation_ids()
        .iter()
        .map(|id| id.to_string())
        .collect();

    println!(
        "{} {} {}",
        style(format!("#{}", object.id())).cyan(),
        style(format!("[{}]", category)).dim(),
        object.labels().join(", ")
    );
    println!("    annotations: {}", members.join(", "));
}

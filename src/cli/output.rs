//! Output formatting helpers for CLI commands

use crate::analysis::{FullAnalysisResult, SentimentLabel};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

fn sentiment_label(label: SentimentLabel) -> String {
    match label {
        SentimentLabel::Positive => "positive".green().to_string(),
        SentimentLabel::Neutral => "neutral".yellow().to_string(),
        SentimentLabel::Negative => "negative".red().to_string(),
    }
}

fn toxicity_label(is_toxic: bool) -> String {
    if is_toxic {
        "toxic".red().to_string()
    } else {
        "clean".green().to_string()
    }
}

/// Format a full analysis as a two-column table
pub fn format_analysis_table(result: &FullAnalysisResult) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec![Cell::new("Language"), Cell::new(result.language)]);
    table.add_row(vec![
        Cell::new("Sentiment"),
        Cell::new(format!(
            "{} ({:.2})",
            sentiment_label(result.sentiment.label),
            result.sentiment.score
        )),
    ]);

    let topics = result
        .topics
        .topics
        .iter()
        .map(|t| format!("{} ({:.2})", t.label, t.score))
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec![Cell::new("Topics"), Cell::new(or_dash(topics))]);

    let keywords = result
        .keywords
        .iter()
        .map(|k| k.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec![Cell::new("Keywords"), Cell::new(or_dash(keywords))]);

    table.add_row(vec![
        Cell::new("Summary"),
        Cell::new(&result.summary.summary),
    ]);

    let mut toxicity = toxicity_label(result.toxicity.is_toxic);
    if !result.toxicity.labels.is_empty() {
        toxicity.push_str(&format!(" [{}]", result.toxicity.labels.join(", ")));
    }
    table.add_row(vec![Cell::new("Toxicity"), Cell::new(toxicity)]);

    let entities = result
        .entities
        .iter()
        .map(|e| format!("{} ({})", e.text, e.kind))
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec![Cell::new("Entities"), Cell::new(or_dash(entities))]);

    let provider = if result.is_cached() {
        format!("{} (cached)", result.meta.provider)
    } else {
        result.meta.provider.clone()
    };
    table.add_row(vec![
        Cell::new("Provider"),
        Cell::new(format!("{}, {}ms", provider, result.meta.processing_time_ms)),
    ]);

    table.to_string()
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

/// Format a full analysis as pretty JSON
pub fn format_analysis_json(result: &FullAnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

use analysis_core::{MetricId, MetricResult};
use analysis_orchestrator::{AnalysisReport, BucketScore};
use anyhow::Result;
use tabled::{Table, Tabled};

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct ContributionRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "Contribution")]
    contribution: u32,
    #[tabled(rename = "Window")]
    window: String,
}

impl From<&MetricResult> for ContributionRow {
    fn from(entry: &MetricResult) -> Self {
        Self {
            metric: entry.name.clone(),
            value: entry.value.clone(),
            threshold: entry.threshold.clone(),
            contribution: entry.points,
            window: entry.category.to_string(),
        }
    }
}

pub fn render(report: &AnalysisReport, format: OutputFormat, pretty: bool, explain: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => println!("{}", render_table(report, explain)),
    }
    Ok(())
}

pub fn render_table(report: &AnalysisReport, explain: bool) -> String {
    let mut sections = vec![header(report)];
    if explain {
        sections.push(explanations());
    }
    sections.push(contribution_table(report.score.ledger.entries()));
    sections.push(recommendations(report));
    sections.join("\n\n")
}

fn header(report: &AnalysisReport) -> String {
    let profile = report.profile.clone().unwrap_or_default();
    let name = profile.short_name.as_deref().unwrap_or(report.symbol.as_str());
    format!(
        "{} ({})\nSector: {} | Industry: {}\nMarket Cap: {}",
        name,
        report.symbol,
        profile.sector.as_deref().unwrap_or("N/A"),
        profile.industry.as_deref().unwrap_or("N/A"),
        format_market_cap(profile.market_cap)
    )
}

fn explanations() -> String {
    let lines: Vec<String> = MetricId::ALL
        .iter()
        .map(|metric| format!("  - {}: {}", metric, metric.explanation()))
        .collect();
    format!("Metric explanations:\n{}", lines.join("\n"))
}

fn contribution_table(entries: &[MetricResult]) -> String {
    let rows: Vec<ContributionRow> = entries.iter().map(ContributionRow::from).collect();
    Table::new(rows).to_string()
}

fn recommendations(report: &AnalysisReport) -> String {
    format!(
        "Final recommendations:\n{}\n{}\n\nLong-term signals use {} of price data; short-term signals use {}. \
         Fundamentals are the latest reported financials.",
        recommendation_line(&report.score.long_term),
        recommendation_line(&report.score.short_term),
        report.windows.long,
        report.windows.short
    )
}

fn recommendation_line(score: &BucketScore) -> String {
    format!(
        "{} Score: {}% -> {}: {} ({}/{} points)",
        score.bucket.label(),
        score.percent,
        score.bucket.label(),
        score.recommendation,
        score.raw,
        score.max
    )
}

fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(value) if value.is_finite() && value >= 0.0 => group_thousands(value.round() as u64),
        Some(_) => "N/A".to_string(),
        None => "0".to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

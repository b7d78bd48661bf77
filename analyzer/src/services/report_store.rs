use crate::models::{NicheResult, Report};
use crate::services::report_aggregator::average_coefficient;
use crate::utils::{format_duration, format_thousands, round2};
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Writes the report as pretty-printed UTF-8 JSON, non-ASCII left unescaped.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("failed to write report to {}", path.display()))?;

    info!("Report with {} niches saved to {}", report.len(), path.display());
    Ok(())
}

pub fn read_report(path: &Path) -> Result<Report> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read report from {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is not a valid report", path.display()))
}

/// Total shorts views over total long-form views across all niches, 0 without long-form views.
pub fn view_ratio(report: &Report) -> f64 {
    let (horizontal, vertical) = report
        .niches
        .iter()
        .fold((0u64, 0u64), |(h, v), (_, result)| {
            (h + result.total_horizontal_views(), v + result.total_vertical_views())
        });

    if horizontal == 0 {
        0.0
    } else {
        round2(vertical as f64 / horizontal as f64)
    }
}

/// Average coefficient derived from the stored niche entries alone.
pub fn recompute_average_coefficient(report: &Report) -> f64 {
    average_coefficient(report.niches.iter().map(|(_, result)| result))
}

pub fn format_niche_summary(niche: &str, result: &NicheResult) -> String {
    let coefficient = if result.coefficient.is_finite() {
        result.coefficient.to_string()
    } else {
        "∞".to_string()
    };
    let dominant = if result.coefficient > 1.0 { "Shorts" } else { "Long-form" };

    let mut summary = format!(
        "\nNiche: {niche}\n\
         Average views (long-form): {}\n\
         Average views (shorts): {}\n\
         Coefficient (shorts / long-form): {coefficient}\n\
         Dominant format: {dominant}\n",
        format_thousands(result.avg_horizontal_views),
        format_thousands(result.avg_vertical_views),
    );
    for video in result.horizontal_videos.iter().chain(&result.vertical_videos) {
        summary.push_str(&format!(
            "  [{}] {} ({} views) {}\n",
            format_duration(video.duration_seconds),
            video.title,
            format_thousands(video.views),
            video.url
        ));
    }
    summary
}

pub fn print_report_summary(report: &Report) {
    for (niche, result) in &report.niches {
        print!("{}", format_niche_summary(niche, result));
    }
    println!("\nNiches analyzed: {}", report.len());
    println!("Average coefficient: {}", report.average_coefficient);
    println!("Shorts to long-form view ratio: {}", view_ratio(report));
}

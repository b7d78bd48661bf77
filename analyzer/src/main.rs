use log::{error, info};
use niche_analyzer::config::{create_report_aggregator, init_logger, load_environment};
use niche_analyzer::services::report_store::{print_report_summary, write_report};
use niche_analyzer::AnalyzerConfig;

#[tokio::main]
async fn main() {
    load_environment();
    init_logger();

    let config = match AnalyzerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration, nothing analyzed: {e:#}");
            return;
        }
    };

    info!(
        "Analyzing {} niches in region {}",
        config.niches.len(),
        config.region_code
    );
    let aggregator = create_report_aggregator(&config);
    let report = aggregator.aggregate(&config.niches).await;

    if let Err(e) = write_report(&config.output_file, &report) {
        error!("Failed to save the report: {e:#}");
        std::process::exit(1);
    }

    print_report_summary(&report);
    info!(
        "Analysis finished. Results saved to {}",
        config.output_file.display()
    );
}

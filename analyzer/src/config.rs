use crate::models::AVERAGE_COEFFICIENT_KEY;
use crate::services::niche_analyzer::NicheAnalyzer;
use crate::services::report_aggregator::ReportAggregator;
use crate::services::search_client::VideoSearchClient;
use crate::services::youtube_api::YouTubeApi;
use anyhow::{anyhow, Context, Result};
use env_logger::{Builder, Target};
use log::{info, LevelFilter};
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_REGION_CODE: &str = "RU";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;
pub const DEFAULT_MAX_RESULTS_PER_FORMAT: usize = 3;
pub const DEFAULT_OUTPUT_FILE: &str = "output.json";
pub const DEFAULT_LOG_FILE: &str = "youtube_analyzer.log";

pub const DEFAULT_NICHES: &[&str] = &[
    "котики",
    "смешные собаки",
    "реакции на фильмы",
    "новые песни",
    "челленджи",
    "пранки",
    "танцы",
    "пародии",
    "влоги",
    "анимации",
    "игры",
    "щенки и котята",
    "смешные моменты",
    "косплей",
    "скрытые камеры",
    "семейные игры",
    "вирусные танцы",
    "обзоры фильмов",
    "обзоры сериалов",
    "дети и еда",
    "путешествия",
    "обзоры гаджетов",
    "рецепты",
    "лучшие игры",
    "научные эксперименты",
];

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_key: String,
    pub api_url: Url,
    pub region_code: String,
    pub request_delay: Duration,
    pub max_results_per_format: usize,
    pub niches: Vec<String>,
    pub output_file: PathBuf,
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("YOUTUBE_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("YOUTUBE_API_KEY environment variable must be set"))?;

        let api_url_raw = lookup("YOUTUBE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(api_url_raw.trim_end_matches('/'))
            .with_context(|| format!("YOUTUBE_API_URL is not a valid URL: {api_url_raw}"))?;

        let region_code = lookup("REGION_CODE")
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION_CODE.to_string());

        let request_delay_ms = match lookup("REQUEST_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| {
                    format!("REQUEST_DELAY_MS must be a number of milliseconds, got '{raw}'")
                })?,
            None => DEFAULT_REQUEST_DELAY_MS,
        };

        let max_results_per_format = match lookup("MAX_RESULTS_PER_FORMAT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_RESULTS_PER_FORMAT must be a number, got '{raw}'"))?,
            None => DEFAULT_MAX_RESULTS_PER_FORMAT,
        };
        if max_results_per_format == 0 {
            return Err(anyhow!("MAX_RESULTS_PER_FORMAT must be greater than 0"));
        }

        let niches = match lookup("NICHES") {
            Some(raw) => parse_niche_list(&raw)?,
            None => DEFAULT_NICHES.iter().map(|n| n.to_string()).collect(),
        };

        let output_file = lookup("OUTPUT_FILE")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string())
            .into();

        Ok(AnalyzerConfig {
            api_key,
            api_url,
            region_code,
            request_delay: Duration::from_millis(request_delay_ms),
            max_results_per_format,
            niches,
            output_file,
        })
    }
}

/// Comma separated niche override, e.g. `NICHES="котики,танцы"`.
pub fn parse_niche_list(raw: &str) -> Result<Vec<String>> {
    let niches: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();

    if niches.is_empty() {
        return Err(anyhow!("NICHES must name at least one niche"));
    }
    if niches.iter().any(|n| n == AVERAGE_COEFFICIENT_KEY) {
        return Err(anyhow!(
            "'{AVERAGE_COEFFICIENT_KEY}' is reserved and cannot be used as a niche"
        ));
    }
    // report entries are keyed by niche name
    let mut seen = std::collections::HashSet::new();
    if let Some(duplicate) = niches.iter().find(|n| !seen.insert(n.as_str())) {
        return Err(anyhow!("niche '{duplicate}' is listed more than once in NICHES"));
    }
    Ok(niches)
}

/// Writes every log line to stderr and to the log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

pub fn init_logger() {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info).parse_default_env();

    let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let mut file_error = None;
    if !log_file.trim().is_empty() {
        match OpenOptions::new().create(true).append(true).open(&log_file) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(TeeWriter { file })));
            }
            Err(e) => file_error = Some(e),
        }
    }

    builder.init();
    if let Some(e) = file_error {
        log::warn!("Could not open log file {log_file}, logging to stderr only: {e}");
    }
    info!("Starting niche analyzer...");
}

pub fn create_youtube_api(config: &AnalyzerConfig) -> YouTubeApi {
    info!("Using YouTube Data API at: {}", config.api_url);
    YouTubeApi::new(&config.api_key, config.api_url.as_str(), &config.region_code)
}

pub fn create_report_aggregator(config: &AnalyzerConfig) -> ReportAggregator<YouTubeApi> {
    let search_client = VideoSearchClient::new(create_youtube_api(config), config.request_delay);
    ReportAggregator::new(NicheAnalyzer::new(search_client, config.max_results_per_format))
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

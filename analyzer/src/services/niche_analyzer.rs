use crate::models::{NicheAnalysis, NicheResult, Video, VideoFormat};
use crate::services::search_client::VideoSearchClient;
use crate::services::youtube_api::VideoProvider;
use crate::utils::round2;
use log::{error, info, warn};

pub struct NicheAnalyzer<P> {
    search_client: VideoSearchClient<P>,
    max_results_per_format: usize,
}

impl<P: VideoProvider> NicheAnalyzer<P> {
    pub fn new(search_client: VideoSearchClient<P>, max_results_per_format: usize) -> Self {
        NicheAnalyzer {
            search_client,
            max_results_per_format,
        }
    }

    pub async fn analyze(&self, niche: &str) -> NicheAnalysis {
        info!("Analyzing niche: {niche}");

        let horizontal_videos = self
            .search_client
            .search(niche, VideoFormat::Long, self.max_results_per_format)
            .await;
        info!("Found {} long-form videos for '{niche}'", horizontal_videos.len());

        let vertical_videos = self
            .search_client
            .search(niche, VideoFormat::Short, self.max_results_per_format)
            .await;
        info!("Found {} shorts for '{niche}'", vertical_videos.len());

        let analysis = build_niche_result(horizontal_videos, vertical_videos);
        match &analysis {
            NicheAnalysis::Analyzed(result) => {
                info!("Niche '{niche}' analyzed, coefficient {}", result.coefficient)
            }
            NicheAnalysis::NoData => warn!("No videos found for niche '{niche}'"),
            NicheAnalysis::Failed(reason) => error!("Analysis of niche '{niche}' failed: {reason}"),
        }
        analysis
    }
}

/// Statistics over the two classified batches of one niche.
///
/// The coefficient is shorts views over long-form views: infinite when only
/// shorts were found, zero when only long-form videos were found.
pub fn build_niche_result(
    horizontal_videos: Vec<Video>,
    vertical_videos: Vec<Video>,
) -> NicheAnalysis {
    if horizontal_videos.is_empty() && vertical_videos.is_empty() {
        return NicheAnalysis::NoData;
    }

    let total_horizontal: u64 = horizontal_videos.iter().map(|v| v.views).sum();
    let total_vertical: u64 = vertical_videos.iter().map(|v| v.views).sum();

    let coefficient = match (horizontal_videos.is_empty(), vertical_videos.is_empty()) {
        (false, false) if total_horizontal == 0 => {
            return NicheAnalysis::Failed("long-form videos have zero total views".to_string());
        }
        (false, false) => total_vertical as f64 / total_horizontal as f64,
        (true, false) => f64::INFINITY,
        _ => 0.0,
    };

    NicheAnalysis::Analyzed(NicheResult {
        avg_horizontal_views: average_views(total_horizontal, horizontal_videos.len()),
        avg_vertical_views: average_views(total_vertical, vertical_videos.len()),
        coefficient: round2(coefficient),
        horizontal_videos,
        vertical_videos,
    })
}

fn average_views(total: u64, count: usize) -> u64 {
    if count == 0 {
        0
    } else {
        total / count as u64
    }
}

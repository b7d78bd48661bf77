use crate::models::{
    CandidateOutcome, SearchCandidate, SkipReason, Video, VideoDetails, VideoFormat,
};
use crate::services::classifier::{classify, ClassificationInput};
use crate::services::youtube_api::VideoProvider;
use crate::utils::{format_thousands, parse_iso8601_duration};
use log::{debug, error, info, warn};
use std::time::Duration;

pub struct VideoSearchClient<P> {
    provider: P,
    request_delay: Duration,
}

impl<P: VideoProvider> VideoSearchClient<P> {
    pub fn new(provider: P, request_delay: Duration) -> Self {
        VideoSearchClient {
            provider,
            request_delay,
        }
    }

    /// Collects up to `max_results` videos of the requested format for `query`,
    /// keeping the provider's most-viewed-first order. Never fails: a broken
    /// search yields no videos and a broken candidate is skipped.
    pub async fn search(
        &self,
        query: &str,
        format: VideoFormat,
        max_results: usize,
    ) -> Vec<Video> {
        if query.trim().is_empty() || max_results == 0 {
            warn!("Refusing search with query '{query}' and max_results {max_results}");
            return Vec::new();
        }

        info!("Searching {format} videos for '{query}'");
        let candidates = match self.provider.search(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Search request for '{query}' failed: {e:#}");
                return Vec::new();
            }
        };
        info!("Received {} search results for '{query}'", candidates.len());

        let mut videos = Vec::with_capacity(max_results);
        for candidate in &candidates {
            // crude rate limiting, one pause per metadata call
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let details = self
                .provider
                .video_details(&candidate.id)
                .await
                .map_err(|e| format!("{e:#}"));

            match evaluate_candidate(candidate, details, format) {
                CandidateOutcome::Accepted(video) => {
                    info!(
                        "Found matching video {}: {} ({} views)",
                        video.id,
                        video.title,
                        format_thousands(video.views)
                    );
                    videos.push(video);
                    if videos.len() >= max_results {
                        info!("Collected the requested {max_results} videos for '{query}'");
                        break;
                    }
                }
                CandidateOutcome::Skipped(reason @ SkipReason::FormatMismatch { .. }) => {
                    debug!("Skipping video {}: {reason}", candidate.id);
                }
                CandidateOutcome::Skipped(reason) => {
                    warn!("Skipping video {} for '{query}': {reason}", candidate.id);
                }
            }
        }

        info!("Search for '{query}' finished with {} {format} videos", videos.len());
        videos
    }
}

/// Turns one search candidate plus the result of its metadata call into a video
/// of the requested format, or the reason it cannot be used.
pub fn evaluate_candidate(
    candidate: &SearchCandidate,
    details: Result<Option<VideoDetails>, String>,
    requested: VideoFormat,
) -> CandidateOutcome {
    let details = match details {
        Ok(Some(details)) => details,
        Ok(None) => return CandidateOutcome::Skipped(SkipReason::NoDetails),
        Err(e) => return CandidateOutcome::Skipped(SkipReason::DetailsRequestFailed(e)),
    };

    let Some(raw_duration) = details.duration.as_deref() else {
        return CandidateOutcome::Skipped(SkipReason::MissingDuration);
    };
    let Some(raw_views) = details.view_count.as_deref() else {
        return CandidateOutcome::Skipped(SkipReason::MissingViewCount);
    };

    let Ok(views) = raw_views.trim().parse::<u64>() else {
        let reason = SkipReason::MalformedViewCount(raw_views.to_string());
        return CandidateOutcome::Skipped(reason);
    };
    let Some(duration_seconds) = parse_iso8601_duration(raw_duration) else {
        let reason = SkipReason::MalformedDuration(raw_duration.to_string());
        return CandidateOutcome::Skipped(reason);
    };

    let actual = classify(&ClassificationInput {
        duration_seconds,
        title: &candidate.title,
        description: &candidate.description,
        details_description: &details.description,
    });
    if actual != requested {
        return CandidateOutcome::Skipped(SkipReason::FormatMismatch {
            expected: requested,
            actual,
        });
    }

    let title = if details.title.is_empty() {
        candidate.title.clone()
    } else {
        details.title
    };

    let video = Video::new(&candidate.id, title, views, duration_seconds, requested);
    CandidateOutcome::Accepted(video)
}

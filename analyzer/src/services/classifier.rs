use crate::models::VideoFormat;

/// Videos at or below this length are always shorts.
pub const SHORTS_MAX_DURATION_SECONDS: f64 = 60.0;

/// Signals for one video. `description` is the search-snippet text,
/// `details_description` the full description from the metadata call.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationInput<'a> {
    pub duration_seconds: f64,
    pub title: &'a str,
    pub description: &'a str,
    pub details_description: &'a str,
}

pub fn classify(input: &ClassificationInput) -> VideoFormat {
    let title = input.title.to_lowercase();
    let description = input.description.to_lowercase();
    // full descriptions mention "Shorts" in passing, only a shorts link counts there
    let details_description = input.details_description.to_lowercase();

    let is_short = input.duration_seconds <= SHORTS_MAX_DURATION_SECONDS
        || description.contains("shorts")
        || title.contains("#shorts")
        || title.contains("shorts")
        || details_description.contains("/shorts/");

    if is_short {
        VideoFormat::Short
    } else {
        VideoFormat::Long
    }
}

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key of the cross-niche average inside the report document.
pub const AVERAGE_COEFFICIENT_KEY: &str = "average_coefficient";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Short, // vertical clip
    Long,  // horizontal video
}

impl VideoFormat {
    pub fn label(&self) -> &'static str {
        match self {
            VideoFormat::Short => "shorts",
            VideoFormat::Long => "long-form",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub views: u64,
    pub duration_seconds: f64,
    #[serde(rename = "video_id")]
    pub id: String,
    pub url: String,
}

impl Video {
    pub fn new(
        id: &str,
        title: String,
        views: u64,
        duration_seconds: f64,
        format: VideoFormat,
    ) -> Self {
        Video {
            title,
            views,
            duration_seconds,
            id: id.to_string(),
            url: video_url(id, format),
        }
    }
}

pub fn video_url(video_id: &str, format: VideoFormat) -> String {
    match format {
        VideoFormat::Short => format!("https://youtube.com/shorts/{video_id}"),
        VideoFormat::Long => format!("https://youtube.com/watch/{video_id}"),
    }
}

/// One item of a search page (`search.list`, part=id,snippet).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchCandidate {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Extended metadata of a single video (`videos.list`).
/// Duration and view count stay raw; the API returns them as strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub duration: Option<String>,
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoDetails,
    DetailsRequestFailed(String),
    MissingDuration,
    MissingViewCount,
    MalformedDuration(String),
    MalformedViewCount(String),
    FormatMismatch {
        expected: VideoFormat,
        actual: VideoFormat,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDetails => write!(f, "no metadata returned"),
            SkipReason::DetailsRequestFailed(e) => write!(f, "metadata request failed: {e}"),
            SkipReason::MissingDuration => write!(f, "duration is missing"),
            SkipReason::MissingViewCount => write!(f, "view count is missing"),
            SkipReason::MalformedDuration(raw) => write!(f, "malformed duration '{raw}'"),
            SkipReason::MalformedViewCount(raw) => write!(f, "malformed view count '{raw}'"),
            SkipReason::FormatMismatch { expected, actual } => {
                write!(f, "format mismatch (wanted {expected}, got {actual})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Accepted(Video),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheResult {
    pub horizontal_videos: Vec<Video>,
    pub vertical_videos: Vec<Video>,
    // +inf when a niche has shorts but no long-form videos, stored as null
    #[serde(with = "coefficient_serde")]
    pub coefficient: f64,
    pub avg_horizontal_views: u64,
    pub avg_vertical_views: u64,
}

impl NicheResult {
    pub fn total_horizontal_views(&self) -> u64 {
        self.horizontal_videos.iter().map(|v| v.views).sum()
    }

    pub fn total_vertical_views(&self) -> u64 {
        self.vertical_videos.iter().map(|v| v.views).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NicheAnalysis {
    Analyzed(NicheResult),
    NoData,
    Failed(String),
}

/// Final analysis output. Niches keep the order in which they were analyzed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub niches: Vec<(String, NicheResult)>,
    pub average_coefficient: f64,
}

impl Report {
    pub fn get(&self, niche: &str) -> Option<&NicheResult> {
        self.niches
            .iter()
            .find(|(name, _)| name == niche)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.niches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.niches.is_empty()
    }
}

// Flat document: every niche is a top-level key next to `average_coefficient`.
impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.niches.len() + 1))?;
        for (niche, result) in &self.niches {
            map.serialize_entry(niche, result)?;
        }
        map.serialize_entry(AVERAGE_COEFFICIENT_KEY, &self.average_coefficient)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = Report;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of niche results with an average_coefficient entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Report, A::Error> {
                let mut report = Report::default();
                let mut average = None;
                while let Some(key) = access.next_key::<String>()? {
                    if key == AVERAGE_COEFFICIENT_KEY {
                        average = Some(access.next_value::<f64>()?);
                    } else {
                        let result = access.next_value::<NicheResult>()?;
                        report.niches.push((key, result));
                    }
                }
                report.average_coefficient = average
                    .ok_or_else(|| serde::de::Error::missing_field(AVERAGE_COEFFICIENT_KEY))?;
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}

mod coefficient_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

use crate::models::{SearchCandidate, VideoDetails};
use crate::services::youtube_api::VideoProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::time::Instant;

pub fn details(title: &str, duration: &str, views: &str) -> VideoDetails {
    VideoDetails {
        title: title.to_string(),
        description: String::new(),
        duration: Some(duration.to_string()),
        view_count: Some(views.to_string()),
    }
}

/// Scripted provider: canned search pages and metadata, with call recording.
#[derive(Default)]
pub struct FakeProvider {
    searches: HashMap<String, Vec<String>>,
    failing_searches: HashSet<String>,
    details: HashMap<String, VideoDetails>,
    search_calls: Mutex<Vec<String>>,
    details_calls: Mutex<Vec<String>>,
    details_call_times: Mutex<Vec<Instant>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, ids: &[&str]) -> Self {
        let ids = ids.iter().map(|id| id.to_string()).collect();
        self.searches.insert(query.to_string(), ids);
        self
    }

    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn with_details(mut self, id: &str, details: VideoDetails) -> Self {
        self.details.insert(id.to_string(), details);
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn details_calls(&self) -> Vec<String> {
        self.details_calls.lock().unwrap().clone()
    }

    pub fn details_call_times(&self) -> Vec<Instant> {
        self.details_call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoProvider for FakeProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        if self.failing_searches.contains(query) {
            return Err(anyhow!("quota exceeded"));
        }
        let ids = self.searches.get(query).cloned().unwrap_or_default();
        Ok(ids
            .into_iter()
            .map(|id| SearchCandidate {
                title: self.details.get(&id).map(|d| d.title.clone()).unwrap_or_default(),
                id,
                description: String::new(),
            })
            .collect())
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        self.details_calls.lock().unwrap().push(video_id.to_string());
        self.details_call_times.lock().unwrap().push(Instant::now());
        Ok(self.details.get(video_id).cloned())
    }
}

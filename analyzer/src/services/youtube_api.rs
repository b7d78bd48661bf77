use crate::models::{SearchCandidate, VideoDetails};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

/// Page size requested from the provider; the API caps `maxResults` at 50.
pub const SEARCH_PAGE_SIZE: usize = 50;

/// Source of search results and per-video metadata.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// One page of candidates for `query`, most viewed first.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>>;

    /// Extended metadata for one video, `None` when the provider knows no such video.
    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>>;
}

pub struct YouTubeApi {
    client: Client,
    api_key: String,
    base_url: String,
    region_code: String,
}

impl YouTubeApi {
    pub fn new(api_key: &str, base_url: &str, region_code: &str) -> Self {
        YouTubeApi {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            region_code: region_code.to_string(),
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{endpoint}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| e.without_url()) // the URL carries the API key
            .with_context(|| format!("request to {endpoint} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "{endpoint} returned status {status}: {}",
                api_error_message(&body)
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("{endpoint} returned invalid JSON"))
    }
}

#[async_trait]
impl VideoProvider for YouTubeApi {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        // Documentation: https://developers.google.com/youtube/v3/docs/search/list
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let response = self
            .get_json(
                "search",
                &[
                    ("q", query),
                    ("part", "id,snippet"),
                    ("type", "video"),
                    ("maxResults", page_size.as_str()),
                    ("regionCode", self.region_code.as_str()),
                    ("order", "viewCount"),
                    ("safeSearch", "none"),
                ],
            )
            .await?;

        parse_search_response(&response)
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        // Documentation: https://developers.google.com/youtube/v3/docs/videos
        let response = self
            .get_json(
                "videos",
                &[("part", "snippet,statistics,contentDetails"), ("id", video_id)],
            )
            .await?;

        Ok(parse_video_response(&response))
    }
}

pub fn parse_search_response(response: &Value) -> Result<Vec<SearchCandidate>> {
    let items = response["items"]
        .as_array()
        .ok_or_else(|| anyhow!("search response contains no items: {response}"))?;

    let candidates = items
        .iter()
        .filter_map(|item| {
            let Some(id) = item["id"]["videoId"].as_str() else {
                debug!("Ignoring search item without videoId: {}", item["id"]);
                return None;
            };
            Some(SearchCandidate {
                id: id.to_string(),
                title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
                description: item["snippet"]["description"]
                    .as_str()
                    .unwrap_or("")
                    .to_string(),
            })
        })
        .collect();

    Ok(candidates)
}

pub fn parse_video_response(response: &Value) -> Option<VideoDetails> {
    let item = response["items"].as_array()?.first()?;

    Some(VideoDetails {
        title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
        description: item["snippet"]["description"]
            .as_str()
            .unwrap_or("")
            .to_string(),
        duration: item["contentDetails"]["duration"].as_str().map(String::from),
        view_count: match &item["statistics"]["viewCount"] {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        },
    })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

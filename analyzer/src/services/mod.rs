pub mod classifier;
pub mod niche_analyzer;
pub mod report_aggregator;
pub mod report_store;
pub mod search_client;
pub mod youtube_api;

#[cfg(test)]
pub(crate) mod test_support;

use niche_analyzer::config::create_report_aggregator;
use niche_analyzer::services::report_store::{read_report, write_report};
use niche_analyzer::AnalyzerConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_page(ids: &[(&str, &str)]) -> Value {
    json!({
        "kind": "youtube#searchListResponse",
        "items": ids.iter().map(|(id, title)| json!({
            "id": {"kind": "youtube#video", "videoId": id},
            "snippet": {"title": title, "description": ""}
        })).collect::<Vec<_>>()
    })
}

fn video(title: &str, duration: &str, views: &str) -> Value {
    json!({
        "items": [{
            "snippet": {"title": title, "description": ""},
            "contentDetails": {"duration": duration},
            "statistics": {"viewCount": views}
        }]
    })
}

async fn mount_search(server: &MockServer, query: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .and(query_param("key", "test-key"))
        .and(query_param("part", "id,snippet"))
        .and(query_param("type", "video"))
        .and(query_param("maxResults", "50"))
        .and(query_param("regionCode", "RU"))
        .and(query_param("order", "viewCount"))
        .and(query_param("safeSearch", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_video(server: &MockServer, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", id))
        .and(query_param("part", "snippet,statistics,contentDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// "котики" has 3 long-form and 3 shorts (plus noise), "танцы" only shorts,
/// "пусто" nothing, "квота" a failing search.
async fn youtube_stub() -> MockServer {
    let server = MockServer::start().await;

    mount_search(
        &server,
        "котики",
        search_page(&[
            ("l1", "Кот и пёс"),
            ("s1", "Котик #shorts"),
            ("l2", "Кошачий фильм"),
            ("bad", "Без статистики"),
            ("s2", "Котёнок"),
            ("l3", "Кошки 24 часа"),
            ("s3", "Прыжок"),
            ("l4", "Лишнее видео"),
        ]),
    )
    .await;
    mount_video(&server, "l1", video("Кот и пёс", "PT12M3S", "3000")).await;
    mount_video(&server, "s1", video("Котик #shorts", "PT2M", "2500")).await;
    mount_video(&server, "l2", video("Кошачий фильм", "PT1H", "2000")).await;
    let no_views = json!({
        "items": [{"snippet": {"title": "x"}, "contentDetails": {"duration": "PT5M"}}]
    });
    mount_video(&server, "bad", no_views).await;
    mount_video(&server, "s2", video("Котёнок", "PT45S", "1500")).await;
    mount_video(&server, "l3", video("Кошки 24 часа", "PT10M", "1000")).await;
    mount_video(&server, "s3", video("Прыжок", "PT59S", "500")).await;
    mount_video(&server, "l4", video("Лишнее видео", "PT10M", "900")).await;

    mount_search(&server, "танцы", search_page(&[("d1", "Танец")])).await;
    mount_video(&server, "d1", video("Танец", "PT30S", "700")).await;

    mount_search(&server, "пусто", search_page(&[])).await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "квота"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The request cannot be completed because you have exceeded your quota."
            }
        })))
        .mount(&server)
        .await;

    server
}

fn config_for(server: &MockServer) -> AnalyzerConfig {
    let uri = server.uri();
    AnalyzerConfig::from_lookup(|key| match key {
        "YOUTUBE_API_KEY" => Some("test-key".to_string()),
        "YOUTUBE_API_URL" => Some(uri.clone()),
        "REQUEST_DELAY_MS" => Some("0".to_string()),
        "NICHES" => Some("котики,пусто,квота,танцы".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn analyzes_niches_against_the_search_api() {
    let server = youtube_stub().await;
    let config = config_for(&server);

    let report = create_report_aggregator(&config).aggregate(&config.niches).await;

    let names: Vec<&str> = report.niches.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["котики", "танцы"]);

    let cats = report.get("котики").unwrap();
    let long_ids: Vec<&str> = cats.horizontal_videos.iter().map(|v| v.id.as_str()).collect();
    let short_ids: Vec<&str> = cats.vertical_videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(long_ids, vec!["l1", "l2", "l3"]);
    assert_eq!(short_ids, vec!["s1", "s2", "s3"]);
    assert_eq!(cats.avg_horizontal_views, 2000);
    assert_eq!(cats.avg_vertical_views, 1500);
    assert_eq!(cats.coefficient, 0.75);
    assert_eq!(cats.horizontal_videos[0].duration_seconds, 723.0);
    assert_eq!(cats.vertical_videos[0].url, "https://youtube.com/shorts/s1");

    let dances = report.get("танцы").unwrap();
    assert!(dances.coefficient.is_infinite());
    assert_eq!(dances.avg_horizontal_views, 0);

    // the shorts-only niche stays out of the average
    assert_eq!(report.average_coefficient, 0.75);
}

#[tokio::test]
async fn identical_responses_give_identical_reports() {
    let server = youtube_stub().await;
    let config = config_for(&server);
    let aggregator = create_report_aggregator(&config);

    let first = aggregator.aggregate(&config.niches).await;
    let second = aggregator.aggregate(&config.niches).await;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string_pretty(&first).unwrap(),
        serde_json::to_string_pretty(&second).unwrap()
    );
}

#[tokio::test]
async fn report_file_round_trips() {
    let server = youtube_stub().await;
    let config = config_for(&server);
    let report = create_report_aggregator(&config).aggregate(&config.niches).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    write_report(&output, &report).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("\"котики\""));
    assert!(text.contains("\"coefficient\": null"));
    assert_eq!(read_report(&output).unwrap(), report);
}

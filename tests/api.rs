//! Drives the client against an in-process mock of the scraping API.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use scrape_client::api::models::ScrapeData;
use scrape_client::config::Config;
use scrape_client::error::NETWORK_ERROR;
use scrape_client::terminal::TerminalView;
use scrape_client::{
    FormInput, HttpApi, MemoryView, RequestController, ScrapeApi, ScrapeResult, ScrapingType, Submission,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type Received = Arc<Mutex<Vec<Value>>>;

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": "2024-01-01T00:00:00", "driver_active": true }))
}

async fn scrape(State(received): State<Received>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    received.lock().push(body.clone());

    let url = body["url"].as_str().unwrap_or_default().to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid URL format" })));
    }

    if url.contains("slow.example") {
        tokio::time::sleep(std::time::Duration::from_secs(6)).await;
    }

    let kind = body["scrapingType"].as_str().unwrap_or_default().to_string();
    let data = match kind.as_str() {
        "links" => json!([
            { "text": "Home", "url": "http://example.com/" },
            { "text": "<b>About</b>", "url": "http://example.com/about?a=1&b=2" }
        ]),
        "titles" => json!(["Welcome", "News"]),
        "custom" => json!(["$10"]),
        "images" => json!([]),
        _ => return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid scraping type" }))),
    };

    let mut reply = json!({
        "success": true,
        "url": url,
        "type": kind,
        "count": data.as_array().map(Vec::len).unwrap_or_default(),
        "data": data,
        "timestamp": "2024-01-01T00:00:00",
        "execution_time": 0.42
    });
    if kind == "custom" {
        reply["selector"] = body["customSelector"].clone();
    }
    (StatusCode::OK, Json(reply))
}

async fn spawn_api() -> (Config, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/scrape", post(scrape))
        .with_state(Arc::clone(&received));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config::with_api_base(&format!("http://{}/api", addr)).unwrap();
    (config, received)
}

fn memory_controller(config: &Config) -> RequestController<HttpApi, MemoryView> {
    let view = Arc::new(Mutex::new(MemoryView::default()));
    RequestController::new(HttpApi::new(config), view, config)
}

fn form(url: &str, kind: Option<ScrapingType>, selector: &str) -> FormInput {
    FormInput {
        url: url.to_string(),
        scraping_type: kind,
        custom_selector: selector.to_string(),
    }
}

#[tokio::test]
async fn health_endpoint_is_checked() {
    let (config, _) = spawn_api().await;
    let report = HttpApi::new(&config).health().await.unwrap();
    assert!(report.is_healthy());
    assert_eq!(report.driver_active, Some(true));

    let controller = memory_controller(&config);
    assert!(controller.check_health().await);
}

#[tokio::test]
async fn links_round_trip() {
    let (config, received) = spawn_api().await;
    let mut controller = memory_controller(&config);

    let outcome = controller
        .submit(&form("http://example.com", Some(ScrapingType::Links), "ignored"))
        .await;
    assert_eq!(outcome, Submission::Succeeded { count: 2 });

    // selector is dropped for non-custom types
    assert_eq!(
        received.lock().clone(),
        vec![json!({ "url": "http://example.com", "scrapingType": "links" })]
    );

    let view = controller.view().lock();
    assert_eq!(
        view.success.as_deref(),
        Some("Successfully scraped 2 items from http://example.com in 0.42s")
    );

    let fragment = scraper::Html::parse_fragment(&view.results_html);
    let items = scraper::Selector::parse("div.data-item:not(.summary)").unwrap();
    let anchors = scraper::Selector::parse("a").unwrap();

    let result = controller.current_result().unwrap();
    assert_eq!(fragment.select(&items).count(), result.count);
    assert_eq!(result.count, result.data.len());

    let hrefs: Vec<_> = fragment
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .collect();
    assert_eq!(hrefs, vec!["http://example.com/", "http://example.com/about?a=1&b=2"]);
    assert!(view.results_html.contains("&lt;b&gt;About&lt;/b&gt;"));
}

#[tokio::test]
async fn custom_selector_is_sent_and_shown() {
    let (config, received) = spawn_api().await;
    let mut controller = memory_controller(&config);

    let outcome = controller
        .submit(&form("https://shop.example", Some(ScrapingType::Custom), ".price"))
        .await;
    assert_eq!(outcome, Submission::Succeeded { count: 1 });
    assert_eq!(received.lock()[0]["customSelector"], json!(".price"));

    let result = controller.current_result().unwrap();
    assert_eq!(result.selector.as_deref(), Some(".price"));
    assert_eq!(result.data, ScrapeData::Custom(vec!["$10".into()]));
    assert!(controller.view().lock().results_html.contains("CSS Selector: .price"));
}

#[tokio::test]
async fn empty_result_shows_placeholder() {
    let (config, _) = spawn_api().await;
    let mut controller = memory_controller(&config);

    let outcome = controller
        .submit(&form("http://example.com", Some(ScrapingType::Images), ""))
        .await;
    assert_eq!(outcome, Submission::Succeeded { count: 0 });

    let view = controller.view().lock();
    assert!(view.results_visible);
    assert_eq!(view.results_html, scrape_client::render::NO_DATA);
}

#[tokio::test]
async fn server_rejection_surfaces_its_message() {
    let (config, received) = spawn_api().await;
    let mut controller = memory_controller(&config);

    let outcome = controller
        .submit(&form("example.com", Some(ScrapingType::Text), ""))
        .await;
    assert_eq!(outcome, Submission::Failed("Invalid URL format".into()));
    assert_eq!(received.lock().len(), 1);

    let view = controller.view().lock();
    assert_eq!(view.error.as_deref(), Some("Invalid URL format"));
    assert!(!view.results_visible);
    assert!(view.submit_enabled);
    assert!(!view.loading);
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let (config, received) = spawn_api().await;
    let mut controller = memory_controller(&config);

    controller.submit(&form("", Some(ScrapingType::Text), "")).await;
    controller.submit(&form("http://example.com", None, "")).await;
    controller
        .submit(&form("http://example.com", Some(ScrapingType::Custom), ""))
        .await;

    assert!(received.lock().is_empty());
    assert_eq!(
        controller.view().lock().error.as_deref(),
        Some("Please provide a CSS selector for custom scraping.")
    );
}

#[tokio::test]
async fn unreachable_server() {
    // grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::with_api_base(&format!("http://{}/api", addr)).unwrap();
    let mut controller = memory_controller(&config);

    assert!(!controller.check_health().await);
    let outcome = controller
        .submit(&form("http://example.com", Some(ScrapingType::Titles), ""))
        .await;
    assert_eq!(outcome, Submission::Failed(NETWORK_ERROR.into()));

    let view = controller.view().lock();
    assert_eq!(view.error.as_deref(), Some(NETWORK_ERROR));
    assert!(view.submit_enabled);
}

#[tokio::test]
async fn export_lands_on_disk() {
    let (config, _) = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let view = Arc::new(Mutex::new(TerminalView::new(dir.path().to_path_buf())));
    let mut controller = RequestController::new(HttpApi::new(&config), view, &config);

    assert!(!controller.export());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    controller
        .submit(&form("http://example.com", Some(ScrapingType::Titles), ""))
        .await;
    assert!(controller.export());

    let exported: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(exported.len(), 1);

    let name = exported[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("scraped_data_"));
    assert!(!name.contains(':'));

    let parsed: ScrapeResult = serde_json::from_str(&std::fs::read_to_string(&exported[0]).unwrap()).unwrap();
    assert_eq!(Some(&parsed), controller.current_result());
}

#[tokio::test]
async fn slow_server_is_waited_for() {
    let (config, _) = spawn_api().await;
    let mut controller = memory_controller(&config);

    let outcome = controller
        .submit(&form("http://slow.example", Some(ScrapingType::Titles), ""))
        .await;
    assert_eq!(outcome, Submission::Succeeded { count: 2 });
}

#[tokio::test]
async fn unwritable_results_panel_is_reported() {
    let (config, _) = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let view = Arc::new(Mutex::new(TerminalView::new(dir.path().join("missing"))));
    let mut controller = RequestController::new(HttpApi::new(&config), view, &config);

    let outcome = controller
        .submit(&form("http://example.com", Some(ScrapingType::Titles), ""))
        .await;
    let Submission::Failed(message) = outcome else {
        panic!("expected a failure, got {:?}", outcome);
    };
    assert!(message.starts_with("Failed to display results: could not write"));

    // the result is still held and can be exported elsewhere
    assert_eq!(controller.current_result().map(|r| r.count), Some(2));
}

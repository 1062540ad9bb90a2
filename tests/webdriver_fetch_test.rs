use cruise_prices::adapters::webdriver::{WebDriverFetcher, TIMEOUT_SCREENSHOT};
use cruise_prices::adapters::LocalStorage;
use cruise_prices::core::PageSource;
use cruise_prices::{ConfigOverrides, CruiseError, RunConfig};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const CONTAINER_HTML: &str = "<cruise-item-component>listing</cruise-item-component>";

fn config_for(server: &MockServer, screenshot_dir: &TempDir, delay: u64) -> RunConfig {
    let overrides = ConfigOverrides {
        email: Some("me@gmail.com".to_string()),
        password: Some("pw".to_string()),
        delay: Some(delay),
        target: Some("results-ready".to_string()),
        webdriver_url: Some(server.base_url()),
        screenshot_dir: Some(screenshot_dir.path().to_path_buf()),
        ..Default::default()
    };
    RunConfig::resolve(overrides, |_| None).unwrap()
}

#[tokio::test]
async fn test_fetch_expands_view_all_and_returns_container_markup() {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new().unwrap();

    let session_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session")
                .json_body_partial(r#"{"capabilities":{"alwaysMatch":{"browserName":"chrome"}}}"#);
            then.status(200)
                .json_body(json!({ "value": { "sessionId": "s-1", "capabilities": {} } }));
        })
        .await;
    let navigate_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session/s-1/url")
                .json_body_partial(r#"{"url":"https://sg.dreamcruiseline.com/swift/cruise?lang=1&siid=281788&departureports=SIN&ship=14101"}"#);
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;
    let ready_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session/s-1/element")
                .json_body_partial(r#"{"using":"css selector","value":".results-ready"}"#);
            then.status(200)
                .json_body(json!({ "value": { ELEMENT_KEY: "ready-1" } }));
        })
        .await;
    let view_all_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session/s-1/elements")
                .json_body_partial(r#"{"using":"partial link text","value":"View All"}"#);
            then.status(200).json_body(json!({
                "value": [{ ELEMENT_KEY: "va-1" }, { ELEMENT_KEY: "va-2" }]
            }));
        })
        .await;
    let click_first = server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-1/element/va-1/click");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;
    let click_second = server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-1/element/va-2/click");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;
    let container_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session/s-1/element")
                .json_body_partial(r#"{"using":"css selector","value":".cruise-list-container"}"#);
            then.status(200)
                .json_body(json!({ "value": { ELEMENT_KEY: "container-1" } }));
        })
        .await;
    let html_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/session/s-1/element/container-1/property/innerHTML");
            then.status(200).json_body(json!({ "value": CONTAINER_HTML }));
        })
        .await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/session/s-1");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;

    let config = config_for(&server, &temp_dir, 5);
    let fetcher = WebDriverFetcher::new(&config, LocalStorage::new(temp_dir.path()));

    let fragment = fetcher.fetch().await.unwrap();

    assert_eq!(fragment.as_str(), CONTAINER_HTML);
    session_mock.assert_async().await;
    navigate_mock.assert_async().await;
    ready_mock.assert_async().await;
    view_all_mock.assert_async().await;
    click_first.assert_hits_async(1).await;
    click_second.assert_hits_async(1).await;
    container_mock.assert_async().await;
    html_mock.assert_async().await;
    delete_mock.assert_hits_async(1).await;
    assert!(!temp_dir.path().join(TIMEOUT_SCREENSHOT).exists());
}

#[tokio::test]
async fn test_fetch_timeout_saves_screenshot_and_releases_session() {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new().unwrap();

    server
        .mock_async(|when, then| {
            when.method(POST).path("/session");
            then.status(200)
                .json_body(json!({ "value": { "sessionId": "s-2", "capabilities": {} } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-2/url");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;
    let find_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-2/element");
            then.status(404).json_body(json!({
                "value": {
                    "error": "no such element",
                    "message": "Unable to locate element",
                    "stacktrace": ""
                }
            }));
        })
        .await;
    let view_all_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-2/elements");
            then.status(200).json_body(json!({ "value": [] }));
        })
        .await;
    let screenshot_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/session/s-2/screenshot");
            // "fakepng"
            then.status(200).json_body(json!({ "value": "ZmFrZXBuZw==" }));
        })
        .await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/session/s-2");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;

    let config = config_for(&server, &temp_dir, 0);
    let fetcher = WebDriverFetcher::new(&config, LocalStorage::new(temp_dir.path()));

    let err = fetcher.fetch().await.unwrap_err();

    match err {
        CruiseError::LoadTimeout {
            selector,
            waited_secs,
        } => {
            assert_eq!(selector, ".results-ready");
            assert_eq!(waited_secs, 0);
        }
        other => panic!("expected LoadTimeout, got {:?}", other),
    }
    find_mock.assert_hits_async(1).await;
    screenshot_mock.assert_async().await;
    delete_mock.assert_hits_async(1).await;
    assert_eq!(view_all_mock.hits_async().await, 0);

    let screenshot = std::fs::read(temp_dir.path().join(TIMEOUT_SCREENSHOT)).unwrap();
    assert_eq!(screenshot, b"fakepng");
}

#[tokio::test]
async fn test_fetch_session_refused() {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new().unwrap();

    server
        .mock_async(|when, then| {
            when.method(POST).path("/session");
            then.status(500).json_body(json!({
                "value": {
                    "error": "session not created",
                    "message": "Chrome failed to start: exited abnormally"
                }
            }));
        })
        .await;
    let navigate_mock = server
        .mock_async(|when, then| {
            when.method(POST).path_contains("/url");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;

    let config = config_for(&server, &temp_dir, 1);
    let fetcher = WebDriverFetcher::new(&config, LocalStorage::new(temp_dir.path()));

    let err = fetcher.fetch().await.unwrap_err();

    match err {
        CruiseError::WebDriverError { message } => {
            assert!(message.contains("session not created"));
        }
        other => panic!("expected WebDriverError, got {:?}", other),
    }
    assert_eq!(navigate_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_view_all_links_clicked_in_document_order() {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new().unwrap();

    server
        .mock_async(|when, then| {
            when.method(POST).path("/session");
            then.status(200)
                .json_body(json!({ "value": { "sessionId": "s-3", "capabilities": {} } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-3/url");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session/s-3/element")
                .json_body_partial(r#"{"using":"css selector","value":".results-ready"}"#);
            then.status(200)
                .json_body(json!({ "value": { ELEMENT_KEY: "ready-3" } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-3/elements");
            then.status(200).json_body(json!({
                "value": [{ ELEMENT_KEY: "va-1" }, { ELEMENT_KEY: "va-2" }]
            }));
        })
        .await;
    let click_first = server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-3/element/va-1/click");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;
    // 第二個連結失效：只有依文件順序點擊時，第一個連結才會先被點到
    let click_second = server
        .mock_async(|when, then| {
            when.method(POST).path("/session/s-3/element/va-2/click");
            then.status(404).json_body(json!({
                "value": {
                    "error": "stale element reference",
                    "message": "element is not attached to the page document"
                }
            }));
        })
        .await;
    let container_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/session/s-3/element")
                .json_body_partial(r#"{"using":"css selector","value":".cruise-list-container"}"#);
            then.status(200)
                .json_body(json!({ "value": { ELEMENT_KEY: "container-3" } }));
        })
        .await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/session/s-3");
            then.status(200).json_body(json!({ "value": null }));
        })
        .await;

    let config = config_for(&server, &temp_dir, 5);
    let fetcher = WebDriverFetcher::new(&config, LocalStorage::new(temp_dir.path()));

    let err = fetcher.fetch().await.unwrap_err();

    match err {
        CruiseError::WebDriverError { message } => {
            assert!(message.contains("va-2"));
            assert!(message.contains("stale element reference"));
        }
        other => panic!("expected WebDriverError, got {:?}", other),
    }
    click_first.assert_hits_async(1).await;
    click_second.assert_hits_async(1).await;
    assert_eq!(container_mock.hits_async().await, 0);
    delete_mock.assert_hits_async(1).await;
}

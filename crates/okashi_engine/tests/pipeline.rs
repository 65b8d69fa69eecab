use std::io::Cursor;
use std::sync::{Arc, Mutex};

use okashi_engine::{
    run_search, EngineEvent, EventSink, FailureKind, FetchSettings, ReqwestFetcher, SearchFailure,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn tiny_png() -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(1, 1, image::Rgba([200, 80, 40, 255]));
    let mut cursor = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}

async fn mount_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, image_path: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bytes, "image/png"))
        .expect(1)
        .mount(server)
        .await;
}

fn record_names(events: &[EngineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::RecordReady { item, .. } => Some(item.name.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn search_emits_clear_then_appends_then_finish() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!({"item": [
            {"name": "umaibo", "url": "http://snacks.example/umaibo", "image": format!("{}/img/umaibo.png", server.uri())},
            {"name": "ramune", "url": "http://snacks.example/ramune", "image": format!("{}/img/ramune.png", server.uri())},
        ]}),
    )
    .await;
    mount_image(&server, "/img/umaibo.png", tiny_png()).await;
    mount_image(&server, "/img/ramune.png", tiny_png()).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 4);
    assert!(matches!(
        events[0],
        EngineEvent::EnvelopeDecoded {
            search_id: 1,
            item_count: 2,
        }
    ));
    assert_eq!(record_names(&events), vec!["umaibo", "ramune"]);
    match &events[3] {
        EngineEvent::SearchFinished {
            search_id: 1,
            outcome: Ok(tally),
        } => {
            assert_eq!(tally.total_items, 2);
            assert_eq!(tally.enriched, 2);
            assert_eq!(tally.skipped, 0);
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn enriched_records_carry_fresh_ids_and_decoded_dimensions() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!({"item": [
            {"name": "umaibo", "url": "http://snacks.example/umaibo", "image": format!("{}/img/a.png", server.uri())},
            {"name": "ramune", "url": "http://snacks.example/ramune", "image": format!("{}/img/b.png", server.uri())},
        ]}),
    )
    .await;
    mount_image(&server, "/img/a.png", tiny_png()).await;
    mount_image(&server, "/img/b.png", tiny_png()).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 7, &format!("{}/api/", server.uri()), &sink).await;

    let items: Vec<_> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::RecordReady { item, .. } => Some(item),
            _ => None,
        })
        .collect();
    assert_eq!(items.len(), 2);
    assert_ne!(items[0].id, items[1].id);
    for item in &items {
        assert_eq!((item.image.width, item.image.height), (1, 1));
        assert_eq!(item.image.bytes, tiny_png());
    }
}

#[tokio::test]
async fn items_missing_any_field_are_skipped_without_a_fetch() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!({"item": [
            {"name": "umaibo", "url": "http://snacks.example/umaibo", "image": format!("{}/img/umaibo.png", server.uri())},
            {"name": "no-image", "url": "http://snacks.example/no-image", "image": null},
            {"url": "http://snacks.example/nameless", "image": format!("{}/img/nameless.png", server.uri())},
            {"name": "ramune", "url": "http://snacks.example/ramune", "image": format!("{}/img/ramune.png", server.uri())},
        ]}),
    )
    .await;
    // Only the two complete items may be fetched; the nameless item's
    // image stays unmounted so a stray fetch would fail the tally below.
    mount_image(&server, "/img/umaibo.png", tiny_png()).await;
    mount_image(&server, "/img/ramune.png", tiny_png()).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(record_names(&events), vec!["umaibo", "ramune"]);
    match events.last() {
        Some(EngineEvent::SearchFinished {
            outcome: Ok(tally), ..
        }) => {
            assert_eq!(tally.total_items, 4);
            assert_eq!(tally.enriched, 2);
            assert_eq!(tally.skipped, 2);
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn failed_image_fetch_skips_only_that_item() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!({"item": [
            {"name": "gone", "url": "http://snacks.example/gone", "image": format!("{}/img/gone.png", server.uri())},
            {"name": "ramune", "url": "http://snacks.example/ramune", "image": format!("{}/img/ramune.png", server.uri())},
        ]}),
    )
    .await;
    // No mount for gone.png: the mock server answers it with 404.
    mount_image(&server, "/img/ramune.png", tiny_png()).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(record_names(&events), vec!["ramune"]);
    match events.last() {
        Some(EngineEvent::SearchFinished {
            outcome: Ok(tally), ..
        }) => {
            assert_eq!(tally.enriched, 1);
            assert_eq!(tally.skipped, 1);
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_image_bytes_skip_the_item() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!({"item": [
            {"name": "broken", "url": "http://snacks.example/broken", "image": format!("{}/img/broken.png", server.uri())},
        ]}),
    )
    .await;
    mount_image(&server, "/img/broken.png", b"this is not an image".to_vec()).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert!(record_names(&events).is_empty());
    match events.last() {
        Some(EngineEvent::SearchFinished {
            outcome: Ok(tally), ..
        }) => {
            assert_eq!(tally.enriched, 0);
            assert_eq!(tally.skipped, 1);
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn zero_item_envelope_still_emits_the_clear_trigger() {
    let server = MockServer::start().await;
    mount_search(&server, json!({"item": []})).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 3, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        EngineEvent::EnvelopeDecoded {
            search_id: 3,
            item_count: 0,
        }
    ));
    assert!(matches!(
        events[1],
        EngineEvent::SearchFinished {
            search_id: 3,
            outcome: Ok(_),
        }
    ));
}

#[tokio::test]
async fn absent_item_array_behaves_like_zero_items() {
    let server = MockServer::start().await;
    mount_search(&server, json!({})).await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        EngineEvent::EnvelopeDecoded { item_count: 0, .. }
    ));
}

#[tokio::test]
async fn malformed_response_fails_the_search_without_a_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::SearchFinished {
            search_id: 1,
            outcome: Err(SearchFailure::Decode(_)),
        }
    ));
}

#[tokio::test]
async fn transport_failure_fails_the_search_without_a_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    run_search(&fetcher, 1, &format!("{}/api/", server.uri()), &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        EngineEvent::SearchFinished {
            outcome: Err(SearchFailure::Fetch(err)),
            ..
        } => assert_eq!(err.kind, FailureKind::HttpStatus(500)),
        other => panic!("unexpected event: {other:?}"),
    }
}

//! Integration tests for the chapter download pipeline.
//!
//! Pages are served by a mock HTTP server; the collection root is a temp dir.

mod support;

use std::time::Duration;

use manga_dl_core::download::{DownloadError, DownloadPipeline, HttpClient, PipelineError};
use manga_dl_core::sidecar::{SIDECAR_FILE_NAME, read_sidecar};
use tempfile::TempDir;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{RecordingObserver, StubProvider, config, remote_chapter};

/// Mock server answering every `/img/*` request with `body`.
async fn setup_image_server(body: &[u8]) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/img/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(&mock_server)
        .await;
    mock_server
}

fn pipeline(temp: &TempDir) -> DownloadPipeline {
    DownloadPipeline::new(&config(temp.path()), HttpClient::new().unwrap()).unwrap()
}

#[tokio::test]
async fn test_save_chapter_writes_every_page_in_order() {
    let server = setup_image_server(b"page bytes").await;
    let temp = TempDir::new().unwrap();
    let pipeline = pipeline(&temp);
    let base = format!("{}/img", server.uri());
    let provider = StubProvider::new(
        &base,
        &[Some("a.jpg"), Some("b.png"), Some("c.jpg"), Some("d")],
    );
    let observer = RecordingObserver::default();
    let chapter = remote_chapter("Blame", Some("1"), "2", "Net Sphere");

    let saved = pipeline
        .save_chapter(&provider, &chapter, &observer)
        .await
        .unwrap();

    let chapter_dir = temp.path().join("Blame/Volume 1/Chapter 2 - Net Sphere");
    assert_eq!(saved.path, chapter_dir);
    assert_eq!(saved.pages_written, 4);
    for name in ["001.jpg", "002.png", "003.jpg", "004.jpg"] {
        let content = std::fs::read(chapter_dir.join(name)).unwrap();
        assert_eq!(content, b"page bytes", "{name} content");
    }
    assert!(temp.path().join("Blame").join(SIDECAR_FILE_NAME).is_file());

    assert_eq!(observer.calls(), [(1, 4), (2, 4), (3, 4), (4, 4)]);
    // No pause after the last page.
    assert_eq!(pipeline.throttle().pause_count(), 3);

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, ["/img/a.jpg", "/img/b.png", "/img/c.jpg", "/img/d"]);
}

#[tokio::test]
async fn test_missing_image_stops_chapter_and_keeps_earlier_pages() {
    let server = setup_image_server(b"x").await;
    let temp = TempDir::new().unwrap();
    let pipeline = pipeline(&temp);
    let base = format!("{}/img", server.uri());
    let provider = StubProvider::new(
        &base,
        &[Some("1.jpg"), Some("2.jpg"), None, Some("4.jpg"), Some("5.jpg")],
    );
    let observer = RecordingObserver::default();
    let chapter = remote_chapter("Blame", None, "7", "Gone");

    let err = pipeline
        .save_chapter(&provider, &chapter, &observer)
        .await
        .unwrap_err();

    match err {
        PipelineError::ImageResourceUnavailable { chapter, page } => {
            assert_eq!(chapter.as_str(), "7");
            assert_eq!(page, 3);
        }
        other => panic!("expected ImageResourceUnavailable, got {other:?}"),
    }
    let chapter_dir = temp.path().join("Blame/Volume 0/Chapter 7 - Gone");
    let mut files: Vec<String> = std::fs::read_dir(&chapter_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, ["001.jpg", "002.jpg"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    assert_eq!(observer.calls(), [(1, 5), (2, 5)]);
    assert_eq!(pipeline.throttle().pause_count(), 2);
}

#[tokio::test]
async fn test_saving_twice_is_idempotent() {
    let server = setup_image_server(b"same").await;
    let temp = TempDir::new().unwrap();
    let pipeline = pipeline(&temp);
    let base = format!("{}/img", server.uri());
    let provider = StubProvider::new(&base, &[Some("1.jpg"), Some("2.jpg")]);
    let chapter = remote_chapter("Blame", Some("2"), "10.5", "Extra");

    pipeline.save_chapter(&provider, &chapter, &()).await.unwrap();
    let sidecar = temp.path().join("Blame").join(SIDECAR_FILE_NAME);
    let first = std::fs::read_to_string(&sidecar).unwrap();

    let saved = pipeline.save_chapter(&provider, &chapter, &()).await.unwrap();
    assert_eq!(saved.pages_written, 2);
    assert_eq!(std::fs::read_to_string(&sidecar).unwrap(), first);
    assert!(read_sidecar(&temp.path().join("Blame")).unwrap().is_some());

    let pages = std::fs::read_dir(&saved.path).unwrap().count();
    assert_eq!(pages, 2);
}

#[tokio::test]
async fn test_http_error_propagates_without_partial_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/img/.+$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let temp = TempDir::new().unwrap();
    let pipeline = pipeline(&temp);
    let base = format!("{}/img", mock_server.uri());
    let provider = StubProvider::new(&base, &[Some("1.jpg"), Some("2.jpg")]);
    let chapter = remote_chapter("Blame", Some("1"), "1", "Start");

    let err = pipeline
        .save_chapter(&provider, &chapter, &())
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            PipelineError::Download(DownloadError::HttpStatus { status: 404, .. })
        ),
        "unexpected error: {err:?}"
    );
    // The sidecar is written before the first page request.
    assert!(temp.path().join("Blame").join(SIDECAR_FILE_NAME).is_file());
    let chapter_dir = temp.path().join("Blame/Volume 1/Chapter 1 - Start");
    assert_eq!(std::fs::read_dir(chapter_dir).unwrap().count(), 0);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_throttle_delays_between_pages() {
    let server = setup_image_server(b"x").await;
    let temp = TempDir::new().unwrap();
    let config = config(temp.path()).with_throttle(Duration::from_millis(40));
    let pipeline = DownloadPipeline::new(&config, HttpClient::new().unwrap()).unwrap();
    let base = format!("{}/img", server.uri());
    let provider = StubProvider::new(&base, &[Some("1.jpg"), Some("2.jpg"), Some("3.jpg")]);
    let chapter = remote_chapter("Blame", None, "1", "Slow");

    let started = std::time::Instant::now();
    pipeline.save_chapter(&provider, &chapter, &()).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(80));
    assert_eq!(pipeline.throttle().pause_count(), 2);
}

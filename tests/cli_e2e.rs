//! End-to-end CLI tests for the manga-dl binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A temp workspace with a config file, an empty collection root and a
/// manifest directory.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(temp.path().join("manga")).unwrap();
        std::fs::create_dir_all(temp.path().join("manifests")).unwrap();
        let config = format!(
            r#"
[paths]
manga_dir = '{manga}'
series_dir = "{{series}}"
volume_dir = "Volume {{volume}}"
chapter_dir = "Chapter {{chapter}} - {{title}}"
page_filename = "{{page:03}}.{{ext}}"

[download]
throttle_ms = 0

[sites]
enabled = ["manifest"]
manifest_dir = '{manifests}'
"#,
            manga = temp.path().join("manga").display(),
            manifests = temp.path().join("manifests").display(),
        );
        std::fs::write(temp.path().join("config.toml"), config).unwrap();
        Self { temp }
    }

    fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    fn manga_dir(&self) -> PathBuf {
        self.temp.path().join("manga")
    }

    fn add_manifest(&self, file: &str, json: &str) {
        std::fs::write(self.temp.path().join("manifests").join(file), json).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("manga-dl").unwrap();
        cmd.arg("--config").arg(self.config_path()).arg("-q");
        cmd
    }
}

fn blame_manifest(image_base: &str, second_chapter_pages: &str) -> String {
    format!(
        r#"{{
  "title": "Blame!",
  "alt_titles": ["Burame"],
  "chapters": [
    {{ "chapter": "1", "volume": "1", "title": "Net Sphere",
       "pages": ["{image_base}/1/1.jpg", "{image_base}/1/2.jpg"] }},
    {{ "chapter": "2", "volume": "1", "title": "Safeguard",
       "pages": {second_chapter_pages} }}
  ]
}}"#
    )
}

async fn image_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .mount(&server)
        .await;
    server
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("manga-dl").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("template-organized"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("manga-dl").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("manga-dl"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("manga-dl").unwrap();
    cmd.args(["list", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("manga-dl").unwrap();
    cmd.arg("--config")
        .arg(temp.path().join("absent.toml"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_config_prints_effective_values() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("throttle_ms = 0"))
        .stdout(predicate::str::contains("page_filename = {page:03}.{ext}"));
}

#[test]
fn test_list_empty_library() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No series found"));
}

#[test]
fn test_show_unknown_series_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["show", "Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing"));
}

#[test]
fn test_search_lists_manifest_matches() {
    let ws = Workspace::new();
    ws.add_manifest("blame.json", &blame_manifest("https://img.example", "[]"));
    ws.cmd()
        .args(["search", "burame"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Blame!  (2 chapters)"))
        .stdout(predicate::str::contains("from manifest"));
}

#[test]
fn test_search_without_matches_fails() {
    let ws = Workspace::new();
    ws.add_manifest("blame.json", &blame_manifest("https://img.example", "[]"));
    ws.cmd().args(["search", "Abara"]).assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_then_list_show_and_update() {
    let server = image_server().await;
    let ws = Workspace::new();
    let base = format!("{}/img", server.uri());
    let pages = format!(r#"["{base}/2/1.png"]"#);
    ws.add_manifest("blame.json", &blame_manifest(&base, &pages));

    ws.cmd()
        .args(["download", "Blame!", "--chapter", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded 1 chapter(s) of Blame!"));
    let chapter_one = ws.manga_dir().join("Blame!/Volume 1/Chapter 1 - Net Sphere");
    assert_eq!(file_names(&chapter_one), ["001.jpg", "002.jpg"]);

    ws.cmd()
        .args(["update", "blame!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded 1 new chapter(s) of Blame!"));
    let chapter_two = ws.manga_dir().join("Blame!/Volume 1/Chapter 2 - Safeguard");
    assert_eq!(file_names(&chapter_two), ["001.png"]);

    ws.cmd()
        .args(["update", "Blame!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Blame!  (2 chapters, 3 pages)"));

    ws.cmd()
        .args(["show", "BLAME!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 2 - Safeguard  (1 pages)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_stops_on_delisted_page() {
    let server = image_server().await;
    let ws = Workspace::new();
    let base = format!("{}/img", server.uri());
    let pages = format!(r#"["{base}/2/1.jpg", null, "{base}/2/3.jpg"]"#);
    ws.add_manifest("blame.json", &blame_manifest(&base, &pages));

    ws.cmd()
        .args(["download", "Blame!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("likely delisted upstream"));

    let chapter_two = ws.manga_dir().join("Blame!/Volume 1/Chapter 2 - Safeguard");
    assert_eq!(file_names(&chapter_two), ["001.jpg"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_finds_series_whose_title_was_sanitized() {
    let server = image_server().await;
    let ws = Workspace::new();
    let base = format!("{}/img", server.uri());
    ws.add_manifest(
        "rezero.json",
        &format!(
            r#"{{
  "title": "Re: Zero",
  "chapters": [
    {{ "chapter": "1", "volume": "1", "title": "Start", "pages": ["{base}/1/1.jpg"] }},
    {{ "chapter": "2", "volume": "1", "title": "Loop", "pages": ["{base}/2/1.jpg"] }}
  ]
}}"#
        ),
    );

    ws.cmd()
        .args(["download", "Re: Zero", "-c", "1"])
        .assert()
        .success();
    assert!(ws.manga_dir().join("Re_ Zero/Volume 1/Chapter 1 - Start").is_dir());

    ws.cmd()
        .args(["update", "Re: Zero"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded 1 new chapter(s) of Re: Zero"));
    let chapter_two = ws.manga_dir().join("Re_ Zero/Volume 1/Chapter 2 - Loop");
    assert_eq!(file_names(&chapter_two), ["001.jpg"]);

    ws.cmd()
        .args(["update", "re_ zero"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Re: Zero is up to date."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_requires_confirmation() {
    let server = image_server().await;
    let ws = Workspace::new();
    let base = format!("{}/img", server.uri());
    ws.add_manifest("blame.json", &blame_manifest(&base, "[]"));
    ws.cmd()
        .args(["download", "Blame!", "-c", "1"])
        .assert()
        .success();
    let series_dir = ws.manga_dir().join("Blame!");

    ws.cmd()
        .args(["remove", "blame!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pass --yes to delete"));
    assert!(series_dir.is_dir());

    ws.cmd()
        .args(["remove", "blame!", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted Blame!"));
    assert!(!series_dir.exists());

    ws.cmd().args(["remove", "blame!", "--yes"]).assert().failure();
}

//! HTTP fetch-to-file primitive.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::DownloadError;

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/manga-dl";

/// Default User-Agent for page requests (identifies the tool).
fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("manga-dl/{version} (+{PROJECT_UA_URL})")
}

/// HTTP client that streams page images to disk.
///
/// Create once and reuse for every page of a run so connections are pooled.
/// No timeout is applied: a stalled transfer blocks until the peer gives up.
///
/// # Example
///
/// ```no_run
/// use manga_dl_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let bytes = client
///     .fetch_to_file("https://example.com/001.jpg", Path::new("./001.jpg"))
///     .await?;
/// println!("wrote {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with gzip decoding and the tool's User-Agent.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .map_err(DownloadError::Client)?;
        Ok(Self { client })
    }

    /// Downloads `url` into the file at `path`, replacing any existing file.
    ///
    /// Returns the number of bytes written. If the transfer fails after the
    /// file was created, the partial file is removed before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] if `url` does not parse
    /// - [`DownloadError::Network`] on transport failure
    /// - [`DownloadError::HttpStatus`] on a non-success response
    /// - [`DownloadError::Io`] if the file cannot be written
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let mut file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let streamed = stream_to_file(&mut file, response, url, path).await;
        match streamed {
            Ok(bytes) => {
                debug!(bytes, "page written");
                Ok(bytes)
            }
            Err(error) => {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(path).await {
                    warn!(error = %cleanup, "failed to remove partial file");
                } else {
                    debug!("removed partial file after error");
                }
                Err(error)
            }
        }
    }
}

/// Streams the response body to `file`, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| DownloadError::io(path, e))?;
    Ok(bytes_written)
}

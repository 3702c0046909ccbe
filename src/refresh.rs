//! Appendix refresh: fetch the latest S-9.2.2 Appendix A from the NMRA site.
//!
//! Off by default. The regular run works from the PDF checked into the
//! repository; the binary only calls [`refresh_appendix`] with `--refresh`.
//!
//! The local copy is replaced only when the downloaded bytes differ, so the
//! file's mtime (and any VCS diff) changes only when NMRA publishes a new
//! revision.

use crate::config::{ExtractorConfig, APPENDIX_TITLE};
use crate::error::ExtractError;
use crate::pipeline::input::is_pdf_magic;
use futures::StreamExt;
use regex::Regex;
use reqwest::Url;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 16 << 20;

/// Download progress: `(bytes_downloaded, total_bytes_if_known)`.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, Option<u64>) + Sync);

/// Result of a refresh run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Where the appendix was downloaded from.
    pub url: String,
    /// Whether the local copy was replaced.
    pub updated: bool,
}

/// Locate the appendix on the standards index page and update `config.input`.
pub async fn refresh_appendix(
    config: &ExtractorConfig,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<RefreshOutcome, ExtractError> {
    info!("Searching manufacturers list on {}", config.origin);
    let client = build_client(&config.origin, config.download_timeout_secs)?;
    let html = fetch_text(&client, &config.origin, config.download_timeout_secs).await?;
    let url = find_appendix_url(&html, &config.origin, APPENDIX_TITLE)?;

    let updated = update_local_copy(
        &url,
        &config.input,
        config.download_timeout_secs,
        on_progress,
    )
    .await?;

    Ok(RefreshOutcome { url, updated })
}

/// Find the href of the link whose text starts with `title`, resolved
/// against `base`.
pub fn find_appendix_url(html: &str, base: &str, title: &str) -> Result<String, ExtractError> {
    let pattern = format!(r#"<a[^>]+href="([^"]+)"[^>]*>{}"#, regex::escape(title));
    let re = Regex::new(&pattern).map_err(|e| ExtractError::Internal(e.to_string()))?;

    let not_found = || ExtractError::AppendixNotFound {
        title: title.to_string(),
        url: base.to_string(),
    };
    let href = re.captures(html).ok_or_else(not_found)?;

    let base = Url::parse(base).map_err(|e| ExtractError::InvalidConfig(format!(
        "origin '{base}' is not a valid URL: {e}"
    )))?;
    let resolved = base
        .join(&href[1])
        .map_err(|e| ExtractError::Internal(format!("bad appendix href '{}': {e}", &href[1])))?;

    debug!("Appendix URL: {}", resolved);
    Ok(resolved.to_string())
}

/// Download `url` and replace `path` if the content changed.
///
/// Returns `true` when the file was written. A missing local copy counts as
/// changed.
pub async fn update_local_copy(
    url: &str,
    path: &Path,
    timeout_secs: u64,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<bool, ExtractError> {
    info!("Downloading manufacturers list from {}", url);
    let client = build_client(url, timeout_secs)?;
    let bytes = download_bytes(&client, url, timeout_secs, on_progress).await?;

    if !is_pdf_magic(&bytes) {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ExtractError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    let existing = match tokio::fs::read(path).await {
        Ok(b) => Some(b),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(ExtractError::InputReadFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    if existing.as_deref() == Some(bytes.as_slice()) {
        info!("Local copy of manufacturers list is up to date");
        return Ok(false);
    }

    info!("Updating local copy of manufacturers list");
    let write_err = |source: std::io::Error| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, &bytes).await.map_err(write_err)?;
    Ok(true)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn build_client(url: &str, timeout_secs: u64) -> Result<reqwest::Client, ExtractError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

fn map_request_error(url: &str, timeout_secs: u64, e: reqwest::Error) -> ExtractError {
    if e.is_timeout() {
        ExtractError::DownloadTimeout {
            url: url.to_string(),
            secs: timeout_secs,
        }
    } else {
        ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

async fn send(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<reqwest::Response, ExtractError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| map_request_error(url, timeout_secs, e))?;

    if !response.status().is_success() {
        return Err(ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    Ok(response)
}

async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<String, ExtractError> {
    send(client, url, timeout_secs)
        .await?
        .text()
        .await
        .map_err(|e| map_request_error(url, timeout_secs, e))
}

/// Stream the body into memory, reporting progress per chunk.
async fn download_bytes(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<Vec<u8>, ExtractError> {
    let response = send(client, url, timeout_secs).await?;
    let total = response.content_length();
    // Content-Length is only a hint; a bogus value must not size the buffer.
    let mut body = Vec::with_capacity(total.unwrap_or(0).min(MAX_PREALLOC) as usize);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| map_request_error(url, timeout_secs, e))?;
        body.extend_from_slice(&chunk);
        if let Some(cb) = on_progress {
            cb(body.len() as u64, total);
        }
    }

    debug!("Downloaded {} bytes from {}", body.len(), url);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const INDEX: &str = r#"<ul>
<li><a class="doc" href="/sites/default/files/standards/sandrp/s-9.2.2.pdf">S-9.2.2, Decoder Configuration Variables</a></li>
<li><a class="doc" href="/sites/default/files/standards/sandrp/Appendix_A_S-9.2.2.pdf" target="_blank">S-9.2.2, Appendix A</a></li>
</ul>"#;

    /// Serve a single HTTP response on localhost and return its URL.
    async fn serve_once(body: &'static [u8]) -> String {
        serve_with_length(body, body.len() as u64).await
    }

    /// Like [`serve_once`], but with an arbitrary `Content-Length` header.
    async fn serve_with_length(body: &'static [u8], content_length: u64) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/appendix.pdf")
    }

    #[test]
    fn finds_relative_appendix_link() {
        let url = find_appendix_url(INDEX, crate::config::STANDARDS_URL, APPENDIX_TITLE).unwrap();
        assert_eq!(
            url,
            "https://www.nmra.org/sites/default/files/standards/sandrp/Appendix_A_S-9.2.2.pdf"
        );
    }

    #[test]
    fn keeps_absolute_appendix_link() {
        let html = r#"<a href="https://cdn.example.org/a.pdf">S-9.2.2, Appendix A (2023)</a>"#;
        let url = find_appendix_url(html, "https://www.nmra.org/", APPENDIX_TITLE).unwrap();
        assert_eq!(url, "https://cdn.example.org/a.pdf");
    }

    #[test]
    fn missing_link_is_reported() {
        let err = find_appendix_url("<p>nothing here</p>", "https://www.nmra.org/", APPENDIX_TITLE)
            .unwrap_err();
        assert!(matches!(err, ExtractError::AppendixNotFound { .. }));
    }

    #[tokio::test]
    async fn update_writes_new_copy_once() {
        const PDF: &[u8] = b"%PDF-1.5\nappendix";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs/NMRA/appendix.pdf");

        let seen = AtomicU64::new(0);
        let progress = |done: u64, _total: Option<u64>| seen.store(done, Ordering::SeqCst);

        let url = serve_once(PDF).await;
        assert!(update_local_copy(&url, &path, 10, Some(&progress)).await.unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), PDF);
        assert_eq!(seen.load(Ordering::SeqCst), PDF.len() as u64);

        let url = serve_once(PDF).await;
        assert!(!update_local_copy(&url, &path, 10, None).await.unwrap());
    }

    #[tokio::test]
    async fn html_download_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appendix.pdf");
        let url = serve_once(b"<html>moved</html>").await;

        let err = update_local_copy(&url, &path, 10, None).await.unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }), "got: {err}");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn huge_content_length_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appendix.pdf");
        let url = serve_with_length(b"%PDF-1.5\ntruncated", u64::MAX / 2).await;

        let err = update_local_copy(&url, &path, 10, None).await.unwrap_err();
        assert!(matches!(err, ExtractError::DownloadFailed { .. }), "got: {err}");
        assert!(!path.exists());
    }
}

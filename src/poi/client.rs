//! Upload client for the Proof of Invention API.
//!
//! Files are streamed to the remote service as a single multipart part. The
//! HTTP client carries no timeout: uploads may be arbitrarily large or slow
//! and are never abandoned client side.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::{
    multipart::{Form, Part},
    Body, Client,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::ToolError;

/// Multipart field name expected by the remote service.
pub const FILE_FIELD_NAME: &str = "files";
/// Content type attached to the file part.
pub const FILE_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct PoiClient {
    http: Client,
    endpoint: Url,
    token: Arc<SecretString>,
    open_streams: Arc<AtomicUsize>,
}

impl PoiClient {
    /// Creates a client from the loaded configuration.
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        // No `.timeout(..)`: large uploads must be allowed to run to completion.
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: config.api_endpoint.clone(),
            token: Arc::new(SecretString::new(
                config.api_token.expose_secret().to_string(),
            )),
            open_streams: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Number of upload streams currently holding an open file handle.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    /// Streams the file at `path` to the remote service and returns the
    /// decoded JSON body.
    pub async fn upload(&self, path: &str) -> Result<Value, ToolError> {
        let file_path = resolve_path(path)?;
        let filename = display_filename(&file_path)?;

        // Opening a FIFO without a writer blocks, so reject non-files first.
        let metadata = tokio::fs::metadata(&file_path)
            .await
            .map_err(|e| ToolError::file_access(&file_path, e))?;
        ensure_regular_file(&file_path, &metadata)?;

        let file = File::open(&file_path)
            .await
            .map_err(|e| ToolError::file_access(&file_path, e))?;
        // The path may have been swapped between the check and the open.
        let metadata = file
            .metadata()
            .await
            .map_err(|e| ToolError::file_access(&file_path, e))?;
        ensure_regular_file(&file_path, &metadata)?;
        let size = metadata.len();

        // The guard travels with the stream, so the file handle and the
        // counter are released together whenever reqwest drops the body.
        let guard = StreamGuard::acquire(&self.open_streams);
        let stream = ReaderStream::new(file).map(move |chunk| {
            let _held = &guard;
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(filename.clone())
            .mime_str(FILE_CONTENT_TYPE)?;
        let form = Form::new().part(FILE_FIELD_NAME, part);

        info!(
            path = %file_path.display(),
            filename = %filename,
            size,
            "Uploading file to Proof of Invention API"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.token.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Proof of Invention API response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Proof of Invention API rejected upload");
            return Err(ToolError::Upload(format!(
                "remote service returned {}: {}",
                status, text
            )));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ToolError::Upload(format!("invalid JSON in response body: {}", e)))
    }
}

fn resolve_path(path: &str) -> Result<PathBuf, ToolError> {
    std::path::absolute(path).map_err(|e| ToolError::file_access(path, e))
}

fn ensure_regular_file(path: &Path, metadata: &std::fs::Metadata) -> Result<(), ToolError> {
    if metadata.is_file() {
        Ok(())
    } else {
        Err(ToolError::file_access(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ))
    }
}

fn display_filename(path: &Path) -> Result<String, ToolError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ToolError::file_access(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file"),
            )
        })
}

struct StreamGuard {
    counter: Arc<AtomicUsize>,
}

impl StreamGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_are_made_absolute() {
        let resolved = resolve_path("some/dir/report.pdf").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/dir/report.pdf"));
        assert_eq!(display_filename(&resolved).unwrap(), "report.pdf");
    }

    #[test]
    fn test_path_without_file_name() {
        let err = display_filename(Path::new("/")).unwrap_err();
        assert!(matches!(err, ToolError::FileAccess { .. }));
    }

    #[test]
    fn test_stream_guard_counts() {
        let counter = Arc::new(AtomicUsize::new(0));
        let first = StreamGuard::acquire(&counter);
        let second = StreamGuard::acquire(&counter);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        drop(first);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        drop(second);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}

//! Where result documents come from.
//!
//! A [`ResultSource`] returns the raw body of the result document. Parsing and
//! normalization happen in the caller so that every source goes through the
//! same pipeline.

use crate::error::{DashError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tracing::trace;
use ureq::Agent;

/// Body equivalent to the harness answer when no run has produced a result
/// file yet.
pub const NOT_STARTED_BODY: &str = r#"{"ok": false}"#;

/// A fetchable result document.
pub trait ResultSource: Send + Sync {
    /// Fetch the raw response body.
    ///
    /// Errors are transport failures; a body that is not JSON is still `Ok`
    /// and is rejected later by the parser.
    fn fetch(&self) -> Result<String>;

    /// Short human-readable description (URL or path) for the footer.
    fn describe(&self) -> String;
}

/// Upper bound on one whole request, connect through body.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// `GET <url>` over HTTP, always bypassing caches.
pub struct HttpSource {
    url: String,
    agent: Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        // The harness may answer with a non-2xx status and still send a
        // document; read the body either way.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(HTTP_TIMEOUT))
            .build();
        Self {
            url: url.into(),
            agent: config.into(),
        }
    }
}

impl ResultSource for HttpSource {
    fn fetch(&self) -> Result<String> {
        trace!(url = %self.url, "fetching result document");
        let mut response = self
            .agent
            .get(&self.url)
            .header("Cache-Control", "no-store")
            .header("Pragma", "no-cache")
            .call()
            .map_err(|e| DashError::Transport(e.to_string()))?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| DashError::Transport(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the harness `result.json` straight from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSource for FileSource {
    fn fetch(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(body) => Ok(body),
            // Same answer the harness server gives before the first run.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(NOT_STARTED_BODY.to_string()),
            Err(e) => Err(DashError::Transport(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::parse_body;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_file_source_reads_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        fs::write(&path, r#"{"ok": true, "state": "done"}"#).unwrap();

        let source = FileSource::new(&path);
        let payload = parse_body(&source.fetch().unwrap()).unwrap();
        assert!(payload.ok);
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[test]
    fn test_file_source_missing_file_means_not_started() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("result.json"));
        let payload = parse_body(&source.fetch().unwrap()).unwrap();
        assert!(!payload.ok);
    }

    #[test]
    fn test_file_source_unreadable_path_is_transport_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let source = FileSource::new(dir.path());
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, DashError::Transport(_)));
    }

    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (format!("http://{}/result", addr), handle)
    }

    #[test]
    fn test_http_source_fetches_body_without_cache() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"ok": true}"#);
        let source = HttpSource::new(url.clone());
        let body = source.fetch().unwrap();
        assert_eq!(body, r#"{"ok": true}"#);
        assert_eq!(source.describe(), url);

        let request = server.join().unwrap().to_lowercase();
        assert!(request.starts_with("get /result"));
        assert!(request.contains("cache-control: no-store"));
    }

    #[test]
    fn test_http_source_reads_body_of_error_status() {
        let (url, server) = serve_once("HTTP/1.1 404 Not Found", r#"{"ok": false, "state": "missing"}"#);
        let body = HttpSource::new(url).fetch().unwrap();
        assert!(body.contains("missing"));
        server.join().unwrap();
    }

    #[test]
    fn test_http_source_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let source = HttpSource::new(format!("http://127.0.0.1:{}/result", port));
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, DashError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }
}

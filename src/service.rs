//! Review service: the one outbound call the app makes

use crate::constants::*;
use crate::error::ReviewError;
use crate::feedback;
use crate::settings::{ServiceMode, Settings};
use crate::types::SelectedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Send one résumé and return the feedback text (markdown).
    async fn review(&self, file: &SelectedFile, prompt: Option<&str>) -> Result<String, ReviewError>;

    /// Whether `submit` needs a non-empty prompt
    fn requires_prompt(&self) -> bool {
        false
    }
}

enum RequestKind {
    Multipart { limit: u32 },
    Prompt,
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    filename: &'a str,
    prompt: &'a str,
}

/// Talks to a real review endpoint over HTTP
pub struct HttpReviewService {
    client: reqwest::Client,
    endpoint: Url,
    kind: RequestKind,
}

impl HttpReviewService {
    fn new(endpoint: &str, kind: RequestKind, timeout: Duration) -> Result<Self, ReviewError> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| ReviewError::InvalidUrl(format!("{endpoint}: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            kind,
        })
    }

    /// PDF as multipart form data, `limit` job recommendations requested
    pub fn multipart(endpoint: &str, limit: u32, timeout: Duration) -> Result<Self, ReviewError> {
        let limit = limit.clamp(1, MAX_RECOMMENDATION_LIMIT);
        Self::new(endpoint, RequestKind::Multipart { limit }, timeout)
    }

    /// JSON `{filename, prompt}` body
    pub fn prompt(endpoint: &str, timeout: Duration) -> Result<Self, ReviewError> {
        Self::new(endpoint, RequestKind::Prompt, timeout)
    }

    fn request(&self, file: &SelectedFile, prompt: Option<&str>) -> Result<reqwest::RequestBuilder, ReviewError> {
        let builder = self.client.post(self.endpoint.clone());
        Ok(match self.kind {
            RequestKind::Multipart { limit } => {
                let part = Part::bytes(file.bytes.to_vec())
                    .file_name(file.name.clone())
                    .mime_str(PDF_MIME)?;
                builder
                    .query(&[("limit", limit)])
                    .multipart(Form::new().part(FILE_FIELD, part))
            }
            RequestKind::Prompt => builder.json(&PromptRequest {
                filename: &file.name,
                prompt: prompt.unwrap_or_default(),
            }),
        })
    }
}

#[async_trait]
impl ReviewService for HttpReviewService {
    async fn review(&self, file: &SelectedFile, prompt: Option<&str>) -> Result<String, ReviewError> {
        let started = Instant::now();
        let response = self.request(file, prompt)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReviewError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            status = %status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Review response received"
        );
        Ok(feedback::interpret(&body))
    }

    fn requires_prompt(&self) -> bool {
        matches!(self.kind, RequestKind::Prompt)
    }
}

/// Answers with canned feedback after a fixed delay, no network involved
pub struct MockReviewService {
    delay: Duration,
}

impl MockReviewService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReviewService for MockReviewService {
    async fn review(&self, file: &SelectedFile, prompt: Option<&str>) -> Result<String, ReviewError> {
        tokio::time::sleep(self.delay).await;
        let mut feedback = format!(
            "## Feedback for {}\n\n\
             - **Structure:** sections are easy to scan\n\
             - **Impact:** quantify results where you can, e.g. `reduced build time by 40%`\n\
             - **Length:** keep it to one or two pages\n\n\
             > This is a mock review. Set the service mode to Upload to use a real endpoint.",
            file.name
        );
        if let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) {
            feedback.push_str(&format!("\n\n### Your question\n\n{}", prompt.trim()));
        }
        Ok(feedback)
    }
}

/// Stands in when the configured endpoint cannot be used at all
pub struct UnavailableService {
    reason: String,
    prompt_required: bool,
}

#[async_trait]
impl ReviewService for UnavailableService {
    async fn review(&self, _file: &SelectedFile, _prompt: Option<&str>) -> Result<String, ReviewError> {
        Err(ReviewError::InvalidUrl(self.reason.clone()))
    }

    fn requires_prompt(&self) -> bool {
        self.prompt_required
    }
}

/// Build the service described by the settings. Never fails: an unusable
/// endpoint yields a service whose every call errors.
pub fn build_service(settings: &Settings) -> Arc<dyn ReviewService> {
    let built = match settings.service_mode {
        ServiceMode::Mock => return Arc::new(MockReviewService::new(settings.mock_delay())),
        ServiceMode::Multipart => HttpReviewService::multipart(
            &settings.endpoint_url,
            settings.clamped_limit(),
            settings.request_timeout(),
        ),
        ServiceMode::Prompt => {
            HttpReviewService::prompt(&settings.endpoint_url, settings.request_timeout())
        }
    };
    match built {
        Ok(service) => {
            info!(
                mode = ?settings.service_mode,
                endpoint = %settings.endpoint_url,
                "Review service configured"
            );
            Arc::new(service)
        }
        Err(e) => {
            error!(error = %e, "Review service unavailable");
            Arc::new(UnavailableService {
                reason: e.to_string(),
                prompt_required: settings.service_mode == ServiceMode::Prompt,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn resume() -> SelectedFile {
        SelectedFile::from_bytes("jane_doe.pdf", b"%PDF-1.4 fake".as_slice())
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Accept one connection, answer with `status`/`body`, hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let Some(header_end) = find(&buf, b"\r\n\r\n") else {
                    continue;
                };
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
                let length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + length {
                    break;
                }
            }
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}/upload-cv"), handle)
    }

    #[tokio::test]
    async fn multipart_upload_sends_file_field() {
        let (url, server) = serve_once("200 OK", "## Feedback\n- Good structure").await;
        let service = HttpReviewService::multipart(&url, 5, Duration::from_secs(5)).unwrap();

        let result = service.review(&resume(), None).await.unwrap();
        assert_eq!(result, "## Feedback\n- Good structure");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /upload-cv?limit=5 HTTP/1.1"));
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("multipart/form-data; boundary="));
        assert!(request.contains("name=\"file\"; filename=\"jane_doe.pdf\""));
        assert!(lower.contains("content-type: application/pdf"));
        assert!(request.contains("%PDF-1.4 fake"));
        assert!(!service.requires_prompt());
    }

    #[tokio::test]
    async fn prompt_mode_sends_json() {
        let (url, server) = serve_once("200 OK", "Looks good").await;
        let service = HttpReviewService::prompt(&url, Duration::from_secs(5)).unwrap();

        let result = service.review(&resume(), Some("Is it too long?")).await.unwrap();
        assert_eq!(result, "Looks good");

        let request = server.await.unwrap();
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#"{"filename":"jane_doe.pdf","prompt":"Is it too long?"}"#));
        assert!(service.requires_prompt());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let service = HttpReviewService::multipart(&url, 10, Duration::from_secs(5)).unwrap();

        let err = service.review(&resume(), None).await.unwrap_err();
        assert!(matches!(err, ReviewError::Status { status: 500, ref body } if body.contains("boom")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/upload-cv");
        let service = HttpReviewService::multipart(&url, 10, Duration::from_secs(5)).unwrap();
        let err = service.review(&resume(), None).await.unwrap_err();
        assert!(matches!(err, ReviewError::Http(_)));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = HttpReviewService::prompt("localhost without scheme", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ReviewError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unusable_endpoint_builds_failing_service() {
        let settings = Settings {
            endpoint_url: "::not a url::".into(),
            ..Settings::default()
        };
        let service = build_service(&settings);
        assert!(service.review(&resume(), None).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn mock_waits_for_its_delay() {
        let service = MockReviewService::new(Duration::from_millis(2000));
        let started = tokio::time::Instant::now();

        let feedback = service.review(&resume(), Some("Tone?")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert!(feedback.starts_with("## Feedback for jane_doe.pdf"));
        assert!(feedback.ends_with("### Your question\n\nTone?"));
    }
}

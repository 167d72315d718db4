//! reqwest-backed fetcher.

use super::Fetcher;
use crate::config::UpstreamSettings;
use crate::error::{preview, FetchError, Result};
use crate::events::{FetchEvent, FetchObserver};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Fetcher issuing real HTTP(S) GETs.
pub struct HttpFetcher {
    client: reqwest::Client,
    observer: Arc<dyn FetchObserver>,
}

impl HttpFetcher {
    /// Create a fetcher from upstream settings.
    pub fn new(settings: &UpstreamSettings, observer: Arc<dyn FetchObserver>) -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(settings.timeout_secs),
            Duration::from_secs(settings.connect_timeout_secs),
            &settings.user_agent,
            observer,
        )
    }

    /// Create a fetcher with explicit timeouts.
    ///
    /// `timeout` bounds the whole attempt, including reading the body.
    pub fn with_timeouts(
        timeout: Duration,
        connect_timeout: Duration,
        user_agent: &str,
        observer: Arc<dyn FetchObserver>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, observer })
    }

    fn transport_failure(&self, url: &str, error: &reqwest::Error) -> FetchError {
        let error = FetchError::Transport {
            message: describe_transport_error(error),
        };
        self.observer.observe(&FetchEvent::RequestFailed {
            url: url.to_string(),
            error: error.clone(),
        });
        error
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError> {
        self.observer.observe(&FetchEvent::RequestStarted {
            url: url.to_string(),
        });

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_failure(url, &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_failure(url, &e))?;

        self.observer.observe(&FetchEvent::ResponseReceived {
            url: url.to_string(),
            status: status.as_u16(),
            body_len: body.len(),
        });

        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            message: e.to_string(),
            preview: preview(&String::from_utf8_lossy(&body)),
        })
    }
}

/// Describe a reqwest failure including its cause chain.
fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut message = if error.is_timeout() {
        format!("timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(observer: Arc<RecordingObserver>) -> HttpFetcher {
        HttpFetcher::with_timeouts(
            Duration::from_secs(5),
            Duration::from_secs(2),
            "septa-mcp-test",
            observer,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_decodes_json_on_200() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Alerts/index.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"route_id": "generic"}])))
            .mount(&mock_server)
            .await;

        let observer = Arc::new(RecordingObserver::new());
        let document = fetcher(observer.clone())
            .fetch(&format!("{}/api/Alerts/index.php", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(document, json!([{"route_id": "generic"}]));

        let events = observer.events();
        assert!(matches!(events[0], FetchEvent::RequestStarted { .. }));
        assert!(matches!(
            events[1],
            FetchEvent::ResponseReceived { status: 200, .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_non_200_carries_status_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let result = fetcher(Arc::new(RecordingObserver::new()))
            .fetch(&mock_server.uri())
            .await;

        assert_eq!(
            result,
            Err(FetchError::HttpStatus {
                status: 503,
                body: "Service Unavailable".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_json_body_with_error_status_is_not_success() {
        // A JSON body does not rescue a non-200 status.
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no route"})))
            .mount(&mock_server)
            .await;

        let result = fetcher(Arc::new(RecordingObserver::new()))
            .fetch(&mock_server.uri())
            .await;

        assert!(matches!(result, Err(FetchError::HttpStatus { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_decode_error_with_preview() {
        let mock_server = MockServer::start().await;
        let html = format!("<html>{}</html>", "a".repeat(400));
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&mock_server)
            .await;

        let result = fetcher(Arc::new(RecordingObserver::new()))
            .fetch(&mock_server.uri())
            .await;

        match result {
            Err(FetchError::Decode { preview, .. }) => {
                assert!(preview.starts_with("<html>"));
                assert!(preview.ends_with("..."));
            }
            other => panic!("Expected Decode error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let observer = Arc::new(RecordingObserver::new());
        let fetcher = HttpFetcher::with_timeouts(
            Duration::from_millis(50),
            Duration::from_millis(50),
            "septa-mcp-test",
            observer.clone(),
        )
        .unwrap();

        let result = fetcher.fetch(&mock_server.uri()).await;
        match result {
            Err(FetchError::Transport { message }) => {
                assert!(message.contains("timed out"), "Expected timeout in: {message}");
            }
            other => panic!("Expected Transport error, got: {other:?}"),
        }
        assert!(observer
            .events()
            .iter()
            .any(|e| matches!(e, FetchEvent::RequestFailed { .. })));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        let result = fetcher(Arc::new(RecordingObserver::new()))
            .fetch("http://127.0.0.1:1/api/Alerts/index.php")
            .await;

        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}

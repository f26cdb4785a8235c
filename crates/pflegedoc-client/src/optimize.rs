//! HTTP client for submitting documentation texts to the optimization webhook.

use std::time::Duration;

use pflegedoc_core::{Config, DocumentationEntry, OptimizationResult};
use thiserror::Error;
use tracing::info;

/// Failure modes of one optimization call.
///
/// Every exit path of [`Optimize::optimize`] maps to exactly one variant, so
/// callers can match exhaustively instead of ordering catch clauses.
#[derive(Error, Debug)]
pub enum CallError {
    /// The wall-clock budget elapsed before a response arrived. The in-flight
    /// request is dropped; no partial result, no retry at this layer.
    #[error("optimization service did not respond within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// Connection, DNS, or other network-level failure.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    /// The webhook answered with a non-success status.
    #[error("webhook returned {status}: {body}")]
    Remote { status: u16, body: String },
    /// The response arrived but could not be parsed as an optimization result.
    #[error("unexpected webhook response: {0}")]
    Unexpected(String),
}

/// Seam between the session layer and the remote optimizer.
#[async_trait::async_trait]
pub trait Optimize {
    async fn optimize(&self, entry: &DocumentationEntry)
    -> Result<OptimizationResult, CallError>;
}

/// Webhook client enforcing a per-call timeout.
pub struct OptimizeClient {
    client: reqwest::Client,
    url: String,
    token: String,
    timeout_ms: u64,
}

impl OptimizeClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.webhook_url.clone(),
            token: config.auth_token.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    fn classify(&self, err: reqwest::Error) -> CallError {
        if err.is_timeout() {
            CallError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else if err.is_decode() {
            CallError::Unexpected(err.to_string())
        } else {
            CallError::Transport(err)
        }
    }
}

#[async_trait::async_trait]
impl Optimize for OptimizeClient {
    /// POST the entry to the webhook and return the result as received.
    ///
    /// One request, one timer: the per-request timeout covers connect,
    /// request, and response body. Numeric ranges in the result are not
    /// validated here.
    async fn optimize(
        &self,
        entry: &DocumentationEntry,
    ) -> Result<OptimizationResult, CallError> {
        info!(url = %self.url, level = ?entry.optimization_level, "submitting documentation for optimization");
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .timeout(Duration::from_millis(self.timeout_ms))
            .json(entry)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CallError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let result: OptimizationResult = resp.json().await.map_err(|e| self.classify(e))?;
        info!(value_increase = result.value_increase(), "optimization complete");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use pflegedoc_core::{Mode, OptimizationLevel};
    use serde_json::{Value, json};

    fn sample_entry() -> DocumentationEntry {
        DocumentationEntry {
            patient_name: "Meier".into(),
            mode: Mode::Manual,
            original_text: "Hat heute gut gegessen und war mobil.".into(),
            optimization_level: OptimizationLevel::Standard,
        }
    }

    fn client_for(url: String, timeout_ms: u64) -> OptimizeClient {
        let config = Config::new(url, "", "test-token").with_timeout_ms(timeout_ms);
        OptimizeClient::new(&config)
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/optimize")
    }

    #[derive(Clone, Default)]
    struct Seen(Arc<Mutex<Option<(String, Value)>>>);

    async fn record_and_respond(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        *seen.0.lock().unwrap() = Some((auth, body));
        Json(json!({
            "originalText": "Hat heute gut gegessen und war mobil.",
            "optimizedText": "Patient zeigte gute Nahrungsaufnahme und Mobilität.",
            "valueEstimate": {"value_before": 10, "value_after": 25},
            "mappings": [{"key": "Mobilität", "value": "gut"}]
        }))
    }

    #[tokio::test]
    async fn success_sends_wire_format_and_parses_result() {
        let seen = Seen::default();
        let app = Router::new()
            .route("/optimize", post(record_and_respond))
            .with_state(seen.clone());
        let url = serve(app).await;

        let result = client_for(url, 5_000)
            .optimize(&sample_entry())
            .await
            .unwrap();
        assert_eq!(result.value_increase(), 15.0);
        assert_eq!(result.mappings[0].key, "Mobilität");

        let (auth, body) = seen.0.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer test-token");
        assert_eq!(body["patientName"], "Meier");
        assert_eq!(body["mode"], "manual");
        assert_eq!(body["optimizationLevel"], "standard");
    }

    #[tokio::test]
    async fn non_success_status_is_remote_error() {
        let app = Router::new().route(
            "/optimize",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = serve(app).await;

        let err = client_for(url, 5_000)
            .optimize(&sample_entry())
            .await
            .unwrap_err();
        match err {
            CallError::Remote { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_unexpected_error() {
        let app = Router::new().route("/optimize", post(|| async { "not json" }));
        let url = serve(app).await;

        let err = client_for(url, 5_000)
            .optimize(&sample_entry())
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Unexpected(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let app = Router::new().route(
            "/optimize",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let url = serve(app).await;

        let err = client_for(url, 100)
            .optimize(&sample_entry())
            .await
            .unwrap_err();
        assert!(
            matches!(err, CallError::Timeout { timeout_ms: 100 }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        // Bind then drop so the port is known-closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}/optimize"), 5_000)
            .optimize(&sample_entry())
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Transport(_)), "got {err:?}");
    }
}

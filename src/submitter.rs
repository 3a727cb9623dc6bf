//! Remote task submission and response classification
//!
//! One POST per submission, no internal retries. The remote endpoint is a
//! thin proxy in front of the cloud download service and passes the wrapped
//! service's native payloads through under a 200 status, so classification
//! goes strictly by status code first, then body shape.

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::types::{MagnetUri, SubmissionOutcome};
use reqwest::StatusCode;
use reqwest::header;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Request body for the remote "create offline task" endpoint
///
/// Field names are the protocol contract with the deployed endpoint and must
/// be preserved exactly.
#[derive(Serialize)]
struct CreateTaskBody<'a> {
    file_url: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
}

/// Submits resolved magnet URIs to the remote task-management endpoint
///
/// Holds the immutable configuration snapshot and a shared, long-lived HTTP
/// client (connection pooling, keep-alive, and redirect following are
/// handled by the transport). Safe for concurrent use; submissions never
/// share mutable state.
pub struct TaskSubmitter {
    client: reqwest::Client,
    config: Arc<AdapterConfig>,
}

impl TaskSubmitter {
    /// Build a submitter and its HTTP client from a configuration snapshot
    ///
    /// # Errors
    ///
    /// Returns a network error when the TLS backend fails to initialize.
    pub fn new(config: Arc<AdapterConfig>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration snapshot this submitter was built from
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Submit one offline download task
    ///
    /// Exactly one network attempt is made; every failure mode is folded
    /// into the returned [`SubmissionOutcome`], never raised.
    pub async fn submit(&self, magnet: &MagnetUri, task_name: &str) -> SubmissionOutcome {
        if self.config.endpoint_url.trim().is_empty() || self.config.auth_token.trim().is_empty() {
            // configure() already checked this; a blank value here means the
            // snapshot was built outside the dispatcher
            return SubmissionOutcome::ProtocolError {
                cause: "endpoint URL or auth token is blank".into(),
            };
        }

        tracing::info!(
            task = task_name,
            magnet = magnet.preview(),
            "submitting offline download task"
        );

        let outcome = match self.send(magnet, task_name).await {
            Ok((status, body)) => classify_response(status, &body),
            Err(e) => SubmissionOutcome::ProtocolError {
                cause: e.to_string(),
            },
        };

        match &outcome {
            SubmissionOutcome::Accepted { task_id } => {
                tracing::info!(task = task_name, task_id, "offline download task accepted");
            }
            SubmissionOutcome::UpstreamRejected {
                error_code,
                error_description,
            } => {
                tracing::warn!(
                    task = task_name,
                    code = error_code,
                    description = error_description.as_deref().unwrap_or(""),
                    "offline download task rejected by upstream"
                );
            }
            SubmissionOutcome::ProtocolError { cause } => {
                tracing::error!(task = task_name, cause, "offline download submission failed");
            }
        }

        outcome
    }

    /// Submit one task, racing against the caller's cancellation signal
    ///
    /// Cancellation is folded into a [`SubmissionOutcome::ProtocolError`];
    /// the shared client stays usable for subsequent calls either way.
    pub async fn submit_cancellable(
        &self,
        magnet: &MagnetUri,
        task_name: &str,
        cancel: &CancellationToken,
    ) -> SubmissionOutcome {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!(task = task_name, "offline download submission cancelled by caller");
                SubmissionOutcome::ProtocolError {
                    cause: "submission cancelled by caller".into(),
                }
            }
            outcome = self.submit(magnet, task_name) => outcome,
        }
    }

    /// Perform the single POST and capture status plus raw body text
    async fn send(&self, magnet: &MagnetUri, task_name: &str) -> Result<(StatusCode, String)> {
        let body = serde_json::to_string(&CreateTaskBody {
            file_url: magnet.as_str(),
            name: task_name,
            parent_id: self.config.default_folder_id.as_deref(),
        })?;
        tracing::debug!(endpoint = %self.config.endpoint_url, body, "sending create-task request");

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.auth_token),
            )
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .timeout(self.config.request_timeout)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), body = text, "non-200 response body");
        }
        Ok((status, text))
    }
}

/// Classify a captured response into a submission outcome
///
/// Strictly status first, then body shape. Pure over its inputs so every
/// branch is testable without a server.
pub(crate) fn classify_response(status: StatusCode, body: &str) -> SubmissionOutcome {
    if status != StatusCode::OK {
        return SubmissionOutcome::ProtocolError {
            cause: format!("unexpected status {}", status.as_u16()),
        };
    }
    if body.trim().is_empty() {
        return SubmissionOutcome::ProtocolError {
            cause: "200 response with empty body".into(),
        };
    }
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            return SubmissionOutcome::ProtocolError {
                cause: format!("unparseable response body: {e}"),
            };
        }
    };

    if let Some(task) = value.get("task") {
        // success shape: {"task": {"id": "..."}} with a non-blank id
        match task.get("id").and_then(Value::as_str).map(str::trim) {
            Some(id) if !id.is_empty() => SubmissionOutcome::Accepted {
                task_id: id.to_string(),
            },
            _ => SubmissionOutcome::ProtocolError {
                cause: "success payload is missing a task id".into(),
            },
        }
    } else if value.get("error").is_some() || value.get("error_description").is_some() {
        // the proxy passes the wrapped service's error payload through
        // unchanged under a 200 status
        SubmissionOutcome::UpstreamRejected {
            error_code: value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            error_description: value
                .get("error_description")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    } else {
        SubmissionOutcome::ProtocolError {
            cause: "response matched neither success nor error shape".into(),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(endpoint: impl Into<String>) -> Arc<AdapterConfig> {
        Arc::new(AdapterConfig::new(endpoint, "secret-token"))
    }

    fn magnet() -> MagnetUri {
        MagnetUri::parse("magnet:?xt=urn:btih:deadbeef").unwrap()
    }

    // -----------------------------------------------------------------------
    // classify_response: every branch, no server needed
    // -----------------------------------------------------------------------

    #[test]
    fn classify_accepts_nested_task_with_id() {
        let outcome = classify_response(StatusCode::OK, r#"{"task":{"id":"T1"}}"#);
        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                task_id: "T1".into()
            }
        );
    }

    #[test]
    fn classify_trims_task_id() {
        let outcome = classify_response(StatusCode::OK, r#"{"task":{"id":"  T1  "}}"#);
        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                task_id: "T1".into()
            }
        );
    }

    #[test]
    fn classify_rejects_task_with_blank_id() {
        let outcome = classify_response(StatusCode::OK, r#"{"task":{"id":"   "}}"#);
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("task id")
        ));
    }

    #[test]
    fn classify_rejects_task_without_id() {
        let outcome = classify_response(StatusCode::OK, r#"{"task":{"name":"ep01"}}"#);
        assert!(matches!(outcome, SubmissionOutcome::ProtocolError { .. }));
    }

    #[test]
    fn classify_rejects_null_task_object() {
        let outcome = classify_response(StatusCode::OK, r#"{"task":null}"#);
        assert!(matches!(outcome, SubmissionOutcome::ProtocolError { .. }));
    }

    #[test]
    fn classify_maps_error_field_to_upstream_rejection() {
        let outcome = classify_response(StatusCode::OK, r#"{"error":"quota_exceeded"}"#);
        assert_eq!(
            outcome,
            SubmissionOutcome::UpstreamRejected {
                error_code: "quota_exceeded".into(),
                error_description: None,
            }
        );
    }

    #[test]
    fn classify_maps_error_description_alone_to_upstream_rejection() {
        let outcome =
            classify_response(StatusCode::OK, r#"{"error_description":"magnet invalid"}"#);
        assert_eq!(
            outcome,
            SubmissionOutcome::UpstreamRejected {
                error_code: String::new(),
                error_description: Some("magnet invalid".into()),
            }
        );
    }

    #[test]
    fn classify_prefers_success_shape_over_error_fields() {
        // a body carrying both shapes counts as success, matching the
        // remote contract's precedence
        let outcome =
            classify_response(StatusCode::OK, r#"{"task":{"id":"T9"},"error":"ignored"}"#);
        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                task_id: "T9".into()
            }
        );
    }

    #[test]
    fn classify_rejects_unexpected_shape() {
        let outcome = classify_response(StatusCode::OK, r#"{"status":"ok"}"#);
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("neither")
        ));
    }

    #[test]
    fn classify_rejects_unparseable_body() {
        let outcome = classify_response(StatusCode::OK, "<html>gateway error</html>");
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("unparseable")
        ));
    }

    #[test]
    fn classify_rejects_empty_200_body() {
        let outcome = classify_response(StatusCode::OK, "   ");
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("empty body")
        ));
    }

    #[test]
    fn classify_rejects_non_200_status_regardless_of_body() {
        let outcome =
            classify_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"task":{"id":"T1"}}"#);
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("500")
        ));

        let outcome = classify_response(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("401")
        ));
    }

    // -----------------------------------------------------------------------
    // submit: wire behavior against a mocked endpoint
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn submit_sends_contract_fields_and_returns_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(header("Content-Type", "application/json; charset=utf-8"))
            .and(body_partial_json(serde_json::json!({
                "file_url": "magnet:?xt=urn:btih:deadbeef",
                "name": "Frieren S01E05",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "task": {"id": "T1", "phase": "PHASE_TYPE_RUNNING"}
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let submitter =
            TaskSubmitter::new(config_for(format!("{}/offline", server.uri()))).unwrap();
        let outcome = submitter.submit(&magnet(), "Frieren S01E05").await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                task_id: "T1".into()
            }
        );
    }

    #[tokio::test]
    async fn submit_includes_parent_id_when_folder_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .and(body_partial_json(serde_json::json!({
                "parent_id": "VMok3xkzp"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"task": {"id": "T2"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = Arc::new(
            AdapterConfig::new(format!("{}/offline", server.uri()), "secret-token")
                .with_default_folder_id("VMok3xkzp"),
        );
        let submitter = TaskSubmitter::new(config).unwrap();
        let outcome = submitter.submit(&magnet(), "ep").await;

        assert!(outcome.is_accepted());
    }

    #[tokio::test]
    async fn submit_omits_parent_id_without_folder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"task": {"id": "T3"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let submitter =
            TaskSubmitter::new(config_for(format!("{}/offline", server.uri()))).unwrap();
        submitter.submit(&magnet(), "ep").await;

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("parent_id").is_none());
    }

    #[tokio::test]
    async fn submit_maps_upstream_error_payload_to_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "quota_exceeded",
                "error_description": "daily task limit reached"
            })))
            .mount(&server)
            .await;

        let submitter =
            TaskSubmitter::new(config_for(format!("{}/offline", server.uri()))).unwrap();
        let outcome = submitter.submit(&magnet(), "ep").await;

        assert_eq!(
            outcome,
            SubmissionOutcome::UpstreamRejected {
                error_code: "quota_exceeded".into(),
                error_description: Some("daily task limit reached".into()),
            }
        );
        assert!(!outcome.is_accepted());
    }

    #[tokio::test]
    async fn submit_maps_server_error_status_to_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let submitter =
            TaskSubmitter::new(config_for(format!("{}/offline", server.uri()))).unwrap();
        let outcome = submitter.submit(&magnet(), "ep").await;

        assert!(matches!(outcome, SubmissionOutcome::ProtocolError { .. }));
    }

    #[tokio::test]
    async fn submit_maps_connection_failure_to_protocol_error() {
        // nothing listens on this port
        let submitter = TaskSubmitter::new(config_for("http://127.0.0.1:9/offline")).unwrap();
        let outcome = submitter.submit(&magnet(), "ep").await;

        assert!(matches!(outcome, SubmissionOutcome::ProtocolError { .. }));
    }

    #[tokio::test]
    async fn submit_with_blank_snapshot_never_touches_the_network() {
        let submitter = TaskSubmitter::new(Arc::new(AdapterConfig::default())).unwrap();
        let outcome = submitter.submit(&magnet(), "ep").await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("blank")
        ));
    }

    #[tokio::test]
    async fn cancelled_submission_becomes_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"task": {"id": "T1"}}))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let submitter =
            TaskSubmitter::new(config_for(format!("{}/offline", server.uri()))).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = submitter
            .submit_cancellable(&magnet(), "ep", &cancel)
            .await;
        assert!(matches!(
            outcome,
            SubmissionOutcome::ProtocolError { cause } if cause.contains("cancelled")
        ));
    }

    #[tokio::test]
    async fn client_survives_a_cancelled_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offline"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"task": {"id": "T4"}})),
            )
            .mount(&server)
            .await;

        let submitter =
            TaskSubmitter::new(config_for(format!("{}/offline", server.uri()))).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let first = submitter.submit_cancellable(&magnet(), "ep", &cancel).await;
        assert!(!first.is_accepted());

        // same client, next call goes through
        let second = submitter.submit(&magnet(), "ep").await;
        assert!(second.is_accepted());
    }
}

//! HTTP transport for remote workers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::Payload;
use crate::orchestration::{InvocationError, InvocationRequest, WorkerInvoker};

/// Calls workers with `POST {endpoint}/execute`
#[derive(Debug, Clone, Default)]
pub struct HttpInvoker {
    client: Client,
}

impl HttpInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Deserialize)]
struct WorkerResponse {
    status: ResponseStatus,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a worker response body into its output or an invocation error
fn interpret(body: &str) -> Result<Payload, InvocationError> {
    let response: WorkerResponse =
        serde_json::from_str(body).map_err(|e| InvocationError::MalformedResponse(e.to_string()))?;

    match response.status {
        ResponseStatus::Error => Err(InvocationError::Rejected(
            response.error.unwrap_or_else(|| "no error message".to_string()),
        )),
        ResponseStatus::Success => match response.output {
            Value::Object(output) => Ok(output),
            Value::Null => Ok(Payload::new()),
            other => Err(InvocationError::MalformedResponse(format!(
                "output must be an object, got {}",
                other
            ))),
        },
    }
}

#[async_trait]
impl WorkerInvoker for HttpInvoker {
    async fn invoke(&self, endpoint: &str, request: &InvocationRequest) -> Result<Payload, InvocationError> {
        let url = format!("{}/execute", endpoint.trim_end_matches('/'));
        debug!("Invoking worker {} at {}", request.worker_id, url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| InvocationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvocationError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| InvocationError::Transport(e.to_string()))?;

        interpret(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_returns_output() {
        let output = interpret(r#"{"status": "success", "output": {"y": 2}}"#).unwrap();
        assert_eq!(output["y"], 2);
    }

    #[test]
    fn success_without_output_is_empty() {
        assert!(interpret(r#"{"status": "success"}"#).unwrap().is_empty());
    }

    #[test]
    fn error_status_is_rejected() {
        let error = interpret(r#"{"status": "error", "error": "quota exceeded"}"#).unwrap_err();
        assert!(matches!(error, InvocationError::Rejected(msg) if msg == "quota exceeded"));
    }

    #[test]
    fn malformed_bodies_are_reported() {
        for body in [
            "not json",
            r#"{"output": {}}"#,
            r#"{"status": "maybe"}"#,
            r#"{"status": "success", "output": [1, 2]}"#,
        ] {
            assert!(
                matches!(interpret(body), Err(InvocationError::MalformedResponse(_))),
                "{} should be malformed",
                body
            );
        }
    }
}

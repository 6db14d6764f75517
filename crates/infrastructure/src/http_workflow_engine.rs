use std::time::Duration;

use async_trait::async_trait;
use orbit_application::{ScheduleDeletion, WorkflowEngine, WorkflowExecution, WorkflowStartRequest};
use orbit_core::{AppError, AppResult};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

/// Connection settings for the Temporal HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalHttpConfig {
    /// Frontend HTTP endpoint, e.g. `http://temporal:7243`.
    pub base_url: Url,
    /// Namespace workflows and schedules live in.
    pub namespace: String,
    /// Task queue polled by the Orbit workers.
    pub task_queue: String,
    /// Attempts per call, including the first.
    pub max_attempts: u8,
    /// Linear backoff step between attempts.
    pub retry_backoff_ms: u64,
}

/// Workflow engine backed by the Temporal HTTP API.
pub struct HttpWorkflowEngine {
    http_client: reqwest::Client,
    config: TemporalHttpConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartWorkflowResponse {
    run_id: Option<String>,
}

enum Attempt {
    Done(reqwest::Response),
    NotFound,
}

impl HttpWorkflowEngine {
    /// Creates a new engine client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: TemporalHttpConfig) -> Self {
        Self {
            http_client,
            config: TemporalHttpConfig {
                max_attempts: config.max_attempts.max(1),
                retry_backoff_ms: config.retry_backoff_ms.max(50),
                ..config
            },
        }
    }

    fn endpoint(&self, resource: &str, id: &str) -> AppResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "temporal base url '{}' cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["api", "v1", "namespaces", self.config.namespace.as_str()])
            .extend([resource, id]);
        Ok(url)
    }

    async fn send_with_retry<F>(&self, operation: &str, mut build: F) -> AppResult<Attempt>
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.config.max_attempts {
            attempt = attempt.saturating_add(1);
            let response = build(&self.http_client).send().await;

            match response {
                Ok(response) if response.status().is_success() => {
                    return Ok(Attempt::Done(response));
                }
                Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                    return Ok(Attempt::NotFound);
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} for {operation}",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    if status == reqwest::StatusCode::CONFLICT {
                        return Err(AppError::Conflict(format!(
                            "{operation} conflicts with a running workflow: {body}"
                        )));
                    }
                    return Err(AppError::Unavailable(format!(
                        "{operation} failed with status {status}: {body}"
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("{operation} transport error: {error}"));
                }
            }

            if attempt < self.config.max_attempts {
                let backoff = self.config.retry_backoff_ms;
                let delay = backoff.saturating_mul(u64::from(attempt));
                debug!(operation, attempt, delay_ms = delay, "retrying workflow engine call");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Unavailable(last_error.unwrap_or_else(|| {
            format!("{operation} exhausted retries")
        })))
    }
}

#[async_trait]
impl WorkflowEngine for HttpWorkflowEngine {
    async fn start_workflow(&self, request: WorkflowStartRequest) -> AppResult<WorkflowExecution> {
        let url = self.endpoint("workflows", request.workflow_id.as_str())?;
        let body = json!({
            "workflowId": request.workflow_id,
            "workflowType": { "name": request.workflow_type },
            "taskQueue": { "name": self.config.task_queue },
            "input": [request.arguments],
            "requestId": request.workflow_id,
        });
        let operation = format!("start of workflow '{}'", request.workflow_id);

        let attempt = self
            .send_with_retry(operation.as_str(), |client| {
                client.post(url.clone()).json(&body)
            })
            .await?;

        let response = match attempt {
            Attempt::Done(response) => response,
            Attempt::NotFound => {
                return Err(AppError::Unavailable(format!(
                    "temporal namespace '{}' was not found",
                    self.config.namespace
                )));
            }
        };

        let started = response
            .json::<StartWorkflowResponse>()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("invalid response for {operation}: {error}"))
            })?;

        Ok(WorkflowExecution {
            workflow_id: request.workflow_id,
            run_id: started.run_id,
        })
    }

    async fn delete_schedule(&self, schedule_id: &str) -> AppResult<ScheduleDeletion> {
        let url = self.endpoint("schedules", schedule_id)?;
        let operation = format!("deletion of schedule '{schedule_id}'");

        match self
            .send_with_retry(operation.as_str(), |client| client.delete(url.clone()))
            .await?
        {
            Attempt::Done(_) => Ok(ScheduleDeletion::Deleted),
            Attempt::NotFound => Ok(ScheduleDeletion::NotFound),
        }
    }
}

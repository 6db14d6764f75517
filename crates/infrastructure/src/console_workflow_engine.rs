//! Console workflow engine for development. Accepts every call and logs it.

use async_trait::async_trait;
use orbit_application::{ScheduleDeletion, WorkflowEngine, WorkflowExecution, WorkflowStartRequest};
use orbit_core::AppResult;
use tracing::info;

/// Development workflow engine that only logs requests.
#[derive(Clone, Default)]
pub struct ConsoleWorkflowEngine;

impl ConsoleWorkflowEngine {
    /// Creates a new console workflow engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkflowEngine for ConsoleWorkflowEngine {
    async fn start_workflow(&self, request: WorkflowStartRequest) -> AppResult<WorkflowExecution> {
        info!(
            workflow_type = %request.workflow_type,
            workflow_id = %request.workflow_id,
            arguments = %request.arguments,
            "workflow start accepted by console engine"
        );

        Ok(WorkflowExecution {
            workflow_id: request.workflow_id,
            run_id: None,
        })
    }

    async fn delete_schedule(&self, schedule_id: &str) -> AppResult<ScheduleDeletion> {
        info!(schedule_id, "console engine keeps no schedules");
        Ok(ScheduleDeletion::NotFound)
    }
}

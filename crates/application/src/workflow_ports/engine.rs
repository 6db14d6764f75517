use async_trait::async_trait;
use orbit_core::AppResult;
use serde_json::Value;

/// Request to start one durable workflow execution.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStartRequest {
    /// Registered workflow type name.
    pub workflow_type: String,
    /// Caller-chosen workflow id, unique per logical operation.
    pub workflow_id: String,
    /// Single JSON argument passed to the workflow.
    pub arguments: Value,
}

/// Handle of a started workflow execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowExecution {
    /// Workflow id.
    pub workflow_id: String,
    /// Engine-assigned run id, when reported.
    pub run_id: Option<String>,
}

/// Outcome of deleting a named schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDeletion {
    /// The schedule existed and was deleted.
    Deleted,
    /// No schedule with that id exists.
    NotFound,
}

/// Port for the external durable workflow engine.
///
/// Calls return once the engine accepted the request; they never wait for
/// workflow completion.
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Starts a workflow execution.
    async fn start_workflow(&self, request: WorkflowStartRequest) -> AppResult<WorkflowExecution>;

    /// Deletes a named schedule.
    async fn delete_schedule(&self, schedule_id: &str) -> AppResult<ScheduleDeletion>;
}

mod arguments;
mod engine;

pub use arguments::{
    ACCESS_PROVISIONING_WORKFLOW, APPLICATION_DECOMMISSIONING_WORKFLOW, AccessProvisioningArguments,
    ApplicationDecommissioningArguments, cleanup_schedule_id,
};
pub use engine::{ScheduleDeletion, WorkflowEngine, WorkflowExecution, WorkflowStartRequest};

mod applications;
mod common;
mod shares;

pub use applications::{
    ApplicationLifecycleResponse, ApplicationResponse, CreateApplicationRequest,
    DecommissionApplicationRequest, ForceDeleteApplicationRequest, QuotaInfoResponse,
};
pub use common::HealthResponse;
pub use shares::{
    AccessLevelDto, ConnectionDetailsResponse, RejectTopicShareRequest, RequestTopicShareRequest,
    ShareRequestOutcomeResponse, TopicShareResponse,
};

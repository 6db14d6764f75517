//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_notification_service;
mod console_workflow_engine;
mod http_workflow_engine;
mod in_memory_orbit_repository;
mod postgres_audit_repository;
mod postgres_catalog_repository;
mod postgres_sharing_repository;
mod postgres_workspace_repository;
mod webhook_notification_service;

#[cfg(test)]
mod postgres_test_support;

pub use console_notification_service::ConsoleNotificationService;
pub use console_workflow_engine::ConsoleWorkflowEngine;
pub use http_workflow_engine::{HttpWorkflowEngine, TemporalHttpConfig};
pub use in_memory_orbit_repository::InMemoryOrbitRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_catalog_repository::PostgresCatalogRepository;
pub use postgres_sharing_repository::PostgresSharingRepository;
pub use postgres_workspace_repository::PostgresWorkspaceRepository;
pub use webhook_notification_service::WebhookNotificationService;

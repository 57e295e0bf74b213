//! ECS operations trait for testing

use super::types::{Cluster, Container, Service, Task};
use super::{EcsClient, ExecuteCommandRequest};
use crate::session::SessionHandle;
use anyhow::Result;
use std::future::Future;

/// Trait for ECS operations that can be mocked in tests.
///
/// This trait abstracts the ECS client operations to enable unit testing
/// of the discovery traversal without hitting real AWS.
pub trait EcsOperations: Send + Sync {
    /// List all clusters in the region
    fn list_clusters(&self) -> impl Future<Output = Result<Vec<Cluster>>> + Send;

    /// List the services of a cluster
    fn list_services(&self, cluster: &str) -> impl Future<Output = Result<Vec<Service>>> + Send;

    /// List the task ARNs of a cluster, optionally filtered by service
    fn list_task_arns(
        &self,
        cluster: &str,
        service: Option<&str>,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Describe a single task, resolving its task definition ARN
    fn describe_task(
        &self,
        cluster: &str,
        task_arn: &str,
    ) -> impl Future<Output = Result<Task>> + Send;

    /// List the containers defined by a task definition
    fn list_containers(
        &self,
        task_definition: &str,
    ) -> impl Future<Output = Result<Vec<Container>>> + Send;

    /// Run ecs:ExecuteCommand and return the SSM session tokens
    fn execute_command(
        &self,
        req: &ExecuteCommandRequest,
    ) -> impl Future<Output = Result<SessionHandle>> + Send;
}

impl EcsOperations for EcsClient {
    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        EcsClient::list_clusters(self).await
    }

    async fn list_services(&self, cluster: &str) -> Result<Vec<Service>> {
        EcsClient::list_services(self, cluster).await
    }

    async fn list_task_arns(&self, cluster: &str, service: Option<&str>) -> Result<Vec<String>> {
        EcsClient::list_task_arns(self, cluster, service).await
    }

    async fn describe_task(&self, cluster: &str, task_arn: &str) -> Result<Task> {
        EcsClient::describe_task(self, cluster, task_arn).await
    }

    async fn list_containers(&self, task_definition: &str) -> Result<Vec<Container>> {
        EcsClient::list_containers(self, task_definition).await
    }

    async fn execute_command(&self, req: &ExecuteCommandRequest) -> Result<SessionHandle> {
        EcsClient::execute_command(self, req).await
    }
}

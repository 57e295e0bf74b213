//! ECS discovery and exec client

pub mod operations;
pub mod types;

use crate::aws::context::AwsContext;
use crate::aws::error::classify_anyhow_error;
use crate::session::SessionHandle;
use anyhow::{Context, Result};
use aws_sdk_ecs::Client;
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{debug, warn};
use types::{resource_name_from_arn, Cluster, Container, Service, Task};

pub use operations::EcsOperations;

/// ECS client for discovering exec targets and starting exec sessions
pub struct EcsClient {
    client: Client,
}

/// Parameters for ecs:ExecuteCommand
#[derive(Debug, Clone)]
pub struct ExecuteCommandRequest {
    pub cluster: String,
    pub task: String,
    pub container: String,
    pub command: String,
}

impl EcsClient {
    /// Create a new ECS client (loads AWS config from environment)
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }

    /// Create an ECS client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ecs_client(),
        }
    }

    /// List all clusters in the region, following pagination.
    pub async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        let arns = with_throttle_retry("ListClusters", || async {
            let mut arns = Vec::new();
            let mut next_token = None;

            loop {
                let resp = self
                    .client
                    .list_clusters()
                    .set_next_token(next_token)
                    .send()
                    .await
                    .context("Failed to list clusters")?;

                arns.extend(resp.cluster_arns().iter().cloned());
                next_token = resp.next_token().map(String::from);
                if next_token.is_none() {
                    break;
                }
            }

            Ok(arns)
        })
        .await?;

        debug!(count = arns.len(), "Listed clusters");

        Ok(arns
            .iter()
            .map(|arn| Cluster {
                name: resource_name_from_arn(arn).to_string(),
            })
            .collect())
    }

    /// List the services of a cluster, following pagination.
    pub async fn list_services(&self, cluster: &str) -> Result<Vec<Service>> {
        let arns = with_throttle_retry("ListServices", || async {
            let mut arns = Vec::new();
            let mut next_token = None;

            loop {
                let resp = self
                    .client
                    .list_services()
                    .cluster(cluster)
                    .set_next_token(next_token)
                    .send()
                    .await
                    .with_context(|| format!("Failed to list services in cluster '{cluster}'"))?;

                arns.extend(resp.service_arns().iter().cloned());
                next_token = resp.next_token().map(String::from);
                if next_token.is_none() {
                    break;
                }
            }

            Ok(arns)
        })
        .await?;

        debug!(cluster = %cluster, count = arns.len(), "Listed services");

        Ok(arns
            .iter()
            .map(|arn| Service {
                name: resource_name_from_arn(arn).to_string(),
            })
            .collect())
    }

    /// List the task ARNs of a service, optionally filtered by service name.
    pub async fn list_task_arns(&self, cluster: &str, service: Option<&str>) -> Result<Vec<String>> {
        with_throttle_retry("ListTasks", || async {
            let mut arns = Vec::new();
            let mut next_token = None;

            loop {
                let resp = self
                    .client
                    .list_tasks()
                    .cluster(cluster)
                    .set_service_name(service.map(String::from))
                    .set_next_token(next_token)
                    .send()
                    .await
                    .with_context(|| format!("Failed to list tasks in cluster '{cluster}'"))?;

                arns.extend(resp.task_arns().iter().cloned());
                next_token = resp.next_token().map(String::from);
                if next_token.is_none() {
                    break;
                }
            }

            Ok(arns)
        })
        .await
    }

    /// Describe a single task, resolving its task definition ARN.
    pub async fn describe_task(&self, cluster: &str, task_arn: &str) -> Result<Task> {
        let resp = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .tasks(task_arn)
            .send()
            .await
            .with_context(|| format!("Failed to describe task '{task_arn}'"))?;

        let task = resp
            .tasks()
            .first()
            .with_context(|| format!("Task not found: {task_arn}"))?;

        let task_definition = task
            .task_definition_arn()
            .with_context(|| format!("Task definition ARN missing for task: {task_arn}"))?;

        Ok(Task {
            arn: task_arn.to_string(),
            task_definition: task_definition.to_string(),
        })
    }

    /// List the containers defined by a task definition.
    pub async fn list_containers(&self, task_definition: &str) -> Result<Vec<Container>> {
        let resp = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .with_context(|| {
                format!("Failed to describe task definition '{task_definition}'")
            })?;

        let definition = resp
            .task_definition()
            .with_context(|| format!("Task definition not returned: {task_definition}"))?;

        Ok(definition
            .container_definitions()
            .iter()
            .filter_map(|c| c.name())
            .map(|name| Container {
                name: name.to_string(),
            })
            .collect())
    }

    /// Run ecs:ExecuteCommand against a container and return the SSM session
    /// tokens needed by the session-manager-plugin.
    pub async fn execute_command(&self, req: &ExecuteCommandRequest) -> Result<SessionHandle> {
        let resp = self
            .client
            .execute_command()
            .cluster(&req.cluster)
            .task(&req.task)
            .container(&req.container)
            .command(&req.command)
            .interactive(true)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to execute command in container '{}' of task '{}'",
                    req.container, req.task
                )
            })?;

        let session = resp.session().context("No session returned by ExecuteCommand")?;

        Ok(SessionHandle {
            session_id: session.session_id().unwrap_or_default().to_string(),
            stream_url: session.stream_url().unwrap_or_default().to_string(),
            token_value: session.token_value().unwrap_or_default().to_string(),
        })
    }
}

/// Retry an operation on AWS throttling with exponential backoff.
///
/// Discovery fans out into one list call per cluster/service, which can trip
/// the ECS rate limit on large accounts.
async fn with_throttle_retry<T, F, Fut>(op: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    f.retry(
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(5),
    )
    .when(|e| classify_anyhow_error(e).is_retryable())
    .notify(|e, dur| {
        warn!(op = %op, delay = ?dur, error = %e, "Throttled by AWS, retrying...");
    })
    .await
}

//! Exec target discovery
//!
//! Walks cluster -> service -> task -> container and flattens the result
//! into selectable `ExecTarget` rows. The traversal is sequential; the lists
//! involved are small and each level depends on its parent's output.

use crate::aws::ecs::types::{Cluster, Container, ExecTarget, Service, Task};
use crate::aws::EcsOperations;
use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

/// Discover every exec target visible to the current credentials.
///
/// `cluster` restricts the traversal to a single cluster without a
/// ListClusters call. A service with no running tasks contributes no
/// targets; rows appear in discovery order.
pub async fn collect_targets<E: EcsOperations>(
    ecs: &E,
    cluster: Option<&str>,
) -> Result<Vec<ExecTarget>> {
    let clusters = match cluster {
        Some(name) => vec![Cluster {
            name: name.to_string(),
        }],
        None => ecs.list_clusters().await?,
    };

    let mut targets = Vec::new();

    for cluster in &clusters {
        let services = ecs
            .list_services(&cluster.name)
            .await
            .with_context(|| format!("Failed to list services for cluster '{}'", cluster.name))?;

        for service in &services {
            let service_targets = targets_for_service(ecs, cluster, service).await?;
            targets.extend(service_targets);
        }
    }

    debug!(count = targets.len(), "Discovered exec targets");

    Ok(targets)
}

/// Expand one cluster/service pair into its container targets.
///
/// The first task of the service represents it: replicas of a service run
/// the same task definition, so any one task names the same containers.
async fn targets_for_service<E: EcsOperations>(
    ecs: &E,
    cluster: &Cluster,
    service: &Service,
) -> Result<Vec<ExecTarget>> {
    let task_arns = ecs
        .list_task_arns(&cluster.name, Some(&service.name))
        .await
        .with_context(|| format!("Failed to list tasks for service '{}'", service.name))?;

    let tasks = describe_tasks(ecs, &cluster.name, &task_arns).await;

    let Some(task) = tasks.into_iter().next() else {
        debug!(cluster = %cluster.name, service = %service.name, "Service has no running tasks");
        return Ok(Vec::new());
    };

    let containers = ecs
        .list_containers(&task.task_definition)
        .await
        .with_context(|| {
            format!(
                "Failed to list containers for task definition '{}'",
                task.task_definition
            )
        })?;

    Ok(containers
        .into_iter()
        .map(|container| ExecTarget {
            cluster: cluster.clone(),
            service: service.clone(),
            task: task.clone(),
            container,
        })
        .collect())
}

/// Describe a batch of tasks one ARN at a time.
///
/// A task can disappear between ListTasks and DescribeTasks (deployments
/// cycle tasks constantly), so a failed describe is logged and skipped
/// rather than aborting the whole traversal.
async fn describe_tasks<E: EcsOperations>(ecs: &E, cluster: &str, task_arns: &[String]) -> Vec<Task> {
    let mut tasks = Vec::new();

    for arn in task_arns {
        match ecs.describe_task(cluster, arn).await {
            Ok(task) => tasks.push(task),
            Err(e) => {
                warn!(task = %arn, error = %e, "Failed to describe task, skipping");
            }
        }
    }

    tasks
}

/// Resolve the task to exec into for the non-interactive `exec` command.
///
/// Picks the first task listed for the cluster (optionally narrowed to a
/// service), matching the behavior of selecting a replica at random: all
/// replicas of a service are interchangeable for an exec session.
pub async fn resolve_task<E: EcsOperations>(
    ecs: &E,
    cluster: &str,
    service: Option<&str>,
) -> Result<Task> {
    let task_arns = ecs
        .list_task_arns(cluster, service)
        .await
        .with_context(|| format!("Failed to list tasks in cluster '{cluster}'"))?;

    let Some(arn) = task_arns.first() else {
        match service {
            Some(service) => bail!("No running tasks for service '{service}' in cluster '{cluster}'"),
            None => bail!("No running tasks in cluster '{cluster}'"),
        }
    };

    ecs.describe_task(cluster, arn).await
}

/// A row of the `list` command output
#[derive(Debug, Clone, serde::Serialize)]
pub struct TargetRow {
    pub cluster: String,
    pub service: String,
    pub task_definition: String,
    pub container: String,
}

impl From<&ExecTarget> for TargetRow {
    fn from(target: &ExecTarget) -> Self {
        Self {
            cluster: target.cluster.name.clone(),
            service: target.service.name.clone(),
            task_definition: crate::aws::ecs::types::resource_name_from_arn(
                &target.task.task_definition,
            )
            .to_string(),
            container: target.container.name.clone(),
        }
    }
}

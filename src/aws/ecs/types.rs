//! Value records assembled from ECS API responses
//!
//! All names are derived from ARNs: the resource name is the suffix after
//! the last `/`. An ARN without a `/` is its own name.

/// An ECS cluster, identified by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
}

/// An ECS service within a cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
}

/// A running ECS task and the task definition it was launched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub arn: String,
    pub task_definition: String,
}

/// A container defined in a task definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
}

/// One selectable exec destination: a container in a running task,
/// reached through its cluster and service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTarget {
    pub cluster: Cluster,
    pub service: Service,
    pub task: Task,
    pub container: Container,
}

impl ExecTarget {
    /// Single-line label used by the fuzzy selector and table output
    pub fn label(&self) -> String {
        format!(
            "{} {} {}",
            self.cluster.name, self.service.name, self.container.name
        )
    }
}

/// Extract the resource name from an ARN suffix.
///
/// ECS ARNs take the form `arn:aws:ecs:region:account:type/name` (tasks and
/// newer clusters add intermediate path segments); the name is always the
/// last segment.
pub fn resource_name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arn_suffix_is_resource_name() {
        assert_eq!(
            resource_name_from_arn("arn:aws:ecs:ap-northeast-1:123456789012:cluster/web"),
            "web"
        );
        assert_eq!(
            resource_name_from_arn(
                "arn:aws:ecs:ap-northeast-1:123456789012:task/web/0123456789abcdef"
            ),
            "0123456789abcdef"
        );
    }

    #[test]
    fn arn_without_slash_is_its_own_name() {
        assert_eq!(resource_name_from_arn("plain-name"), "plain-name");
        assert_eq!(resource_name_from_arn(""), "");
    }

    #[test]
    fn target_label_joins_names() {
        let target = ExecTarget {
            cluster: Cluster {
                name: "web".into(),
            },
            service: Service {
                name: "api".into(),
            },
            task: Task {
                arn: "arn:aws:ecs:ap-northeast-1:123456789012:task/web/abc".into(),
                task_definition: "api:3".into(),
            },
            container: Container {
                name: "nginx".into(),
            },
        };
        assert_eq!(target.label(), "web api nginx");
    }
}

//! ECS integration tests - actually call AWS APIs
//!
//! These tests are marked `#[ignore]` and only run with:
//! ```
//! AWS_PROFILE=your_profile AWS_REGION=your_region \
//!     cargo test --test aws_ecs_integration -- --ignored
//! ```
//!
//! They assume the account has at least one ECS cluster; tests that need a
//! running service skip themselves when none is found.

use ecsh::aws::{validate_credentials, AwsContext, EcsClient};
use ecsh::discovery::collect_targets;

fn test_region() -> String {
    std::env::var("AWS_REGION").unwrap_or_else(|_| "ap-northeast-1".to_string())
}

#[tokio::test]
#[ignore]
async fn test_credentials_resolve_to_account() {
    let ctx = AwsContext::new(&test_region()).await;
    let account = validate_credentials(&ctx)
        .await
        .expect("AWS credentials required - set AWS_PROFILE");
    assert_eq!(account.len(), 12, "Account ID should be 12 digits: {account}");
}

#[tokio::test]
#[ignore]
async fn test_list_clusters_returns_names_not_arns() {
    let client = EcsClient::new(&test_region()).await;
    let clusters = client.list_clusters().await.expect("Should list clusters");

    for cluster in &clusters {
        assert!(
            !cluster.name.starts_with("arn:"),
            "Cluster name should be parsed from the ARN, got: {}",
            cluster.name
        );
        assert!(!cluster.name.contains('/'));
    }
}

#[tokio::test]
#[ignore]
async fn test_discovery_traversal() {
    let client = EcsClient::new(&test_region()).await;

    let clusters = client.list_clusters().await.expect("Should list clusters");
    if clusters.is_empty() {
        eprintln!("No clusters in account, skipping traversal test");
        return;
    }

    let targets = collect_targets(&client, None)
        .await
        .expect("Discovery should tolerate empty services");

    // Every row must be fully populated
    for target in &targets {
        assert!(!target.cluster.name.is_empty());
        assert!(!target.service.name.is_empty());
        assert!(target.task.arn.starts_with("arn:"));
        assert!(!target.container.name.is_empty());
    }
}

#[tokio::test]
#[ignore]
async fn test_describe_task_roundtrip() {
    let client = EcsClient::new(&test_region()).await;

    let clusters = client.list_clusters().await.expect("Should list clusters");
    for cluster in &clusters {
        let arns = client
            .list_task_arns(&cluster.name, None)
            .await
            .expect("Should list tasks");

        if let Some(arn) = arns.first() {
            let task = client
                .describe_task(&cluster.name, arn)
                .await
                .expect("Should describe a listed task");
            assert_eq!(&task.arn, arn);
            assert!(task.task_definition.contains("task-definition/"));

            let containers = client
                .list_containers(&task.task_definition)
                .await
                .expect("Should list containers");
            assert!(!containers.is_empty(), "Task definition with no containers");
            return;
        }
    }

    eprintln!("No running tasks in any cluster, skipping describe test");
}

//! SSM Session Manager plugin handoff
//!
//! ecs:ExecuteCommand only returns session tokens; the interactive terminal
//! session itself is driven by the vendor-signed `session-manager-plugin`
//! binary, which receives the tokens JSON-encoded as positional arguments.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

/// Binary name of the AWS Session Manager plugin
pub const SSM_PLUGIN_BINARY: &str = "session-manager-plugin";

/// Plugin session mode for interactive sessions
const START_SESSION_ACTION: &str = "StartSession";

/// SSM session tokens returned by ecs:ExecuteCommand.
///
/// Field names must serialize in PascalCase: the plugin parses the JSON with
/// the same schema the StartSession API responds with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SessionHandle {
    pub session_id: String,
    pub stream_url: String,
    pub token_value: String,
}

/// The SSM target descriptor passed to the plugin.
///
/// For ECS exec the target is not an instance ID but the triple
/// `ecs:<cluster>_<task>_<container>`.
#[derive(Debug, Serialize)]
struct SsmTarget {
    #[serde(rename = "Target")]
    target: String,
}

/// Format the SSM target string for an ECS exec session
pub fn ecs_target(cluster: &str, task: &str, container: &str) -> String {
    format!("ecs:{cluster}_{task}_{container}")
}

/// Regional SSM endpoint the plugin connects to
pub fn ssm_endpoint(region: &str) -> String {
    format!("https://ssm.{region}.amazonaws.com")
}

/// Build the positional argument vector for the plugin invocation.
///
/// Argument order is fixed by the plugin: session JSON, region, action,
/// profile placeholder (empty, credentials were already used for the
/// ExecuteCommand call), target JSON, endpoint URL.
pub fn plugin_args(region: &str, session: &SessionHandle, target: &str) -> Result<Vec<String>> {
    let session_json =
        serde_json::to_string(session).context("Failed to serialize session tokens")?;
    let target_json = serde_json::to_string(&SsmTarget {
        target: target.to_string(),
    })
    .context("Failed to serialize SSM target")?;

    Ok(vec![
        session_json,
        region.to_string(),
        START_SESSION_ACTION.to_string(),
        String::new(),
        target_json,
        ssm_endpoint(region),
    ])
}

/// Start an interactive session by handing the tokens to the plugin.
///
/// The plugin inherits stdin/stdout/stderr and the environment; this call
/// blocks until the user ends the session.
pub async fn start_session(region: &str, session: &SessionHandle, target: &str) -> Result<()> {
    // Fail before ExecuteCommand output goes stale if the plugin is missing
    which::which(SSM_PLUGIN_BINARY).context(
        "session-manager-plugin not found in PATH. Install it from \
         https://docs.aws.amazon.com/systems-manager/latest/userguide/session-manager-working-with-install-plugin.html",
    )?;

    let args = plugin_args(region, session, target)?;

    info!(session_id = %session.session_id, target = %target, "Starting SSM session");
    debug!(region = %region, endpoint = %ssm_endpoint(region), "Invoking session-manager-plugin");

    let status = Command::new(SSM_PLUGIN_BINARY)
        .args(&args)
        .status()
        .await
        .context("Failed to spawn session-manager-plugin")?;

    if !status.success() {
        bail!(
            "session-manager-plugin exited with status {} for session {}",
            status,
            session.session_id
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> SessionHandle {
        SessionHandle {
            session_id: "ecs-execute-command-0123456789abcdef0".into(),
            stream_url: "wss://ssmmessages.ap-northeast-1.amazonaws.com/v1/data-channel/x".into(),
            token_value: "AAEAAdummy".into(),
        }
    }

    #[test]
    fn session_serializes_pascal_case() {
        let json = serde_json::to_string(&handle()).unwrap();
        assert!(json.contains("\"SessionId\""));
        assert!(json.contains("\"StreamUrl\""));
        assert!(json.contains("\"TokenValue\""));
    }

    #[test]
    fn target_string_format() {
        assert_eq!(
            ecs_target("web", "arn:aws:ecs:ap-northeast-1:123456789012:task/web/abc", "nginx"),
            "ecs:web_arn:aws:ecs:ap-northeast-1:123456789012:task/web/abc_nginx"
        );
    }

    #[test]
    fn endpoint_is_regional() {
        assert_eq!(
            ssm_endpoint("ap-northeast-1"),
            "https://ssm.ap-northeast-1.amazonaws.com"
        );
        assert_eq!(ssm_endpoint("us-east-2"), "https://ssm.us-east-2.amazonaws.com");
    }

    #[test]
    fn plugin_args_order_and_shape() {
        let args = plugin_args("ap-northeast-1", &handle(), "ecs:web_task_nginx").unwrap();

        assert_eq!(args.len(), 6);
        // session JSON first, then region, action, empty profile placeholder,
        // target JSON, endpoint
        assert!(args[0].contains("\"SessionId\""));
        assert_eq!(args[1], "ap-northeast-1");
        assert_eq!(args[2], "StartSession");
        assert_eq!(args[3], "");
        assert_eq!(args[4], r#"{"Target":"ecs:web_task_nginx"}"#);
        assert_eq!(args[5], "https://ssm.ap-northeast-1.amazonaws.com");
    }
}

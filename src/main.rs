//! ecsh: interactive exec sessions into ECS containers
//!
//! Discovers ECS clusters, services, tasks, and containers, then opens an
//! interactive session into a chosen container via SSM Session Manager.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecsh::aws::{
    classify_anyhow_error, validate_credentials, AwsContext, EcsClient, ExecuteCommandRequest,
};
use ecsh::config::{resolve_profile, SavedTargets, DEFAULT_SHELL};
use ecsh::discovery::{collect_targets, resolve_task, TargetRow};
use ecsh::select::{pick_saved, pick_target};
use ecsh::session::{ecs_target, start_session};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ecsh")]
#[command(about = "Interactive exec sessions into ECS containers via SSM")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every subcommand
#[derive(clap::Args, Debug)]
struct AwsArgs {
    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: String,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long)]
    profile: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a command in a container addressed by flags
    Exec {
        #[command(flatten)]
        aws: AwsArgs,

        /// ECS cluster name
        #[arg(long)]
        cluster: String,

        /// Service name to pick the task from
        #[arg(long)]
        service: Option<String>,

        /// Task ARN (defaults to the first task of the cluster/service)
        #[arg(long)]
        task: Option<String>,

        /// Container name
        #[arg(long)]
        container: String,

        /// Command to execute
        #[arg(long)]
        command: String,
    },

    /// Pick a container interactively and open a shell in it
    Login {
        #[command(flatten)]
        aws: AwsArgs,

        /// Restrict discovery to one cluster
        #[arg(long)]
        cluster: Option<String>,

        /// Login shell to start
        #[arg(long, default_value = DEFAULT_SHELL)]
        shell: String,
    },

    /// List discovered clusters, services, and containers
    List {
        #[command(flatten)]
        aws: AwsArgs,

        /// Restrict discovery to one cluster
        #[arg(long)]
        cluster: Option<String>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Exec into a target saved in the config file
    Select {
        #[command(flatten)]
        aws: AwsArgs,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    // Print main error message
    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    // Print error chain (causes)
    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    // Print a remediation hint for recognized AWS failures
    if let Some(suggestion) = classify_anyhow_error(e).suggestion() {
        let _ = writeln!(stderr, "\n\x1b[1mHint:\x1b[0m {suggestion}");
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Exec {
            aws,
            cluster,
            service,
            task,
            container,
            command,
        } => {
            let (ctx, ecs) = init_aws(&aws).await?;

            let task_arn = match task {
                Some(arn) => arn,
                None => {
                    resolve_task(&ecs, &cluster, service.as_deref())
                        .await?
                        .arn
                }
            };

            exec_into(&ctx, &ecs, &cluster, &task_arn, &container, &command).await
        }

        Command::Login {
            aws,
            cluster,
            shell,
        } => {
            let (ctx, ecs) = init_aws(&aws).await?;

            let targets = collect_targets(&ecs, cluster.as_deref()).await?;
            let target = pick_target(&targets)?;

            exec_into(
                &ctx,
                &ecs,
                &target.cluster.name,
                &target.task.arn,
                &target.container.name,
                &shell,
            )
            .await
        }

        Command::List {
            aws,
            cluster,
            format,
        } => {
            let (_ctx, ecs) = init_aws(&aws).await?;

            let targets = collect_targets(&ecs, cluster.as_deref()).await?;
            let rows: Vec<TargetRow> = targets.iter().map(TargetRow::from).collect();
            print_targets(&rows, &format)
        }

        Command::Select { aws } => {
            let saved = SavedTargets::load()?;
            let target = pick_saved(&saved.targets)?;

            let (ctx, ecs) = init_aws(&aws).await?;
            let task = resolve_task(&ecs, &target.cluster, target.service.as_deref()).await?;

            exec_into(
                &ctx,
                &ecs,
                &target.cluster,
                &task.arn,
                &target.container,
                &target.command,
            )
            .await
        }
    }
}

/// Resolve the profile, load AWS config, and validate credentials.
async fn init_aws(aws: &AwsArgs) -> Result<(AwsContext, EcsClient)> {
    let profile = resolve_profile(aws.profile.as_deref())?;

    let ctx = AwsContext::with_profile(&aws.region, Some(&profile)).await;
    validate_credentials(&ctx).await?;

    let ecs = EcsClient::from_context(&ctx);
    Ok((ctx, ecs))
}

/// Run ExecuteCommand and hand the session to the SSM plugin.
async fn exec_into(
    ctx: &AwsContext,
    ecs: &EcsClient,
    cluster: &str,
    task: &str,
    container: &str,
    command: &str,
) -> Result<()> {
    info!(
        cluster = %cluster,
        task = %task,
        container = %container,
        command = %command,
        "Starting exec session"
    );

    let session = ecs
        .execute_command(&ExecuteCommandRequest {
            cluster: cluster.to_string(),
            task: task.to_string(),
            container: container.to_string(),
            command: command.to_string(),
        })
        .await?;

    let target = ecs_target(cluster, task, container);
    start_session(ctx.region(), &session, &target).await
}

/// Print discovered targets as a table or JSON
fn print_targets(rows: &[TargetRow], format: &str) -> Result<()> {
    if rows.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        println!(
            "{:<25} {:<25} {:<30} {:<20}",
            "CLUSTER", "SERVICE", "TASK DEFINITION", "CONTAINER"
        );
        println!("{}", "-".repeat(100));
        for row in rows {
            println!(
                "{:<25} {:<25} {:<30} {:<20}",
                row.cluster, row.service, row.task_definition, row.container
            );
        }
        println!("\nTotal: {} containers", rows.len());
    }

    Ok(())
}

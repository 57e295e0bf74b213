//! AWS service clients

pub mod account;
pub mod context;
pub mod ecs;
pub mod error;

pub use account::{validate_credentials, AccountId};
pub use context::AwsContext;
pub use ecs::{EcsClient, EcsOperations, ExecuteCommandRequest};
pub use error::{classify_anyhow_error, classify_aws_error, AwsError};

//! Credential validation via STS

use super::context::AwsContext;
use anyhow::{Context, Result};
use tracing::debug;

/// Strongly-typed AWS account ID (12-digit string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Deref)]
pub struct AccountId(String);

/// Validate the resolved credentials and return the account they belong to.
///
/// GetCallerIdentity requires no special permissions, so a failure here means
/// the profile/credentials are wrong rather than missing IAM grants. Called
/// once before the discovery traversal so the user gets a credential error up
/// front instead of midway through the cluster fan-out.
pub async fn validate_credentials(ctx: &AwsContext) -> Result<AccountId> {
    let identity = ctx
        .sts_client()
        .get_caller_identity()
        .send()
        .await
        .context("Failed to get AWS caller identity - check AWS_PROFILE and credentials")?;

    let account = identity
        .account()
        .context("No account ID returned from STS GetCallerIdentity")?;

    debug!(account_id = %account, region = %ctx.region(), "AWS credentials validated");

    Ok(AccountId(account.to_string()))
}

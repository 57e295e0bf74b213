//! Interactive target selection

use crate::aws::ecs::types::ExecTarget;
use crate::config::SavedTarget;
use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, FuzzySelect};

/// Fuzzy-pick one discovered exec target.
///
/// Items render as "cluster service container", so typing any of the three
/// narrows the list.
pub fn pick_target(targets: &[ExecTarget]) -> Result<&ExecTarget> {
    if targets.is_empty() {
        bail!("No exec targets found - no service has a running task");
    }

    let labels: Vec<String> = targets.iter().map(|t| t.label()).collect();

    let idx = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a container (cluster service container)")
        .items(&labels)
        .default(0)
        .interact()
        .context("Selection cancelled")?;

    Ok(&targets[idx])
}

/// Fuzzy-pick one saved target by name.
pub fn pick_saved(targets: &[SavedTarget]) -> Result<&SavedTarget> {
    if targets.is_empty() {
        bail!("No saved targets configured");
    }

    let labels: Vec<String> = targets
        .iter()
        .map(|t| format!("{} ({} {} {})", t.name, t.cluster, t.container, t.command))
        .collect();

    let idx = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a saved target")
        .items(&labels)
        .default(0)
        .interact()
        .context("Selection cancelled")?;

    Ok(&targets[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_target_list_is_an_error() {
        let err = pick_target(&[]).unwrap_err();
        assert!(err.to_string().contains("No exec targets"));
    }

    #[test]
    fn empty_saved_list_is_an_error() {
        let err = pick_saved(&[]).unwrap_err();
        assert!(err.to_string().contains("No saved targets"));
    }
}

//! Configuration: defaults, profile resolution, and saved targets

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shell used by `login` when none is given
pub const DEFAULT_SHELL: &str = "sh";

/// Resolve the AWS profile to use.
///
/// The SDK would happily fall back to instance roles or bare env
/// credentials, but this tool opens interactive shells in production
/// containers; requiring an explicit profile keeps "which account am I
/// in" an answered question.
pub fn resolve_profile(flag: Option<&str>) -> Result<String> {
    if let Some(profile) = flag {
        return Ok(profile.to_string());
    }
    match std::env::var("AWS_PROFILE") {
        Ok(profile) if !profile.is_empty() => Ok(profile),
        _ => bail!("AWS_PROFILE is not set; pass --profile or export AWS_PROFILE"),
    }
}

/// A named, pre-configured exec destination for the `select` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedTarget {
    pub name: String,
    pub cluster: String,
    #[serde(default)]
    pub service: Option<String>,
    pub container: String,
    pub command: String,
}

/// Saved targets file (`targets.toml` in the platform config dir)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SavedTargets {
    #[serde(default, rename = "target")]
    pub targets: Vec<SavedTarget>,
}

impl SavedTargets {
    /// Get the path to the saved-targets file
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ecsh").map(|dirs| dirs.config_dir().join("targets.toml"))
    }

    /// Load saved targets from the default location.
    ///
    /// A missing file is an error here, not a default: `select` without any
    /// saved targets has nothing to offer the user.
    pub fn load() -> Result<Self> {
        let path =
            Self::config_path().context("Cannot determine config directory for saved targets")?;
        Self::load_from(&path)
    }

    /// Load saved targets from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "No saved targets at {} - create it with [[target]] entries",
                path.display()
            )
        })?;

        let targets: SavedTargets = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if targets.targets.is_empty() {
            bail!("{} contains no [[target]] entries", path.display());
        }

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn profile_flag_wins_over_env() {
        let profile = resolve_profile(Some("staging")).unwrap();
        assert_eq!(profile, "staging");
    }

    #[test]
    fn parse_saved_targets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[target]]
name = "api-shell"
cluster = "web"
service = "api"
container = "app"
command = "bash"

[[target]]
name = "worker-rails"
cluster = "web"
container = "worker"
command = "bin/rails c"
"#
        )
        .unwrap();

        let targets = SavedTargets::load_from(file.path()).unwrap();
        assert_eq!(targets.targets.len(), 2);
        assert_eq!(targets.targets[0].name, "api-shell");
        assert_eq!(targets.targets[0].service.as_deref(), Some("api"));
        assert_eq!(targets.targets[1].service, None);
        assert_eq!(targets.targets[1].command, "bin/rails c");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SavedTargets::load_from(Path::new("/nonexistent/targets.toml")).unwrap_err();
        assert!(err.to_string().contains("No saved targets"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = SavedTargets::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("no [[target]] entries"));
    }
}

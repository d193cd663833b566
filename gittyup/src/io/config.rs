//! Settings stored in `.gittyup.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// File name looked up in the repository directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".gittyup.toml";

/// Settings (TOML). Missing fields take their defaults.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Remote that Simple-Push targets.
    pub remote: String,

    /// Program invoked for every git operation.
    pub git_binary: String,

    /// Render a fresh status after a successful commit.
    pub status_after_commit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            git_binary: "git".to_string(),
            status_after_commit: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(anyhow!("remote must be non-empty"));
        }
        if self.git_binary.trim().is_empty() {
            return Err(anyhow!("git_binary must be non-empty"));
        }
        Ok(())
    }
}

/// Load settings from a TOML file.
///
/// If the file is missing, returns `Settings::default()`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.remote, "origin");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "remote = \"upstream\"\n").expect("write");
        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.remote, "upstream");
        assert_eq!(settings.git_binary, "git");
        assert!(!settings.status_after_commit);
    }

    #[test]
    fn empty_remote_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "remote = \"  \"\n").expect("write");
        let err = load_settings(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("remote must be non-empty"));
    }
}

//! Configuration for the target repository and replay behavior
//!
//! All settings live in an explicit [`Config`] value handed to the
//! components that need it; nothing reads process-wide state. The file is
//! optional: a missing path yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::levels::LevelMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository in which replayed commits are created.
    pub repo_path: PathBuf,
    /// Branch pushed after the replay.
    pub branch: String,
    /// Remote pushed to after the replay.
    pub remote: String,
    /// File appended to once per replayed commit, relative to the work tree.
    pub tracking_file: String,
    /// Commit counts for levels 1 through 4.
    pub levels: LevelMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            branch: "main".to_string(),
            remote: "origin".to_string(),
            tracking_file: "canvas.txt".to_string(),
            levels: LevelMap::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paging::PagingConfig;
use crate::repositories::photo::RepositoryOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedConfiguration {
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub repository: RepositoryOptions,
}

impl FeedConfiguration {
    pub const FILE_NAME: &'static str = "feed.config.json";
    pub const PATH_VARIABLE: &'static str = "PHOTO_FEED_CONFIG";

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid feed configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Reads the file named by `PHOTO_FEED_CONFIG`, else the first
    /// `feed.config.json` found in the working directory or next to the
    /// executable (where `build.rs` copies it). A missing default file
    /// yields defaults; a missing file named by the variable is an error.
    pub fn load_default() -> Result<Self> {
        if let Ok(path) = env::var(Self::PATH_VARIABLE) {
            return Self::load(Path::new(&path));
        }

        let mut dirs = vec![PathBuf::from(".")];
        if let Some(exe_dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs.push(exe_dir);
        }
        Self::load_from_dirs(&dirs)
    }

    /// Loads `feed.config.json` from the first directory that has one, or
    /// defaults when none does.
    pub fn load_from_dirs(dirs: &[PathBuf]) -> Result<Self> {
        match dirs
            .iter()
            .map(|dir| dir.join(Self::FILE_NAME))
            .find(|path| path.is_file())
        {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            None => {
                log::debug!("{} not found, using defaults", Self::FILE_NAME);
                Ok(Self::default())
            }
        }
    }
}

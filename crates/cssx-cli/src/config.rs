//! `cssx.json` project settings.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "cssx.json";

/// Project layout read from `cssx.json`. Keys are camelCase; every key is
/// optional and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Dev server port. Kept for compatibility with existing project files.
    pub port: u16,
    pub route_dir: PathBuf,
    /// Route whose page is also written as `index.html`.
    pub default_route: String,
    pub output_dir: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub template: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            route_dir: PathBuf::from("./routes"),
            default_route: "/home".to_string(),
            output_dir: PathBuf::from("./dist"),
            assets_dir: None,
            template: PathBuf::from("index.html"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ProjectConfig {
    /// Load `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no project file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(&text).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// File stem of the default route, `"/home"` → `"home"`.
    pub fn default_route_name(&self) -> &str {
        self.default_route.trim_matches('/')
    }
}

//! Engine bootstrap configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Arguments passed to `libvlc_new` when none are configured.
pub const DEFAULT_ARGS: &[&str] = &[
    "-I",
    "dummy",
    "--ignore-config",
    "--no-osd",
    "--disable-screensaver",
    "--ffmpeg-hw",
    "--plugin-path=./plugins",
];

/// How to load and boot the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Forwarded verbatim, in order, to `libvlc_new`.
    pub args: Vec<String>,
    /// Directory made current while the engine boots, so relative plugin
    /// paths in `args` resolve against it.
    pub module_path: Option<PathBuf>,
    /// Explicit libvlc to load instead of the platform default name.
    pub library_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            module_path: None,
            library_path: None,
        }
    }
}

impl EngineConfig {
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidArgument {
            param: "config",
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

//! 项目目录下可选的 `distframe.json`
//!
//! 优先级位于内置默认值之上、环境变量之下。

use serde::Deserialize;
use std::path::Path;

use super::schema::{ConfigError, EmbedMode, Layout};

pub const CONFIG_FILE_NAME: &str = "distframe.json";

/// File-level overrides. Every field is optional; unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub build_dir: Option<String>,
    pub manifest: Option<String>,
    pub entry_file: Option<String>,
    pub install_cmd: Option<String>,
    pub build_cmd: Option<String>,
    pub remote_url: Option<String>,
    pub remote_timeout_ms: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub poll_attempts: Option<u32>,
    pub poll_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub embed_mode: Option<EmbedMode>,
    pub frame_height: Option<u32>,
    pub scrolling: Option<bool>,
    pub page_title: Option<String>,
    pub layout: Option<Layout>,
}

impl FileConfig {
    /// Load `distframe.json` from `dir`. A missing file yields the empty config.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let cfg: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        tracing::debug!(dir = %dir.display(), "Loaded {}", CONFIG_FILE_NAME);
        Ok(cfg)
    }
}

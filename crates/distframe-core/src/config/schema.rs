//! 按领域分组的配置结构体
//!
//! 优先级：内置默认值 < `distframe.json` < 环境变量 < CLI（由调用方覆盖）。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::env_keys::{
    build as build_keys, embed as embed_keys, observability as obv_keys, poll as poll_keys,
    project as project_keys, serve as serve_keys,
};
use super::file::FileConfig;
use super::loader::{env_bool, env_or, parse_bool};

pub const DEFAULT_BUILD_DIR: &str = "dist";
pub const DEFAULT_MANIFEST: &str = "package.json";
pub const DEFAULT_ENTRY_FILE: &str = "index.html";
pub const DEFAULT_INSTALL_CMD: &str = "npm install --silent";
pub const DEFAULT_BUILD_CMD: &str = "npm run build --silent";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;
pub const DEFAULT_FRAME_HEIGHT: u32 = 900;
pub const DEFAULT_PAGE_TITLE: &str = "distframe";

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// How the built app is shown inside the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedMode {
    /// Reference a served URL from a sandboxed inline frame.
    #[default]
    Iframe,
    /// Inject the entry file's markup directly; no server is involved.
    #[serde(alias = "raw_html")]
    RawHtml,
}

impl FromStr for EmbedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "iframe" | "frame" => Ok(Self::Iframe),
            "raw-html" | "raw_html" | "html" => Ok(Self::RawHtml),
            other => Err(format!("unknown embed mode '{}'", other)),
        }
    }
}

impl fmt::Display for EmbedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iframe => f.write_str("iframe"),
            Self::RawHtml => f.write_str("raw-html"),
        }
    }
}

/// Host page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    Wide,
    Centered,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wide" => Ok(Self::Wide),
            "centered" | "centred" => Ok(Self::Centered),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

/// 项目目录与构建产物路径
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub project_dir: PathBuf,
    /// Build output directory, already joined onto `project_dir`.
    pub build_dir: PathBuf,
    /// Build manifest marker, already joined onto `project_dir`.
    pub manifest: PathBuf,
    /// Entry file name inside `build_dir`.
    pub entry_file: String,
}

impl ProjectConfig {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            build_dir: project_dir.join(DEFAULT_BUILD_DIR),
            manifest: project_dir.join(DEFAULT_MANIFEST),
            entry_file: DEFAULT_ENTRY_FILE.to_string(),
            project_dir,
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.build_dir.join(&self.entry_file)
    }
}

/// 外部构建命令（依赖安装 + 构建）
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub install_cmd: String,
    pub build_cmd: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            install_cmd: DEFAULT_INSTALL_CMD.to_string(),
            build_cmd: DEFAULT_BUILD_CMD.to_string(),
        }
    }
}

/// 本地静态服务与远程发布地址
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    /// 0 binds an ephemeral port.
    pub port: u16,
    pub remote_url: Option<String>,
    pub remote_timeout: Duration,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            remote_url: None,
            remote_timeout: Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
        }
    }
}

/// Readiness poll budget. Worst case wall clock is roughly
/// `attempts * (timeout + interval)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub attempts: u32,
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_POLL_ATTEMPTS,
            timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PollConfig {
    pub fn worst_case(&self) -> Duration {
        (self.timeout + self.interval) * self.attempts
    }
}

/// 宿主页面与嵌入方式
#[derive(Debug, Clone)]
pub struct EmbedConfig {
    pub mode: EmbedMode,
    pub frame_height: u32,
    pub scrolling: bool,
    pub page_title: String,
    pub layout: Layout,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mode: EmbedMode::default(),
            frame_height: DEFAULT_FRAME_HEIGHT,
            scrolling: true,
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            layout: Layout::default(),
        }
    }
}

/// The fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct DistframeConfig {
    pub project: ProjectConfig,
    pub build: BuildConfig,
    pub serve: ServeConfig,
    pub poll: PollConfig,
    pub embed: EmbedConfig,
}

impl DistframeConfig {
    /// Defaults only, rooted at `project_dir`.
    pub fn with_project_dir(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project: ProjectConfig::new(project_dir),
            build: BuildConfig::default(),
            serve: ServeConfig::default(),
            poll: PollConfig::default(),
            embed: EmbedConfig::default(),
        }
    }

    /// 从 `.env`、`distframe.json` 与进程环境变量加载
    pub fn load(project_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        super::loader::load_dotenv();
        let env = |key: &str| std::env::var(key).ok();
        let project_dir = project_dir
            .or_else(|| {
                env(project_keys::DISTFRAME_PROJECT_DIR)
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from("."));
        let file = FileConfig::load_from_dir(&project_dir)?;
        Self::from_layers(project_dir, &file, env)
    }

    /// Merge defaults, file values and an environment lookup.
    pub fn from_layers<F>(
        project_dir: PathBuf,
        file: &FileConfig,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layers = Layers { env };

        let build_dir = layers.string(
            project_keys::DISTFRAME_BUILD_DIR,
            file.build_dir.as_deref(),
            DEFAULT_BUILD_DIR,
        );
        let manifest = layers.string(
            project_keys::DISTFRAME_MANIFEST,
            file.manifest.as_deref(),
            DEFAULT_MANIFEST,
        );
        let entry_file = layers.string(
            project_keys::DISTFRAME_ENTRY_FILE,
            file.entry_file.as_deref(),
            DEFAULT_ENTRY_FILE,
        );
        let project = ProjectConfig {
            build_dir: project_dir.join(build_dir),
            manifest: project_dir.join(manifest),
            entry_file,
            project_dir,
        };

        let build = BuildConfig {
            install_cmd: layers.string(
                build_keys::DISTFRAME_INSTALL_CMD,
                file.install_cmd.as_deref(),
                DEFAULT_INSTALL_CMD,
            ),
            build_cmd: layers.string(
                build_keys::DISTFRAME_BUILD_CMD,
                file.build_cmd.as_deref(),
                DEFAULT_BUILD_CMD,
            ),
        };

        let serve = ServeConfig {
            host: layers.string(serve_keys::DISTFRAME_HOST, file.host.as_deref(), DEFAULT_HOST),
            port: layers.parsed(serve_keys::DISTFRAME_PORT, file.port, DEFAULT_PORT)?,
            remote_url: layers
                .raw(serve_keys::DISTFRAME_REMOTE_URL)
                .or_else(|| file.remote_url.clone())
                .filter(|s| !s.trim().is_empty()),
            remote_timeout: Duration::from_millis(layers.positive(
                serve_keys::DISTFRAME_REMOTE_TIMEOUT_MS,
                file.remote_timeout_ms,
                DEFAULT_REMOTE_TIMEOUT_MS,
            )?),
        };

        let poll = PollConfig {
            attempts: layers.positive(
                poll_keys::DISTFRAME_POLL_ATTEMPTS,
                file.poll_attempts,
                DEFAULT_POLL_ATTEMPTS,
            )?,
            timeout: Duration::from_millis(layers.positive(
                poll_keys::DISTFRAME_POLL_TIMEOUT_MS,
                file.poll_timeout_ms,
                DEFAULT_POLL_TIMEOUT_MS,
            )?),
            interval: Duration::from_millis(layers.parsed(
                poll_keys::DISTFRAME_POLL_INTERVAL_MS,
                file.poll_interval_ms,
                DEFAULT_POLL_INTERVAL_MS,
            )?),
        };

        let embed = EmbedConfig {
            mode: layers.parsed(
                embed_keys::DISTFRAME_EMBED_MODE,
                file.embed_mode,
                EmbedMode::default(),
            )?,
            frame_height: layers.parsed(
                embed_keys::DISTFRAME_FRAME_HEIGHT,
                file.frame_height,
                DEFAULT_FRAME_HEIGHT,
            )?,
            scrolling: layers.boolean(embed_keys::DISTFRAME_SCROLLING, file.scrolling, true)?,
            page_title: layers.string(
                embed_keys::DISTFRAME_PAGE_TITLE,
                file.page_title.as_deref(),
                DEFAULT_PAGE_TITLE,
            ),
            layout: layers.parsed(embed_keys::DISTFRAME_LAYOUT, file.layout, Layout::default())?,
        };

        Ok(Self {
            project,
            build,
            serve,
            poll,
            embed,
        })
    }
}

struct Layers<F> {
    env: F,
}

impl<F> Layers<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn string(&self, key: &str, file: Option<&str>, default: &str) -> String {
        self.raw(key)
            .or_else(|| file.map(str::to_string))
            .unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: FromStr>(&self, key: &str, file: Option<T>, default: T) -> Result<T, ConfigError> {
        match self.raw(key) {
            Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
            None => Ok(file.unwrap_or(default)),
        }
    }

    /// 同 `parsed`，但 0 视为非法（探测次数与超时不能为 0）
    fn positive<T>(&self, key: &str, file: Option<T>, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Default + PartialEq + ToString,
    {
        let value = self.parsed(key, file, default)?;
        if value == T::default() {
            return Err(ConfigError::Invalid {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    fn boolean(&self, key: &str, file: Option<bool>, default: bool) -> Result<bool, ConfigError> {
        match self.raw(key) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
            None => Ok(file.unwrap_or(default)),
        }
    }
}

/// 可观测性配置：quiet、log_level、log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::DISTFRAME_QUIET, false),
                log_level: env_or(obv_keys::DISTFRAME_LOG_LEVEL, || "distframe=info".to_string()),
                log_json: env_bool(obv_keys::DISTFRAME_LOG_JSON, false),
            }
        })
    }
}

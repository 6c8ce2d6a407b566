//! 环境变量 key 常量
//!
//! 全部使用 `DISTFRAME_*` 前缀；CLI 的 `env` 属性引用同一组常量。

/// 项目目录与构建产物
pub mod project {
    pub const DISTFRAME_PROJECT_DIR: &str = "DISTFRAME_PROJECT_DIR";
    pub const DISTFRAME_BUILD_DIR: &str = "DISTFRAME_BUILD_DIR";
    pub const DISTFRAME_MANIFEST: &str = "DISTFRAME_MANIFEST";
    pub const DISTFRAME_ENTRY_FILE: &str = "DISTFRAME_ENTRY_FILE";
}

/// 外部构建命令
pub mod build {
    pub const DISTFRAME_INSTALL_CMD: &str = "DISTFRAME_INSTALL_CMD";
    pub const DISTFRAME_BUILD_CMD: &str = "DISTFRAME_BUILD_CMD";
}

/// 本地静态服务与远程地址
pub mod serve {
    pub const DISTFRAME_REMOTE_URL: &str = "DISTFRAME_REMOTE_URL";
    pub const DISTFRAME_REMOTE_TIMEOUT_MS: &str = "DISTFRAME_REMOTE_TIMEOUT_MS";
    pub const DISTFRAME_HOST: &str = "DISTFRAME_HOST";
    pub const DISTFRAME_PORT: &str = "DISTFRAME_PORT";
}

/// Readiness poll budget
pub mod poll {
    pub const DISTFRAME_POLL_ATTEMPTS: &str = "DISTFRAME_POLL_ATTEMPTS";
    pub const DISTFRAME_POLL_TIMEOUT_MS: &str = "DISTFRAME_POLL_TIMEOUT_MS";
    pub const DISTFRAME_POLL_INTERVAL_MS: &str = "DISTFRAME_POLL_INTERVAL_MS";
}

/// 宿主页面与嵌入方式
pub mod embed {
    /// `iframe`（默认）或 `raw-html`
    pub const DISTFRAME_EMBED_MODE: &str = "DISTFRAME_EMBED_MODE";
    pub const DISTFRAME_FRAME_HEIGHT: &str = "DISTFRAME_FRAME_HEIGHT";
    pub const DISTFRAME_SCROLLING: &str = "DISTFRAME_SCROLLING";
    pub const DISTFRAME_PAGE_TITLE: &str = "DISTFRAME_PAGE_TITLE";
    /// `wide`（默认）或 `centered`
    pub const DISTFRAME_LAYOUT: &str = "DISTFRAME_LAYOUT";
}

/// 可观测性与日志
pub mod observability {
    pub const DISTFRAME_QUIET: &str = "DISTFRAME_QUIET";
    pub const DISTFRAME_LOG_LEVEL: &str = "DISTFRAME_LOG_LEVEL";
    pub const DISTFRAME_LOG_JSON: &str = "DISTFRAME_LOG_JSON";
}

//! distframe 统一配置层
//!
//! 所有环境变量读取集中在此模块，组件只接收显式传入的配置值，不读取全局常量。
//!
//! - `loader`：load_dotenv、env_or、env_optional、env_bool 等辅助函数
//! - `schema`：ProjectConfig、BuildConfig、ServeConfig、PollConfig、EmbedConfig
//! - `file`：项目目录下可选的 `distframe.json`
//! - `env_keys`：key 常量

pub mod env_keys;
pub mod file;
pub mod loader;
pub mod schema;

pub use file::{FileConfig, CONFIG_FILE_NAME};
pub use loader::{env_bool, env_optional, env_or, load_dotenv, load_dotenv_from_dir};
pub use schema::{
    BuildConfig, ConfigError, DistframeConfig, EmbedConfig, EmbedMode, Layout,
    ObservabilityConfig, PollConfig, ProjectConfig, ServeConfig,
};

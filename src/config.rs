use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusterConfig {
    /// 已知服务器列表（ip:port）
    #[serde(default)]
    pub servers: Vec<String>,
    /// 对账队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamingConfig {
    /// 请求未指定命名空间时使用
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// 接口路由前缀
    #[serde(default = "default_context_path")]
    pub context_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            context_path: default_context_path(),
        }
    }
}

fn default_context_path() -> String {
    "/nacos/v1/ns".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("failed to parse config file {}", path))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

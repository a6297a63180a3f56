//! 集群成员

use crate::config::ClusterConfig;

/// 已知服务器列表
pub trait ServerMembership: Send + Sync {
    /// 地址是否属于已知服务器
    fn contains(&self, address: &str) -> bool;
}

/// 由配置给出的静态服务器列表
#[derive(Debug, Clone, Default)]
pub struct StaticServerList {
    servers: Vec<String>,
}

impl StaticServerList {
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn servers(&self) -> &[String] {
        &self.servers
    }
}

impl From<&ClusterConfig> for StaticServerList {
    fn from(config: &ClusterConfig) -> Self {
        Self::new(config.servers.iter().map(|s| s.trim()).filter(|s| !s.is_empty()))
    }
}

impl ServerMembership for StaticServerList {
    /// 与列表项完全相等，或等于列表项的主机部分（`ip:port` 中的 `ip`）
    fn contains(&self, address: &str) -> bool {
        let address = address.trim();
        if address.is_empty() {
            return false;
        }
        self.servers.iter().any(|server| {
            server == address
                || server
                    .rsplit_once(':')
                    .map(|(host, _)| host == address)
                    .unwrap_or(false)
        })
    }
}

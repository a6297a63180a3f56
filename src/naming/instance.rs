//! 服务实例定义

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 服务实例
///
/// 实例只属于一个服务，本模块对其只读
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// 实例 IP
    pub ip: String,

    /// 实例端口
    pub port: u16,

    /// 所属集群
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,

    /// 权重
    #[serde(default = "default_weight")]
    pub weight: f64,

    /// 是否健康
    #[serde(default = "default_healthy")]
    pub healthy: bool,

    /// 元数据
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

fn default_cluster_name() -> String {
    "DEFAULT".to_string()
}

fn default_weight() -> f64 {
    1.0
}

fn default_healthy() -> bool {
    true
}

impl Instance {
    /// 创建新的服务实例
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
            cluster_name: default_cluster_name(),
            weight: default_weight(),
            healthy: true,
            metadata: HashMap::new(),
        }
    }

    /// 设置集群
    pub fn with_cluster(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    /// 设置权重
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// 设置健康状态
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 实例地址标识（ip:port）
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// 元数据中 `key` 的值是否恰好等于 `value`
    pub fn metadata_matches(&self, key: &str, value: &str) -> bool {
        self.metadata.get(key).map(|v| v == value).unwrap_or(false)
    }

    /// 实例的规范化表示，参与服务校验和计算
    ///
    /// 每个字段写成 `长度:内容`，元数据按键排序，与 HashMap 的迭代顺序无关
    pub fn fingerprint(&self) -> String {
        let metadata: BTreeMap<&str, &str> = self
            .metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut out = String::new();
        push_field(&mut out, &self.address());
        push_field(&mut out, &self.weight.to_string());
        push_field(&mut out, if self.healthy { "true" } else { "false" });
        push_field(&mut out, &self.cluster_name);
        push_field(&mut out, &metadata.len().to_string());
        for (key, value) in metadata {
            push_field(&mut out, key);
            push_field(&mut out, value);
        }
        out
    }
}

fn push_field(out: &mut String, field: &str) {
    out.push_str(&field.len().to_string());
    out.push(':');
    out.push_str(field);
}

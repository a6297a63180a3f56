//! 服务定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{NamingError, Result};
use crate::naming::checksum::ChecksumEngine;
use crate::naming::instance::Instance;
use crate::naming::selector::Selector;

/// 服务
///
/// 由 `(namespace_id, name)` 唯一标识，记录本身归注册表所有
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// 命名空间
    pub namespace_id: String,

    /// 服务名
    pub name: String,

    /// 保护阈值
    #[serde(default)]
    pub protect_threshold: f32,

    /// 健康检查模式（小写）
    #[serde(default = "default_health_check_mode")]
    pub health_check_mode: String,

    /// 服务元数据
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// 选择器
    #[serde(default)]
    pub selector: Selector,

    /// 缓存的校验和
    #[serde(default)]
    pub checksum: String,

    /// 最后修改时间（毫秒）
    #[serde(default)]
    pub last_modified_millis: i64,

    /// 实例列表
    #[serde(default)]
    pub instances: Vec<Instance>,
}

fn default_health_check_mode() -> String {
    "client".to_string()
}

impl Service {
    /// 创建新的服务
    pub fn new(namespace_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace_id: namespace_id.into(),
            name: name.into(),
            protect_threshold: 0.0,
            health_check_mode: default_health_check_mode(),
            metadata: HashMap::new(),
            selector: Selector::None,
            checksum: String::new(),
            last_modified_millis: 0,
            instances: Vec::new(),
        }
    }

    /// 设置保护阈值
    pub fn with_protect_threshold(mut self, protect_threshold: f32) -> Self {
        self.protect_threshold = protect_threshold;
        self
    }

    /// 设置健康检查模式
    pub fn with_health_check_mode(mut self, mode: impl AsRef<str>) -> Self {
        self.set_health_check_mode(mode);
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 添加实例
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    /// 从选择器文档设置选择器
    pub fn with_selector_document(mut self, document: &str) -> Result<Self> {
        self.selector = Selector::parse(document)?;
        Ok(self)
    }

    /// 设置健康检查模式，统一转换为小写
    pub fn set_health_check_mode(&mut self, mode: impl AsRef<str>) {
        self.health_check_mode = mode.as_ref().to_lowercase();
    }

    /// 校验记录是否合法
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(NamingError::invalid_parameter("service name is blank"));
        }
        if self.protect_threshold.is_nan() || self.protect_threshold < 0.0 {
            return Err(NamingError::invalid_parameter(format!(
                "protectThreshold must be >= 0, got {}",
                self.protect_threshold
            )));
        }
        Ok(())
    }

    /// 重新计算校验和并写回 `checksum`
    pub fn recalculate_checksum(&mut self) -> &str {
        ChecksumEngine::new().recalculate(self)
    }

    /// 任一实例的元数据中 `key` 恰好等于 `value`
    pub fn any_instance_matches(&self, key: &str, value: &str) -> bool {
        self.instances.iter().any(|i| i.metadata_matches(key, value))
    }

    /// 服务元数据中 `key` 恰好等于 `value`
    pub fn metadata_matches(&self, key: &str, value: &str) -> bool {
        self.metadata.get(key).map(|v| v == value).unwrap_or(false)
    }
}

/// 解析 `k1=v1,k2=v2` 形式的元数据
///
/// 空白输入返回空集合；缺少 `=` 的条目视为参数错误
pub fn parse_metadata(text: &str) -> Result<HashMap<String, String>> {
    let mut metadata = HashMap::new();
    if text.trim().is_empty() {
        return Ok(metadata);
    }

    for entry in text.split(',') {
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            NamingError::invalid_parameter(format!("metadata entry should be key=value: {}", entry))
        })?;
        metadata.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(metadata)
}

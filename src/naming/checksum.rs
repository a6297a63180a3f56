//! 服务校验和计算
//!
//! 校验和只覆盖服务的可变状态：保护阈值、健康检查模式、元数据和实例集合。
//! 名称、命名空间、选择器与修改时间均不参与计算。

use sha2::{Digest, Sha256};

use crate::naming::service::Service;

/// 校验和引擎
///
/// 无状态，可在多个请求线程间随意共享
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumEngine;

impl ChecksumEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算服务当前状态的摘要（十六进制 SHA-256）
    ///
    /// 元数据按键排序、实例按规范化表示排序后再参与哈希，
    /// 因此结果与 HashMap 迭代顺序和实例注册顺序无关
    pub fn compute(&self, service: &Service) -> String {
        let mut hasher = Sha256::new();

        hasher.update(service.protect_threshold.to_bits().to_be_bytes());
        update_field(&mut hasher, &service.health_check_mode);

        let mut metadata: Vec<(&String, &String)> = service.metadata.iter().collect();
        metadata.sort();
        hasher.update((metadata.len() as u64).to_be_bytes());
        for (key, value) in metadata {
            update_field(&mut hasher, key);
            update_field(&mut hasher, value);
        }

        let mut instances: Vec<String> = service.instances.iter().map(|i| i.fingerprint()).collect();
        instances.sort();
        hasher.update((instances.len() as u64).to_be_bytes());
        for instance in &instances {
            update_field(&mut hasher, instance);
        }

        format!("{:x}", hasher.finalize())
    }

    /// 重新计算并写回服务缓存的校验和
    pub fn recalculate<'a>(&self, service: &'a mut Service) -> &'a str {
        service.checksum = self.compute(service);
        &service.checksum
    }
}

/// 写入带长度前缀的字段，避免相邻字段拼接产生歧义
fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field.as_bytes());
}

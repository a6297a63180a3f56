//! 注册表访问抽象
//!
//! 一致性层只通过只读能力访问注册表：按标识查询服务、列出命名空间下的服务名。
//! 服务记录的持久化与修改都在注册表内部完成。

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::error::{NamingError, Result};
use crate::naming::instance::Instance;
use crate::naming::service::Service;

/// 注册表只读能力
///
/// 返回的服务是调用时刻的快照；并发修改下可能读到旧值或新值
pub trait ServiceRegistry: Send + Sync {
    /// 按标识查询服务
    fn lookup_service(&self, namespace_id: &str, name: &str) -> Option<Service>;

    /// 列出命名空间下的全部服务名
    fn list_service_names(&self, namespace_id: &str) -> Vec<String>;
}

impl<R: ServiceRegistry + ?Sized> ServiceRegistry for Arc<R> {
    fn lookup_service(&self, namespace_id: &str, name: &str) -> Option<Service> {
        (**self).lookup_service(namespace_id, name)
    }

    fn list_service_names(&self, namespace_id: &str) -> Vec<String> {
        (**self).list_service_names(namespace_id)
    }
}

/// 内存注册表
///
/// 命名空间 -> (服务名 -> 服务)，服务名按字典序列出
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    services: Arc<RwLock<HashMap<String, BTreeMap<String, Service>>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或替换服务
    ///
    /// 写入前刷新修改时间并重新计算校验和
    pub fn add_or_replace_service(&self, mut service: Service) -> Result<()> {
        service.validate()?;
        service.last_modified_millis = chrono::Utc::now().timestamp_millis();
        service.recalculate_checksum();

        info!(
            namespace_id = %service.namespace_id,
            service = %service.name,
            checksum = %service.checksum,
            "Service stored in registry"
        );

        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        services
            .entry(service.namespace_id.clone())
            .or_default()
            .insert(service.name.clone(), service);
        Ok(())
    }

    /// 删除服务，返回被删除的记录
    pub fn remove_service(&self, namespace_id: &str, name: &str) -> Option<Service> {
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        let removed = services.get_mut(namespace_id)?.remove(name);
        if removed.is_some() {
            info!(namespace_id = %namespace_id, service = %name, "Service removed from registry");
        }
        removed
    }

    /// 向已有服务注册实例，同一地址的实例会被替换
    pub fn register_instance(&self, namespace_id: &str, name: &str, instance: Instance) -> Result<()> {
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        let service = services
            .get_mut(namespace_id)
            .and_then(|ns| ns.get_mut(name))
            .ok_or_else(|| NamingError::service_not_found(namespace_id, name))?;

        let address = instance.address();
        service.instances.retain(|i| i.address() != address);
        service.instances.push(instance);
        service.last_modified_millis = chrono::Utc::now().timestamp_millis();
        service.recalculate_checksum();

        debug!(
            namespace_id = %namespace_id,
            service = %name,
            address = %address,
            "Instance registered"
        );
        Ok(())
    }
}

impl ServiceRegistry for InMemoryRegistry {
    fn lookup_service(&self, namespace_id: &str, name: &str) -> Option<Service> {
        let services = self.services.read().unwrap_or_else(|e| e.into_inner());
        services.get(namespace_id)?.get(name).cloned()
    }

    fn list_service_names(&self, namespace_id: &str) -> Vec<String> {
        let services = self.services.read().unwrap_or_else(|e| e.into_inner());
        services
            .get(namespace_id)
            .map(|ns| ns.keys().cloned().collect())
            .unwrap_or_default()
    }
}

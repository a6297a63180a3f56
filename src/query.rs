//! 服务查询
//!
//! 选择器过滤后分页的服务名列表、按需重新计算的校验和、服务详情与名称搜索

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{NamingError, Result};
use crate::naming::{ChecksumEngine, MetadataFilter, Selector, ServiceRegistry};

/// 一页服务名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePage {
    /// 当前页的服务名
    pub doms: Vec<String>,
    /// 过滤后的总数
    pub count: usize,
}

impl ServicePage {
    /// 按 1 起始的页码切分
    ///
    /// `start = (page_no - 1) * page_size`，`end = start + page_size`，均截断到 `[0, len]`
    pub fn paginate(names: Vec<String>, page_no: i64, page_size: i64) -> Self {
        let len = names.len() as i64;
        let raw_start = page_no.saturating_sub(1).saturating_mul(page_size);
        let start = raw_start.clamp(0, len);
        let end = raw_start.saturating_add(page_size).clamp(start, len);

        let count = names.len();
        let doms = names
            .into_iter()
            .skip(start as usize)
            .take((end - start) as usize)
            .collect();
        Self { doms, count }
    }
}

/// 服务详情
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    pub name: String,
    pub namespace_id: String,
    pub protect_threshold: f32,
    pub health_check_mode: String,
    pub metadata: HashMap<String, String>,
    pub selector: Selector,
}

/// 服务查询
pub struct ServiceQuery {
    registry: Arc<dyn ServiceRegistry>,
    engine: ChecksumEngine,
}

impl ServiceQuery {
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            registry,
            engine: ChecksumEngine::new(),
        }
    }

    /// 列出命名空间下的服务名，按选择器过滤后分页
    ///
    /// 命名空间下没有任何服务时返回 `NotFound`；
    /// 选择器类型未知或表达式格式错误时返回参数错误，不做任何过滤
    pub fn list(
        &self,
        namespace_id: &str,
        page_no: i64,
        page_size: i64,
        selector: &str,
    ) -> Result<ServicePage> {
        let names = self.registry.list_service_names(namespace_id);
        if names.is_empty() {
            return Err(NamingError::namespace_empty(namespace_id));
        }

        let selector = Selector::parse(selector)?;
        let total = names.len();
        let names = MetadataFilter::new(self.registry.as_ref(), namespace_id).apply(names, &selector);

        debug!(
            namespace_id = %namespace_id,
            selector = selector.type_name(),
            total = total,
            filtered = names.len(),
            "Service names filtered"
        );

        Ok(ServicePage::paginate(names, page_no, page_size))
    }

    /// 重新计算并返回服务的校验和
    pub fn checksum(&self, namespace_id: &str, service_name: &str) -> Result<String> {
        let mut service = self
            .registry
            .lookup_service(namespace_id, service_name)
            .ok_or_else(|| NamingError::service_not_found(namespace_id, service_name))?;
        Ok(self.engine.recalculate(&mut service).to_string())
    }

    /// 服务详情
    pub fn detail(&self, namespace_id: &str, service_name: &str) -> Result<ServiceDetail> {
        let service = self
            .registry
            .lookup_service(namespace_id, service_name)
            .ok_or_else(|| NamingError::service_not_found(namespace_id, service_name))?;

        Ok(ServiceDetail {
            name: service.name,
            namespace_id: service.namespace_id,
            protect_threshold: service.protect_threshold,
            health_check_mode: service.health_check_mode,
            metadata: service.metadata,
            selector: service.selector,
        })
    }

    /// 搜索名称整体匹配 `.*expr.*` 的服务
    pub fn search(&self, namespace_id: &str, expr: &str) -> Result<Vec<String>> {
        let pattern = Regex::new(&format!("^(?:.*{}.*)$", expr))?;
        Ok(self
            .registry
            .list_service_names(namespace_id)
            .into_iter()
            .filter(|name| pattern.is_match(name))
            .collect())
    }
}

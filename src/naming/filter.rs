//! 元数据过滤
//!
//! 按选择器子句过滤服务名列表。过滤是稳定的：只移除不匹配项，不改变顺序。

use tracing::debug;

use crate::naming::registry::ServiceRegistry;
use crate::naming::selector::{LabelClause, Selector, SelectorFactor};

/// 元数据过滤器
pub struct MetadataFilter<'a> {
    registry: &'a dyn ServiceRegistry,
    namespace_id: &'a str,
}

impl<'a> MetadataFilter<'a> {
    pub fn new(registry: &'a dyn ServiceRegistry, namespace_id: &'a str) -> Self {
        Self {
            registry,
            namespace_id,
        }
    }

    /// 按选择器过滤
    ///
    /// `none` 选择器或空白表达式原样返回输入
    pub fn apply(&self, names: Vec<String>, selector: &Selector) -> Vec<String> {
        match selector.clause() {
            Some(clause) => self.apply_clause(names, clause),
            None => names,
        }
    }

    /// 按单个等值子句过滤
    pub fn apply_clause(&self, names: Vec<String>, clause: &LabelClause) -> Vec<String> {
        self.filter(names, &clause.factor, &clause.key, &clause.value)
    }

    /// 保留满足 `metadata[key] == value` 的服务名
    ///
    /// 注册表中已不存在的服务视为不匹配；不支持的作用对象不做过滤
    pub fn filter(
        &self,
        names: Vec<String>,
        factor: &SelectorFactor,
        key: &str,
        value: &str,
    ) -> Vec<String> {
        if let SelectorFactor::Other(factor) = factor {
            debug!(factor = %factor, "Unsupported selector factor, skip filtering");
            return names;
        }

        names
            .into_iter()
            .filter(|name| {
                let Some(service) = self.registry.lookup_service(self.namespace_id, name) else {
                    return false;
                };
                match factor {
                    SelectorFactor::Instance => service.any_instance_matches(key, value),
                    _ => service.metadata_matches(key, value),
                }
            })
            .collect()
    }
}

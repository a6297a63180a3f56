//! HTTP 接口
//!
//! 暴露校验和报告、选择器过滤列表、校验和查询、服务详情与搜索

mod handlers;

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::naming::ServiceRegistry;
use crate::query::ServiceQuery;
use crate::sync::{
    ChannelQueue, ReconciliationCoordinator, ReconciliationQueue, ReconciliationRequest,
    ServerMembership, StaticServerList,
};

/// 路由共享状态
#[derive(Clone)]
pub struct NamingState {
    pub coordinator: Arc<ReconciliationCoordinator>,
    pub query: Arc<ServiceQuery>,
    pub default_namespace: String,
}

impl NamingState {
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        queue: Arc<dyn ReconciliationQueue>,
        membership: Arc<dyn ServerMembership>,
        config: &Config,
    ) -> Self {
        let default_namespace = config.naming.default_namespace.clone();
        Self {
            coordinator: Arc::new(ReconciliationCoordinator::new(
                registry.clone(),
                queue,
                membership,
                default_namespace.clone(),
            )),
            query: Arc::new(ServiceQuery::new(registry)),
            default_namespace,
        }
    }

    /// 按 `[cluster]` 配置构建服务器列表和对账队列
    ///
    /// 返回的接收端交给对账工作线程
    pub fn from_config(
        registry: Arc<dyn ServiceRegistry>,
        config: &Config,
    ) -> (Self, mpsc::Receiver<ReconciliationRequest>) {
        let (queue, rx) = ChannelQueue::new(config.cluster.queue_capacity);
        let membership = StaticServerList::from(&config.cluster);
        let state = Self::new(registry, Arc::new(queue), Arc::new(membership), config);
        (state, rx)
    }

    fn namespace_or_default(&self, namespace_id: Option<String>) -> String {
        namespace_id
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or_else(|| self.default_namespace.clone())
    }
}

/// 路由构建器
pub struct NamingRouter {
    state: NamingState,
    context_path: String,
}

impl NamingRouter {
    pub fn new(state: NamingState, context_path: impl Into<String>) -> Self {
        Self {
            state,
            context_path: context_path.into(),
        }
    }

    /// 构建 axum 路由
    pub fn build(self) -> Router {
        let routes = Router::new()
            .route("/service", get(handlers::detail))
            .route("/service/list", get(handlers::list))
            .route("/service/status", post(handlers::service_status))
            .route("/service/checksum", put(handlers::checksum))
            .route("/service/search", get(handlers::search))
            .with_state(self.state);

        let context_path = self.context_path.trim_matches('/');
        if context_path.is_empty() {
            routes
        } else {
            Router::new().nest(&format!("/{}", context_path), routes)
        }
    }
}

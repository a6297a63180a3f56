//! Flare Naming Core
//!
//! 注册中心节点间一致性层：基于校验和的反熵对账，以及按服务/实例元数据过滤的选择器。
//! 服务记录的持久化、节点间传输和对账队列的消费由外部协作方负责。

pub mod config;
pub mod error;
pub mod logging;
pub mod naming;
pub mod query;
pub mod sync;

// HTTP 接口（可选）
#[cfg(feature = "http")]
pub mod api;

// Re-exports
pub use config::{ClusterConfig, Config, HttpConfig, LogConfig, NamingConfig};
pub use error::{ErrorBuilder, ErrorCategory, ErrorCode, LocalizedError, NamingError, Result};
pub use naming::{
    ChecksumEngine, InMemoryRegistry, Instance, LabelClause, LabelSelector, MetadataFilter,
    Selector, SelectorFactor, Service, ServiceRegistry,
};
pub use query::{ServiceDetail, ServicePage, ServiceQuery};
pub use sync::{
    ChannelQueue, ChecksumReport, ReconciliationCoordinator, ReconciliationQueue,
    ReconciliationRequest, ReportOutcome, ReportStatus, ServerMembership, StaticServerList,
};

#[cfg(feature = "http")]
pub use api::{NamingRouter, NamingState};

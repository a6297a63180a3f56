//! 节点间校验和对账
//!
//! 对端报告 -> 重新计算本地校验和 -> 不一致的服务交给对账队列

pub mod coordinator;
pub mod membership;
pub mod queue;
pub mod report;

pub use coordinator::{EntryOutcome, ReconciliationCoordinator, ReportOutcome, ReportStatus};
pub use membership::{ServerMembership, StaticServerList};
pub use queue::{ChannelQueue, ReconciliationQueue, ReconciliationRequest};
pub use report::ChecksumReport;

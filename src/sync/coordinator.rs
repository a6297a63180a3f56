//! 校验和对账协调器
//!
//! 处理对端发来的校验和报告：重新计算本地校验和，不一致的服务放入对账队列。
//! 处理是尽力而为的，单个条目的问题不会中断整批报告。

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{NamingError, Result};
use crate::naming::{ChecksumEngine, ServiceRegistry};
use crate::sync::membership::ServerMembership;
use crate::sync::queue::{ReconciliationQueue, ReconciliationRequest};
use crate::sync::report::ChecksumReport;

/// 报告处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// 报告已正常处理（不论发现多少不一致）
    Ok,
    /// 报告载荷无法解析
    Fail,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Ok => "ok",
            ReportStatus::Fail => "fail",
        }
    }
}

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// 名称或校验和为空，或本地不存在该服务
    Skipped,
    /// 校验和一致
    Matched,
    /// 校验和不一致
    Mismatched(ReconciliationRequest),
}

/// 一次报告处理的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub status: ReportStatus,
    /// 已入队的对账请求
    pub requests: Vec<ReconciliationRequest>,
    pub matched: usize,
    pub skipped: usize,
}

impl ReportOutcome {
    fn fail() -> Self {
        Self {
            status: ReportStatus::Fail,
            requests: Vec::new(),
            matched: 0,
            skipped: 0,
        }
    }

    pub fn mismatched(&self) -> usize {
        self.requests.len()
    }
}

/// 对账协调器
///
/// 自身不持有可变共享状态，可被多个请求并发调用
pub struct ReconciliationCoordinator {
    registry: Arc<dyn ServiceRegistry>,
    queue: Arc<dyn ReconciliationQueue>,
    membership: Arc<dyn ServerMembership>,
    engine: ChecksumEngine,
    default_namespace: String,
}

impl ReconciliationCoordinator {
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        queue: Arc<dyn ReconciliationQueue>,
        membership: Arc<dyn ServerMembership>,
        default_namespace: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            queue,
            membership,
            engine: ChecksumEngine::new(),
            default_namespace: default_namespace.into(),
        }
    }

    /// 处理原始报告载荷
    ///
    /// 对端地址不在服务器列表中时返回 `UnknownPeer`，此时不处理任何条目；
    /// 载荷无法解析时记录告警并返回 `fail` 状态，不向调用方抛出错误
    pub fn handle_status(&self, payload: &str, peer_address: &str) -> Result<ReportOutcome> {
        self.validate_peer(peer_address)?;

        let report = match ChecksumReport::parse(payload, &self.default_namespace) {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    remote = %peer_address,
                    error = %e,
                    payload = %payload,
                    "[SERVICE-STATUS] receive malformed data"
                );
                return Ok(ReportOutcome::fail());
            }
        };

        Ok(self.reconcile(&report, peer_address))
    }

    /// 处理已解析的报告
    pub fn process_report(&self, report: &ChecksumReport, peer_address: &str) -> Result<ReportOutcome> {
        self.validate_peer(peer_address)?;
        Ok(self.reconcile(report, peer_address))
    }

    fn validate_peer(&self, peer_address: &str) -> Result<()> {
        if self.membership.contains(peer_address) {
            Ok(())
        } else {
            Err(NamingError::unknown_peer(peer_address))
        }
    }

    fn reconcile(&self, report: &ChecksumReport, peer_address: &str) -> ReportOutcome {
        let mut outcome = ReportOutcome {
            status: ReportStatus::Ok,
            requests: Vec::new(),
            matched: 0,
            skipped: 0,
        };

        for (service_name, checksum) in &report.entries {
            match self.check_entry(&report.namespace_id, service_name, checksum, peer_address) {
                EntryOutcome::Skipped => outcome.skipped += 1,
                EntryOutcome::Matched => outcome.matched += 1,
                EntryOutcome::Mismatched(request) => {
                    self.queue.enqueue(request.clone());
                    outcome.requests.push(request);
                }
            }
        }

        debug!(
            namespace_id = %report.namespace_id,
            remote = %peer_address,
            entries = report.entries.len(),
            matched = outcome.matched,
            mismatched = outcome.requests.len(),
            skipped = outcome.skipped,
            "Checksum report processed"
        );

        outcome
    }

    fn check_entry(
        &self,
        namespace_id: &str,
        service_name: &str,
        checksum: &str,
        peer_address: &str,
    ) -> EntryOutcome {
        if service_name.trim().is_empty() || checksum.trim().is_empty() {
            return EntryOutcome::Skipped;
        }

        let Some(mut service) = self.registry.lookup_service(namespace_id, service_name) else {
            return EntryOutcome::Skipped;
        };

        let local_checksum = self.engine.recalculate(&mut service);
        if local_checksum == checksum {
            return EntryOutcome::Matched;
        }

        debug!(
            service = %service_name,
            remote = %peer_address,
            peer_checksum = %checksum,
            local_checksum = %local_checksum,
            "Checksum is not consistent"
        );

        EntryOutcome::Mismatched(ReconciliationRequest {
            namespace_id: namespace_id.to_string(),
            service_name: service_name.to_string(),
            peer_address: peer_address.to_string(),
            peer_checksum: checksum.to_string(),
        })
    }
}

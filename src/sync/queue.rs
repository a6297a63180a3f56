//! 对账请求队列
//!
//! 一致性层只负责入队，消费队列并从对端拉取数据的工作线程不在本模块内

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::warn;

/// 对账请求：本地与对端对某个服务的校验和不一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRequest {
    pub namespace_id: String,
    pub service_name: String,
    pub peer_address: String,
    pub peer_checksum: String,
}

/// 对账队列
///
/// `enqueue` 不得阻塞调用方
pub trait ReconciliationQueue: Send + Sync {
    fn enqueue(&self, request: ReconciliationRequest);
}

/// 基于有界 mpsc 通道的对账队列
///
/// 接收端交给外部的同步工作线程；通道已满或已关闭时丢弃请求并计数
pub struct ChannelQueue {
    tx: mpsc::Sender<ReconciliationRequest>,
    dropped: AtomicU64,
}

impl ChannelQueue {
    /// 创建队列，返回队列和接收端
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ReconciliationRequest>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// 被丢弃的请求数
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ReconciliationQueue for ChannelQueue {
    fn enqueue(&self, request: ReconciliationRequest) {
        if let Err(e) = self.tx.try_send(request) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            let request = match e {
                mpsc::error::TrySendError::Full(r) | mpsc::error::TrySendError::Closed(r) => r,
            };
            warn!(
                namespace_id = %request.namespace_id,
                service = %request.service_name,
                remote = %request.peer_address,
                "Reconciliation queue unavailable, request dropped"
            );
        }
    }
}

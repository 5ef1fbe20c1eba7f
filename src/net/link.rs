//! 链路类型
//!
//! 定义子节点指向父节点的有向链路，以及时延到逐 tick 进度的换算。

use super::id::NodeId;

/// 有向链路（记录在起点节点的 `links` 中）
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub to: NodeId,
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
}

impl Link {
    /// 创建新链路
    pub fn new(to: NodeId, latency_ms: f64, bandwidth_mbps: f64) -> Self {
        Self {
            to,
            latency_ms,
            bandwidth_mbps,
        }
    }

    /// 穿过该链路需要的 tick 数（不含包大小因子），至少为 1。
    pub fn base_traversal_ticks(&self, tick_duration_ms: f64) -> f64 {
        (self.latency_ms / tick_duration_ms).max(1.0)
    }
}

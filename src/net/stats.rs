//! 统计信息
//!
//! 定义仿真统计数据结构（命中率、往返时延等）。

use serde::Serialize;

/// 仿真统计信息
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub requests_created: u64,
    pub responses_spawned: u64,
    pub delivered_pkts: u64,
    pub routing_failures: u64,
    pub purged_pkts: u64,
    /// 由 Origin 直接应答的请求数
    pub origin_served: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_fills: u64,
    pub cache_evictions: u64,
    /// 已完成的请求-响应往返次数
    pub round_trips: u64,
    /// 所有往返耗时之和（tick）
    pub round_trip_ticks: u64,
}

impl Stats {
    /// 缓存命中率：hits / (hits + misses)。没有任何查找时返回 0。
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / lookups as f64
    }

    /// 平均往返时延（tick）
    pub fn mean_round_trip_ticks(&self) -> Option<f64> {
        if self.round_trips == 0 {
            return None;
        }
        Some(self.round_trip_ticks as f64 / self.round_trips as f64)
    }
}

//! 仿真时间类型
//!
//! 以离散 tick 计时；tick 与毫秒的换算由配置中的 `tick_duration_ms` 决定。

use serde::{Deserialize, Serialize};

/// 仿真时间（tick）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    pub const ZERO: SimTick = SimTick(0);

    pub fn next(self) -> SimTick {
        SimTick(self.0.saturating_add(1))
    }

    pub fn plus(self, ticks: u64) -> SimTick {
        SimTick(self.0.saturating_add(ticks))
    }

    /// 距离 `earlier` 经过的 tick 数
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

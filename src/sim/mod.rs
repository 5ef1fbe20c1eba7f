//! 仿真核心模块
//!
//! 此模块包含 tick 驱动仿真的核心组件：仿真时间、配置、引擎、数据包调度、
//! Zipf 流行度采样和合成请求负载。

// 子模块声明
mod config;
mod engine;
mod scheduler;
mod time;
mod workload;
mod zipf;

// 重新导出公共接口
pub use config::SimConfig;
pub use engine::{Engine, MAX_TICK_RATE};
pub use scheduler::progress_speed;
pub use time::SimTick;
pub use workload::RequestWorkload;
pub use zipf::{MIN_ALPHA, RngSource, SeqSource, UniformSource, ZipfSampler};

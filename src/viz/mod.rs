//! 可视化/诊断事件记录（用于离线 JSON 回放与测试断言）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **可注入**：由调用方创建 `VizLogger` 并交给引擎，测试可以捕获或静默
//! - **分级**：每条事件带 `Severity`，低于 logger 阈值的事件直接丢弃

mod types;

pub use types::{RouteFailure, Severity, VizEvent, VizEventKind, VizLinkInfo, VizLogger, VizNodeInfo};

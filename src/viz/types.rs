use crate::net::{NodeKind, PacketKind};
use serde::{Deserialize, Serialize};

/// 事件严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

/// 路由失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteFailure {
    /// 目标不可达
    NoPath,
    /// 路径上相邻两节点之间找不到链路
    MissingLink,
    /// 请求的上行路径没有到达 Origin
    OriginUnreachable,
}

/// 可视化事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 拓扑元信息（每次构建拓扑后的第一条事件）
    Meta {
        nodes: Vec<VizNodeInfo>,
        links: Vec<VizLinkInfo>,
    },
    /// 拓扑重建，在途数据包被清除
    TopologyRebuilt { purged_packets: usize },
    Queued { src: usize, dst: usize },
    PathResolved { path: Vec<usize> },
    /// 数据包到达路径上的某个节点
    Hop { node: usize, step: usize },
    Delivered { node: usize },
    ResponseSpawned { response_id: u64, from: usize, to: usize },
    CacheHit { node: usize, video_id: String, chunk_index: u32 },
    CacheMiss { node: usize, video_id: String, chunk_index: u32 },
    CacheFill { node: usize, video_id: String, chunk_index: u32 },
    CacheEvict { node: usize, video_id: String, chunk_index: u32 },
    RoutingFailure {
        reason: RouteFailure,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<usize>,
    },
    /// 边界操作找不到所需节点
    NotFound { what: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizNodeInfo {
    pub id: usize,
    pub name: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizLinkInfo {
    pub from: usize,
    pub to: usize,
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    pub tick: u64,
    pub level: Severity,
    pub pkt_id: Option<u64>,
    pub pkt_kind: Option<PacketKind>,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 内存中的事件收集器，仿真结束后可整体写成 JSON
#[derive(Debug, Default, Clone)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
    min_level: Severity,
}

impl VizLogger {
    pub fn new(min_level: Severity) -> Self {
        Self {
            events: Vec::new(),
            min_level,
        }
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// 低于阈值的事件被丢弃
    pub fn push(&mut self, ev: VizEvent) {
        if ev.level >= self.min_level {
            self.events.push(ev);
        }
    }

    pub fn count(&self, pred: impl Fn(&VizEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

//! 数据包类型
//!
//! 定义请求/响应数据包及其生命周期状态。

use super::id::{NodeId, PacketId};
use crate::sim::SimTick;
use serde::{Deserialize, Serialize};

/// 尚未解析路径时的默认速度（请求是小控制报文，响应是整块视频数据）
const DEFAULT_REQUEST_SPEED: f64 = 0.2;
const DEFAULT_RESPONSE_SPEED: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Request,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketStatus {
    Queued,
    InTransit,
    Delivered,
}

/// 视频分片数据包
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: PacketId,
    /// 便于阅读的名字，例如 `REQ_USER_1_1_1_video_3_0`
    pub label: String,
    pub kind: PacketKind,
    pub status: PacketStatus,
    pub src: NodeId,
    pub dst: NodeId,
    pub video_id: String,
    pub chunk_index: u32,
    pub is_last_chunk: bool,
    /// 解析前为空
    pub path: Vec<NodeId>,
    /// 当前所在节点在 path 中的索引
    pub step: usize,
    /// 当前链路上的进度，[0, 1)
    pub progress: f64,
    /// 每 tick 的进度增量
    pub speed: f64,
    pub created_at: SimTick,
    /// 响应包：触发它的请求
    pub origin_request: Option<PacketId>,
    /// 响应包：原始请求的创建时刻（用于统计往返时延）
    pub request_created_at: SimTick,
    pub delivered_at: Option<NodeId>,
    pub served_from_cache: bool,
    pub routing_failed: bool,
}

impl Packet {
    /// 创建一个排队中的请求包
    #[allow(clippy::too_many_arguments)]
    pub fn request(
        id: PacketId,
        label: String,
        src: NodeId,
        dst: NodeId,
        video_id: impl Into<String>,
        chunk_index: u32,
        is_last_chunk: bool,
        now: SimTick,
    ) -> Self {
        Self {
            id,
            label,
            kind: PacketKind::Request,
            status: PacketStatus::Queued,
            src,
            dst,
            video_id: video_id.into(),
            chunk_index,
            is_last_chunk,
            path: Vec::new(),
            step: 0,
            progress: 0.0,
            speed: DEFAULT_REQUEST_SPEED,
            created_at: now,
            origin_request: None,
            request_created_at: now,
            delivered_at: None,
            served_from_cache: false,
            routing_failed: false,
        }
    }

    /// 为一个已送达的请求生成响应包：从 `from` 发回请求的源节点
    pub fn response_to(req: &Packet, id: PacketId, from: NodeId, now: SimTick) -> Self {
        Self {
            id,
            label: format!("RESP_{}", req.label),
            kind: PacketKind::Response,
            status: PacketStatus::Queued,
            src: from,
            dst: req.src,
            video_id: req.video_id.clone(),
            chunk_index: req.chunk_index,
            is_last_chunk: req.is_last_chunk,
            path: Vec::new(),
            step: 0,
            progress: 0.0,
            speed: DEFAULT_RESPONSE_SPEED,
            created_at: now,
            origin_request: Some(req.id),
            request_created_at: req.created_at,
            delivered_at: None,
            served_from_cache: false,
            routing_failed: false,
        }
    }

    /// 获取当前所在节点（路径已解析时）
    pub fn at(&self) -> Option<NodeId> {
        self.path.get(self.step).copied()
    }

    /// 获取下一跳节点（如果有）
    pub fn next(&self) -> Option<NodeId> {
        self.path.get(self.step + 1).copied()
    }

    /// 当前正在穿越的边
    pub fn current_edge(&self) -> Option<(NodeId, NodeId)> {
        Some((self.at()?, self.next()?))
    }

    pub fn is_delivered(&self) -> bool {
        self.status == PacketStatus::Delivered
    }
}

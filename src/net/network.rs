//! 网络拓扑管理
//!
//! 节点以 arena（扁平 Vec）形式保存，父/子关系都是 `NodeId` 查找，
//! 节点之间不持有引用。统计信息与可视化事件也挂在这里。

use std::collections::HashMap;

use super::id::NodeId;
use super::link::Link;
use super::node::{Node, NodeKind};
use super::packet::{Packet, PacketStatus};
use super::stats::Stats;
use crate::viz::VizLogger;
use tracing::{debug, trace};

/// 网络拓扑
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
    pub stats: Stats,
    pub(crate) viz: Option<VizLogger>,
}

impl Network {
    /// 丢弃全部节点（统计与可视化记录保留）
    pub fn clear_nodes(&mut self) {
        debug!(old_nodes = self.nodes.len(), "清空拓扑");
        self.nodes.clear();
        self.by_name.clear();
    }

    /// 添加节点；`cache_capacity` 为 `Some` 时节点带缓存
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        cache_capacity: Option<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let node = Node::new(id, name, kind, cache_capacity);
        self.by_name.insert(node.name().to_string(), id);
        self.nodes.push(node);
        id
    }

    /// 把子节点连到父节点：记录 child -> parent 的有向链路并设置父指针
    pub fn connect(
        &mut self,
        child: NodeId,
        parent: NodeId,
        latency_ms: f64,
        bandwidth_mbps: f64,
    ) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.push_link(Link::new(parent, latency_ms, bandwidth_mbps));
            node.set_parent(parent);
        }
    }

    /// 只添加一条链路，不设置父指针
    pub fn add_link(&mut self, from: NodeId, to: NodeId, latency_ms: f64, bandwidth_mbps: f64) {
        if let Some(node) = self.nodes.get_mut(from.0) {
            node.push_link(Link::new(to, latency_ms, bandwidth_mbps));
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    pub fn name_of(&self, id: NodeId) -> &str {
        self.node(id).map(Node::name).unwrap_or("<stale>")
    }

    /// 第一个 Origin 节点
    pub fn origin(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.kind() == NodeKind::Origin)
            .map(Node::id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.kind() == kind)
            .map(Node::id)
            .collect()
    }

    /// 上行的下一个节点：优先父指针，否则取第一条出边的终点
    pub fn parent_candidate(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        node.parent().or_else(|| node.links().first().map(|l| l.to))
    }

    /// 子节点：父指针指向 `id`，或者自身链路中有指向 `id` 的边
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.parent() == Some(id) || n.links_to(id))
            .map(Node::id)
            .collect()
    }

    /// 查找两节点之间的链路，两个方向都尝试
    pub fn link_between(&self, a: NodeId, b: NodeId) -> Option<&Link> {
        trace!(from = ?a, to = ?b, "查找链路");
        let direct = self.node(a)?.links().iter().find(|l| l.to == b);
        direct.or_else(|| self.node(b)?.links().iter().find(|l| l.to == a))
    }

    /// 距离 (x, y) 最近且在 `radius` 内的节点
    pub fn find_node_near(&self, x: f64, y: f64, radius: f64) -> Option<&Node> {
        let r2 = radius * radius;
        self.nodes
            .iter()
            .map(|n| (n, (n.x - x).powi(2) + (n.y - y).powi(2)))
            .filter(|(_, d2)| *d2 <= r2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n)
    }

    /// 在途数据包在画布上的位置：沿当前边线性插值
    pub fn packet_position(&self, pkt: &Packet) -> Option<(f64, f64)> {
        if pkt.status != PacketStatus::InTransit {
            return None;
        }
        let (from, to) = pkt.current_edge()?;
        let (a, b) = (self.node(from)?, self.node(to)?);
        let t = pkt.progress;
        Some((a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t))
    }

    pub fn viz(&self) -> Option<&VizLogger> {
        self.viz.as_ref()
    }

    pub fn set_viz(&mut self, viz: Option<VizLogger>) {
        self.viz = viz;
    }

    pub fn take_viz(&mut self) -> Option<VizLogger> {
        self.viz.take()
    }
}

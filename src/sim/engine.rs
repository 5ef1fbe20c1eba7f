//! 仿真引擎
//!
//! 持有拓扑、在途数据包与仿真时钟，对外暴露渲染/界面层使用的全部操作。
//! 引擎本身没有定时器：宿主每调用一次 `advance_tick` 就推进一个 tick。

use tracing::{error, info, warn};

use super::config::SimConfig;
use super::time::SimTick;
use crate::net::{NetError, Network, Node, NodeId, NodeKind, Packet, PacketId, Stats};
use crate::topo::tiered::{TieredTopology, build_tiered_tree};
use crate::viz::{Severity, VizEventKind, VizLogger};

/// 单帧最多推进的 tick 数
pub const MAX_TICK_RATE: f64 = 1_000.0;

#[derive(Debug)]
pub struct Engine {
    pub(crate) config: SimConfig,
    pub(crate) net: Network,
    topo: TieredTopology,
    pub(crate) packets: Vec<Packet>,
    pub(crate) now: SimTick,
    next_pkt_id: u64,
    tick_rate: f64,
    frame_acc: f64,
}

impl Engine {
    /// 按配置构建拓扑，不记录可视化事件
    pub fn new(config: SimConfig) -> Self {
        Self::build(config, None)
    }

    /// 带事件收集器的引擎；第一条事件是拓扑元信息
    pub fn with_viz(config: SimConfig, viz: VizLogger) -> Self {
        Self::build(config, Some(viz))
    }

    fn build(config: SimConfig, viz: Option<VizLogger>) -> Self {
        let config = config.sanitized();
        let mut net = Network::default();
        net.set_viz(viz);
        let topo = build_tiered_tree(&mut net, &config.tiered_opts());
        net.emit_viz_meta(SimTick::ZERO);
        Self {
            config,
            net,
            topo,
            packets: Vec::new(),
            now: SimTick::ZERO,
            next_pkt_id: 0,
            tick_rate: 1.0,
            frame_acc: 0.0,
        }
    }

    /// 用新配置重建拓扑。所有在途数据包都会被清除（它们引用的节点 id 已失效）。
    #[tracing::instrument(skip(self, config))]
    pub fn build_topology(&mut self, config: SimConfig) -> &[Node] {
        self.config = config.sanitized();
        self.regenerate()
    }

    /// 用当前配置重建拓扑（例如窗口尺寸变化后）
    pub fn regenerate(&mut self) -> &[Node] {
        let purged = self.packets.len();
        self.packets.clear();
        if purged > 0 {
            warn!(purged, "拓扑重建，清除在途数据包");
        }
        self.net.stats.purged_pkts += purged as u64;
        let level = if purged > 0 {
            Severity::Warn
        } else {
            Severity::Info
        };
        self.net.viz_push(
            self.now,
            level,
            None,
            VizEventKind::TopologyRebuilt {
                purged_packets: purged,
            },
        );

        self.topo = build_tiered_tree(&mut self.net, &self.config.tiered_opts());
        self.net.emit_viz_meta(self.now);
        self.net.nodes()
    }

    /// 推进一个 tick：先推进时钟，再处理全部数据包
    pub fn advance_tick(&mut self) {
        self.now = self.now.next();
        self.update_packets();
    }

    /// 推进一帧：按 `tick_rate` 推进若干 tick，小数部分累积到下一帧。返回实际推进的 tick 数。
    pub fn advance_frame(&mut self) -> u32 {
        self.frame_acc += self.tick_rate;
        let ticks = self.frame_acc.floor();
        self.frame_acc -= ticks;
        let ticks = ticks as u32;
        for _ in 0..ticks {
            self.advance_tick();
        }
        ticks
    }

    /// 每帧推进的 tick 数（可以是小数，0 表示暂停）
    pub fn set_tick_rate(&mut self, multiplier: f64) {
        self.tick_rate = if multiplier.is_finite() {
            multiplier.clamp(0.0, MAX_TICK_RATE)
        } else {
            1.0
        };
        info!(tick_rate = self.tick_rate, "设置仿真速度");
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// 在名为 `user` 的 User 节点上排队一个请求
    pub fn create_request(
        &mut self,
        user: &str,
        video_id: &str,
        chunk_index: u32,
        is_last_chunk: bool,
    ) -> Result<PacketId, NetError> {
        let Some(id) = self.net.node_by_name(user) else {
            self.not_found(user);
            return Err(NetError::UnknownNode(user.to_string()));
        };
        self.create_request_at(id, video_id, chunk_index, is_last_chunk)
    }

    pub fn create_request_at(
        &mut self,
        user: NodeId,
        video_id: &str,
        chunk_index: u32,
        is_last_chunk: bool,
    ) -> Result<PacketId, NetError> {
        let name = match self.net.node(user) {
            Some(n) if n.kind() == NodeKind::User => n.name().to_string(),
            Some(n) => return Err(NetError::NotAUser(n.name().to_string())),
            None => {
                let what = format!("{user:?}");
                self.not_found(&what);
                return Err(NetError::UnknownNode(what));
            }
        };
        let Some(origin) = self.net.origin() else {
            error!("无法创建请求：找不到 Origin");
            self.not_found("origin");
            return Err(NetError::NoOrigin);
        };

        let id = self.alloc_packet_id();
        let label = format!("REQ_{name}_{video_id}_{chunk_index}");
        let pkt = Packet::request(
            id,
            label,
            user,
            origin,
            video_id,
            chunk_index,
            is_last_chunk,
            self.now,
        );
        info!(pkt = %pkt.label, "📤 创建请求");
        self.net.stats.requests_created += 1;
        self.net.viz_push(
            self.now,
            Severity::Debug,
            Some(&pkt),
            VizEventKind::Queued {
                src: user.0,
                dst: origin.0,
            },
        );
        self.packets.push(pkt);
        Ok(id)
    }

    /// 从在途集合中移除一个数据包（取消）
    pub fn remove_packet(&mut self, id: PacketId) -> Option<Packet> {
        let idx = self.packets.iter().position(|p| p.id == id)?;
        Some(self.packets.remove(idx))
    }

    /// 画布坐标附近（`pick_radius` 内）最近的节点
    pub fn find_node_near(&self, x: f64, y: f64) -> Option<&Node> {
        self.net.find_node_near(x, y, self.config.pick_radius)
    }

    pub fn list_nodes(&self) -> &[Node] {
        self.net.nodes()
    }

    pub fn list_packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn packet(&self, id: PacketId) -> Option<&Packet> {
        self.packets.iter().find(|p| p.id == id)
    }

    pub fn packet_position(&self, pkt: &Packet) -> Option<(f64, f64)> {
        self.net.packet_position(pkt)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.net.node_by_name(name).and_then(|id| self.net.node(id))
    }

    pub fn now(&self) -> SimTick {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &Stats {
        &self.net.stats
    }

    pub fn network(&self) -> &Network {
        &self.net
    }

    /// 直接修改拓扑；调用方自行保证不与在途数据包冲突
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    pub fn topology(&self) -> &TieredTopology {
        &self.topo
    }

    pub fn viz(&self) -> Option<&VizLogger> {
        self.net.viz()
    }

    pub fn take_viz(&mut self) -> Option<VizLogger> {
        self.net.take_viz()
    }

    pub(crate) fn alloc_packet_id(&mut self) -> PacketId {
        let id = PacketId(self.next_pkt_id);
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        id
    }

    fn not_found(&mut self, what: &str) {
        warn!(what, "节点不存在");
        self.net.viz_push(
            self.now,
            Severity::Error,
            None,
            VizEventKind::NotFound {
                what: what.to_string(),
            },
        );
    }
}

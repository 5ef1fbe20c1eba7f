//! 数据包调度
//!
//! 每个 tick 按插入顺序处理全部在途数据包：
//! Queued → InTransit → Delivered（终态）。送达的请求在同一个 tick 内生成响应，
//! 新生成的响应排在本轮幸存的数据包之后，从下一个 tick 开始处理。

use tracing::{debug, info, trace, warn};

use super::config::SimConfig;
use super::engine::Engine;
use crate::cache::{ChunkKey, StoreOutcome};
use crate::net::{Link, NodeId, NodeKind, Packet, PacketKind, PacketStatus};
use crate::viz::{RouteFailure, Severity, VizEventKind};

/// 吸收累加 speed 时的浮点误差
const PROGRESS_EPSILON: f64 = 1e-9;

/// 把链路时延和包类型换算成每 tick 的进度增量
pub fn progress_speed(link: &Link, kind: PacketKind, cfg: &SimConfig) -> f64 {
    let size_factor = match kind {
        PacketKind::Request => cfg.request_size_factor,
        PacketKind::Response => cfg.response_size_factor,
    };
    1.0 / (link.base_traversal_ticks(cfg.tick_duration_ms) * size_factor)
}

fn deliver(pkt: &mut Packet, node: NodeId) {
    pkt.status = PacketStatus::Delivered;
    pkt.delivered_at = Some(node);
}

/// 数据包到达一个带缓存节点后的结果
enum CacheLookup {
    Hit,
    Miss,
    Filled(Option<ChunkKey>),
    Refreshed,
}

impl Engine {
    #[tracing::instrument(skip(self), fields(tick = self.now.0))]
    pub(crate) fn update_packets(&mut self) {
        let pkts = std::mem::take(&mut self.packets);
        debug!(live = pkts.len(), "更新数据包");

        let mut active = Vec::with_capacity(pkts.len());
        let mut spawned = Vec::new();

        for mut pkt in pkts {
            if pkt.status == PacketStatus::Queued {
                self.start_packet(&mut pkt);
            }
            if pkt.status == PacketStatus::InTransit {
                self.advance_packet(&mut pkt);
            }
            if pkt.is_delivered() {
                if let Some(resp) = self.on_delivered(&pkt) {
                    spawned.push(resp);
                }
                continue;
            }
            active.push(pkt);
        }

        trace!(active = active.len(), spawned = spawned.len(), "本轮结束");
        active.extend(spawned);
        self.packets = active;
    }

    /// 解析路径并进入 InTransit；路径不足两个节点时直接送达
    fn start_packet(&mut self, pkt: &mut Packet) {
        let path = match pkt.kind {
            PacketKind::Request => self.net.path_to_origin(pkt.src),
            PacketKind::Response => self.net.path_down(pkt.src, pkt.dst),
        };
        let Some(&last) = path.last() else {
            self.fail(pkt, RouteFailure::NoPath, None);
            return;
        };

        self.net.viz_push(
            self.now,
            Severity::Debug,
            Some(&*pkt),
            VizEventKind::PathResolved {
                path: path.iter().map(|n| n.0).collect(),
            },
        );
        pkt.path = path;
        pkt.step = 0;
        pkt.progress = 0.0;

        if pkt.path.len() < 2 {
            self.arrive(pkt, last);
            return;
        }
        match self.edge_speed(pkt) {
            Some(speed) => {
                pkt.speed = speed;
                pkt.status = PacketStatus::InTransit;
            }
            None => {
                let src = pkt.src;
                self.fail(pkt, RouteFailure::MissingLink, Some(src));
            }
        }
    }

    fn advance_packet(&mut self, pkt: &mut Packet) {
        pkt.progress += pkt.speed;
        if pkt.progress < 1.0 - PROGRESS_EPSILON {
            return;
        }
        pkt.step += 1;
        pkt.progress = 0.0;

        let Some(node) = pkt.at() else {
            self.fail(pkt, RouteFailure::NoPath, None);
            return;
        };
        trace!(pkt = %pkt.label, node = %self.net.name_of(node), step = pkt.step, "到达节点");
        self.net.viz_push(
            self.now,
            Severity::Debug,
            Some(&*pkt),
            VizEventKind::Hop {
                node: node.0,
                step: pkt.step,
            },
        );

        if self.visit_cache(pkt, node) {
            return;
        }
        if pkt.step + 1 >= pkt.path.len() {
            self.arrive(pkt, node);
            return;
        }
        match self.edge_speed(pkt) {
            Some(speed) => pkt.speed = speed,
            None => self.fail(pkt, RouteFailure::MissingLink, Some(node)),
        }
    }

    /// 走完路径。请求的终点必须是 Origin，否则按路由失败处理（上行链在中途断开）。
    fn arrive(&mut self, pkt: &mut Packet, node: NodeId) {
        if pkt.kind == PacketKind::Request && self.net.kind_of(node) != Some(NodeKind::Origin) {
            self.fail(pkt, RouteFailure::OriginUnreachable, Some(node));
        } else {
            deliver(pkt, node);
        }
    }

    fn edge_speed(&self, pkt: &Packet) -> Option<f64> {
        let (a, b) = pkt.current_edge()?;
        let link = self.net.link_between(a, b)?;
        Some(progress_speed(link, pkt.kind, &self.config))
    }

    /// 经过 CDN/Fog 节点：请求查缓存（命中则就地终止），响应回填缓存。
    /// 请求在此终止时返回 true。
    fn visit_cache(&mut self, pkt: &mut Packet, node: NodeId) -> bool {
        let now = self.now;
        let Some(cache) = self.net.node_mut(node).and_then(|n| n.cache_mut()) else {
            return false;
        };
        let lookup = match pkt.kind {
            PacketKind::Request => {
                if cache.on_hit(&pkt.video_id, pkt.chunk_index, now) {
                    CacheLookup::Hit
                } else {
                    CacheLookup::Miss
                }
            }
            PacketKind::Response => match cache.store(&pkt.video_id, pkt.chunk_index, now) {
                StoreOutcome::Inserted { evicted } => CacheLookup::Filled(evicted),
                StoreOutcome::Refreshed => CacheLookup::Refreshed,
            },
        };

        let (video_id, chunk_index) = (pkt.video_id.clone(), pkt.chunk_index);
        match lookup {
            CacheLookup::Hit => {
                self.net.stats.cache_hits += 1;
                info!(pkt = %pkt.label, node = %self.net.name_of(node), "🎯 缓存命中");
                self.net.viz_push(
                    now,
                    Severity::Info,
                    Some(&*pkt),
                    VizEventKind::CacheHit {
                        node: node.0,
                        video_id,
                        chunk_index,
                    },
                );
                pkt.path.truncate(pkt.step + 1);
                pkt.served_from_cache = true;
                deliver(pkt, node);
                true
            }
            CacheLookup::Miss => {
                self.net.stats.cache_misses += 1;
                self.net.viz_push(
                    now,
                    Severity::Debug,
                    Some(&*pkt),
                    VizEventKind::CacheMiss {
                        node: node.0,
                        video_id,
                        chunk_index,
                    },
                );
                false
            }
            CacheLookup::Filled(evicted) => {
                self.net.stats.cache_fills += 1;
                self.net.viz_push(
                    now,
                    Severity::Debug,
                    Some(&*pkt),
                    VizEventKind::CacheFill {
                        node: node.0,
                        video_id,
                        chunk_index,
                    },
                );
                if let Some(victim) = evicted {
                    self.net.stats.cache_evictions += 1;
                    debug!(node = %self.net.name_of(node), victim = %victim, "缓存淘汰");
                    let ChunkKey {
                        video_id,
                        chunk_index,
                    } = victim;
                    self.net.viz_push(
                        now,
                        Severity::Debug,
                        Some(&*pkt),
                        VizEventKind::CacheEvict {
                            node: node.0,
                            video_id,
                            chunk_index,
                        },
                    );
                }
                false
            }
            CacheLookup::Refreshed => false,
        }
    }

    /// 路由失败：强制送达，不生成响应
    fn fail(&mut self, pkt: &mut Packet, reason: RouteFailure, node: Option<NodeId>) {
        warn!(pkt = %pkt.label, ?reason, "路由失败");
        pkt.status = PacketStatus::Delivered;
        pkt.routing_failed = true;
        pkt.delivered_at = node;
        self.net.stats.routing_failures += 1;
        self.net.viz_push(
            self.now,
            Severity::Warn,
            Some(&*pkt),
            VizEventKind::RoutingFailure {
                reason,
                node: node.map(|n| n.0),
            },
        );
    }

    /// 送达后的副作用：请求到达 Origin 或命中缓存时生成响应
    fn on_delivered(&mut self, pkt: &Packet) -> Option<Packet> {
        if pkt.routing_failed {
            return None;
        }
        let at = pkt.delivered_at.unwrap_or(pkt.dst);
        self.net.stats.delivered_pkts += 1;
        info!(pkt = %pkt.label, node = %self.net.name_of(at), "✅ 数据包送达");
        self.net.viz_push(
            self.now,
            Severity::Info,
            Some(pkt),
            VizEventKind::Delivered { node: at.0 },
        );

        match pkt.kind {
            PacketKind::Request => {
                let at_origin = self.net.kind_of(at) == Some(NodeKind::Origin);
                if !at_origin && !pkt.served_from_cache {
                    return None;
                }
                if at_origin {
                    self.net.stats.origin_served += 1;
                }
                let id = self.alloc_packet_id();
                let resp = Packet::response_to(pkt, id, at, self.now);
                self.net.stats.responses_spawned += 1;
                info!(pkt = %resp.label, "📦 生成响应");
                self.net.viz_push(
                    self.now,
                    Severity::Info,
                    Some(pkt),
                    VizEventKind::ResponseSpawned {
                        response_id: id.0,
                        from: at.0,
                        to: pkt.src.0,
                    },
                );
                Some(resp)
            }
            PacketKind::Response => {
                if at == pkt.dst {
                    self.net.stats.round_trips += 1;
                    self.net.stats.round_trip_ticks += self.now.since(pkt.request_created_at);
                }
                None
            }
        }
    }
}

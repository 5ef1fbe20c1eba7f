//! 四层树形拓扑构建（Origin → CDN → Fog → User）

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::net::{Network, NodeId, NodeKind};
use crate::sim::SimConfig;

/// 子节点到父节点的链路参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierLink {
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
}

impl TierLink {
    pub const fn new(latency_ms: f64, bandwidth_mbps: f64) -> Self {
        Self {
            latency_ms,
            bandwidth_mbps,
        }
    }
}

/// 仅用于绘制的坐标布局
#[derive(Debug, Clone, PartialEq)]
pub struct TierLayout {
    pub width: f64,
    pub origin_y: f64,
    pub cdn_y: f64,
    pub fog_y: f64,
    pub user_y: f64,
    pub fog_spacing: f64,
    pub user_spacing: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TieredOpts {
    pub cdn_per_origin: usize,
    pub fog_per_cdn: usize,
    pub user_per_fog: usize,
    pub cdn_link: TierLink,
    pub fog_link: TierLink,
    pub user_link: TierLink,
    pub cdn_cache_capacity: usize,
    pub fog_cache_capacity: usize,
    pub layout: TierLayout,
}

impl Default for TieredOpts {
    fn default() -> Self {
        SimConfig::default().tiered_opts()
    }
}

#[derive(Debug, Clone)]
pub struct TieredTopology {
    pub cdn_per_origin: usize,
    pub fog_per_cdn: usize,
    pub user_per_fog: usize,
    pub origin: NodeId,
    pub cdns: Vec<NodeId>,
    pub fogs: Vec<NodeId>,
    pub users: Vec<NodeId>,
}

impl TieredTopology {
    pub fn cdn(&self, cdn: usize) -> NodeId {
        self.cdns[cdn]
    }

    pub fn fog(&self, cdn: usize, fog: usize) -> NodeId {
        self.fogs[cdn * self.fog_per_cdn + fog]
    }

    pub fn user(&self, cdn: usize, fog: usize, user: usize) -> NodeId {
        let idx = (cdn * self.fog_per_cdn + fog) * self.user_per_fog + user;
        self.users[idx]
    }
}

/// 第 `i` 个（共 `n` 个）兄弟节点相对父节点的水平偏移
fn fan_offset(i: usize, n: usize, spacing: f64) -> f64 {
    (i as f64 - (n as f64 - 1.0) / 2.0) * spacing
}

/// 构建四层树。会先丢弃 `net` 中原有的全部节点。
///
/// 命名（从 1 开始）：`CDN_i`、`FOG_i_j`、`USER_i_j_k`；根节点为 `ORIGIN`。
pub fn build_tiered_tree(net: &mut Network, opts: &TieredOpts) -> TieredTopology {
    net.clear_nodes();
    let layout = &opts.layout;

    let origin = net.add_node("ORIGIN", NodeKind::Origin, None);
    if let Some(n) = net.node_mut(origin) {
        n.x = layout.width / 2.0;
        n.y = layout.origin_y;
    }

    let n_cdn = opts.cdn_per_origin;
    let (n_fog, n_user) = (opts.fog_per_cdn, opts.user_per_fog);
    let mut cdns = Vec::new();
    let mut fogs = Vec::new();
    let mut users = Vec::new();

    for i in 0..n_cdn {
        let cdn = net.add_node(
            format!("CDN_{}", i + 1),
            NodeKind::Cdn,
            Some(opts.cdn_cache_capacity),
        );
        let cdn_x = layout.width / (n_cdn as f64 + 1.0) * (i as f64 + 1.0);
        if let Some(n) = net.node_mut(cdn) {
            n.x = cdn_x;
            n.y = layout.cdn_y;
        }
        net.connect(cdn, origin, opts.cdn_link.latency_ms, opts.cdn_link.bandwidth_mbps);
        cdns.push(cdn);
        debug!(cdn = ?cdn, "CDN 已创建");

        for j in 0..n_fog {
            let fog = net.add_node(
                format!("FOG_{}_{}", i + 1, j + 1),
                NodeKind::Fog,
                Some(opts.fog_cache_capacity),
            );
            let fog_x = cdn_x + fan_offset(j, n_fog, layout.fog_spacing);
            if let Some(n) = net.node_mut(fog) {
                n.x = fog_x;
                n.y = layout.fog_y;
            }
            net.connect(fog, cdn, opts.fog_link.latency_ms, opts.fog_link.bandwidth_mbps);
            fogs.push(fog);

            for k in 0..n_user {
                let user = net.add_node(
                    format!("USER_{}_{}_{}", i + 1, j + 1, k + 1),
                    NodeKind::User,
                    None,
                );
                if let Some(n) = net.node_mut(user) {
                    n.x = fog_x + fan_offset(k, n_user, layout.user_spacing);
                    n.y = layout.user_y;
                }
                net.connect(
                    user,
                    fog,
                    opts.user_link.latency_ms,
                    opts.user_link.bandwidth_mbps,
                );
                users.push(user);
            }
        }
    }

    info!(
        nodes = net.len(),
        cdns = cdns.len(),
        fogs = fogs.len(),
        users = users.len(),
        "🌳 拓扑已生成"
    );

    TieredTopology {
        cdn_per_origin: n_cdn,
        fog_per_cdn: n_fog,
        user_per_fog: n_user,
        origin,
        cdns,
        fogs,
        users,
    }
}

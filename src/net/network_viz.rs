//! Visualization hooks for the network.

use crate::sim::SimTick;
use crate::viz::{Severity, VizEvent, VizEventKind, VizLinkInfo, VizNodeInfo};

use super::{Network, Packet};

impl Network {
    pub(crate) fn viz_push(
        &mut self,
        tick: SimTick,
        level: Severity,
        pkt: Option<&Packet>,
        kind: VizEventKind,
    ) {
        if let Some(v) = &mut self.viz {
            v.push(VizEvent {
                tick: tick.0,
                level,
                pkt_id: pkt.map(|p| p.id.0),
                pkt_kind: pkt.map(|p| p.kind),
                kind,
            });
        }
    }

    /// Snapshot of nodes and links, emitted after every topology build.
    pub fn emit_viz_meta(&mut self, tick: SimTick) {
        if self.viz.is_none() {
            return;
        }
        let nodes = self
            .nodes()
            .iter()
            .map(|n| VizNodeInfo {
                id: n.id().0,
                name: n.name().to_string(),
                kind: n.kind(),
                x: n.x,
                y: n.y,
                cache_capacity: n.cache().map(|c| c.capacity()),
            })
            .collect::<Vec<_>>();
        let links = self
            .nodes()
            .iter()
            .flat_map(|n| {
                n.links().iter().map(move |l| VizLinkInfo {
                    from: n.id().0,
                    to: l.to.0,
                    latency_ms: l.latency_ms,
                    bandwidth_mbps: l.bandwidth_mbps,
                })
            })
            .collect::<Vec<_>>();
        self.viz_push(tick, Severity::Info, None, VizEventKind::Meta { nodes, links });
    }
}

use crate::net::{Network, NodeKind};
use crate::sim::SimConfig;
use crate::topo::tiered::{TieredOpts, build_tiered_tree};
use std::collections::HashSet;

#[test]
fn default_tree_has_expected_counts_and_names() {
    let mut net = Network::default();
    let topo = build_tiered_tree(&mut net, &TieredOpts::default());

    assert_eq!(topo.cdns.len(), 3);
    assert_eq!(topo.fogs.len(), 6);
    assert_eq!(topo.users.len(), 30);
    assert_eq!(net.len(), 40);
    assert_eq!(net.nodes_of_kind(NodeKind::Origin), vec![topo.origin]);

    assert_eq!(net.name_of(topo.cdn(2)), "CDN_3");
    assert_eq!(net.name_of(topo.fog(1, 0)), "FOG_2_1");
    assert_eq!(net.name_of(topo.user(2, 1, 4)), "USER_3_2_5");
    assert_eq!(net.node_by_name("USER_1_1_1"), Some(topo.user(0, 0, 0)));

    let names = net.nodes().iter().map(|n| n.name()).collect::<HashSet<_>>();
    assert_eq!(names.len(), net.len(), "node names must be unique");
}

#[test]
fn every_non_origin_node_has_exactly_one_parent_link() {
    let mut net = Network::default();
    let topo = build_tiered_tree(&mut net, &TieredOpts::default());

    for node in net.nodes() {
        if node.id() == topo.origin {
            assert!(node.parent().is_none());
            assert!(node.links().is_empty());
            continue;
        }
        assert_eq!(node.links().len(), 1, "{} link count", node.name());
        let parent = node.parent().expect("parent");
        assert_eq!(node.links()[0].to, parent);

        let expected = match node.kind() {
            NodeKind::Cdn => NodeKind::Origin,
            NodeKind::Fog => NodeKind::Cdn,
            NodeKind::User => NodeKind::Fog,
            NodeKind::Origin => unreachable!(),
        };
        assert_eq!(net.kind_of(parent), Some(expected));
    }
}

#[test]
fn parent_chain_reaches_origin_without_cycles() {
    let mut net = Network::default();
    let topo = build_tiered_tree(&mut net, &TieredOpts::default());

    for node in net.nodes() {
        let mut cur = node.id();
        let mut steps = 0;
        while cur != topo.origin {
            cur = net.node(cur).and_then(|n| n.parent()).expect("chain broke");
            steps += 1;
            assert!(steps <= 3, "chain from {} too long", node.name());
        }
    }
}

#[test]
fn tier_links_carry_configured_latency_and_bandwidth() {
    let mut net = Network::default();
    let opts = TieredOpts::default();
    let topo = build_tiered_tree(&mut net, &opts);

    let user = topo.user(0, 0, 0);
    let fog = topo.fog(0, 0);
    let cdn = topo.cdn(0);
    let l = net.link_between(user, fog).expect("user link");
    assert_eq!((l.latency_ms, l.bandwidth_mbps), (10.0, 100.0));
    let l = net.link_between(fog, cdn).expect("fog link");
    assert_eq!((l.latency_ms, l.bandwidth_mbps), (20.0, 1_000.0));
    // Lookup tolerates the reverse direction.
    let l = net.link_between(topo.origin, cdn).expect("cdn link");
    assert_eq!((l.latency_ms, l.bandwidth_mbps), (100.0, 10_000.0));
    assert!(net.link_between(user, cdn).is_none());
}

#[test]
fn only_cdn_and_fog_nodes_carry_caches() {
    let mut net = Network::default();
    let cfg = SimConfig {
        cdn_cache_capacity: 7,
        fog_cache_capacity: 3,
        ..SimConfig::default()
    };
    build_tiered_tree(&mut net, &cfg.tiered_opts());

    for node in net.nodes() {
        let cap = node.cache().map(|c| c.capacity());
        match node.kind() {
            NodeKind::Cdn => assert_eq!(cap, Some(7)),
            NodeKind::Fog => assert_eq!(cap, Some(3)),
            NodeKind::Origin | NodeKind::User => assert_eq!(cap, None),
        }
    }
}

#[test]
fn rebuilding_discards_previous_nodes() {
    let mut net = Network::default();
    build_tiered_tree(&mut net, &TieredOpts::default());
    let opts = TieredOpts {
        cdn_per_origin: 1,
        fog_per_cdn: 1,
        user_per_fog: 1,
        ..TieredOpts::default()
    };
    let topo = build_tiered_tree(&mut net, &opts);
    assert_eq!(net.len(), 4);
    assert_eq!(topo.origin.0, 0);
    assert!(net.node_by_name("CDN_2").is_none());
}

#[test]
fn zero_fan_out_leaves_only_the_origin() {
    let mut net = Network::default();
    let opts = TieredOpts {
        cdn_per_origin: 0,
        ..TieredOpts::default()
    };
    let topo = build_tiered_tree(&mut net, &opts);
    assert_eq!(net.len(), 1);
    assert!(topo.users.is_empty());
}

#[test]
fn layout_centres_origin_and_fans_children() {
    let mut net = Network::default();
    let opts = TieredOpts::default();
    let topo = build_tiered_tree(&mut net, &opts);

    let pos = |id| {
        let n = net.node(id).expect("node");
        (n.x, n.y)
    };
    assert_eq!(pos(topo.origin), (800.0, 50.0));
    assert_eq!(pos(topo.cdn(0)), (400.0, 200.0));
    assert_eq!(pos(topo.fog(0, 0)), (325.0, 400.0));
    assert_eq!(pos(topo.fog(0, 1)), (475.0, 400.0));
    assert_eq!(pos(topo.user(0, 0, 2)), (325.0, 500.0));
    assert_eq!(pos(topo.user(0, 0, 0)), (285.0, 500.0));
}

#[test]
fn huge_fan_out_below_an_empty_tier_is_harmless() {
    let mut net = Network::default();
    let opts = TieredOpts {
        cdn_per_origin: 0,
        fog_per_cdn: usize::MAX,
        user_per_fog: usize::MAX,
        ..TieredOpts::default()
    };
    let topo = build_tiered_tree(&mut net, &opts);
    assert_eq!(net.len(), 1);
    assert!(topo.fogs.is_empty());
    assert!(topo.users.is_empty());
}

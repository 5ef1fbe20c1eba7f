use super::{run_until_idle, small_config};
use crate::net::NodeKind;
use crate::sim::{Engine, SimConfig};
use crate::viz::{Severity, VizEventKind, VizLogger};

#[test]
fn second_user_is_served_from_the_fog_cache() {
    let mut e = Engine::with_viz(small_config(), VizLogger::new(Severity::Info));
    let fog = e.topology().fog(0, 0);
    let cdn = e.topology().cdn(0);

    e.create_request("USER_1_1_1", "video_1", 0, false)
        .expect("request A");
    let first_rtt = run_until_idle(&mut e, 500);
    assert_eq!(e.stats().origin_served, 1);

    // The response filled both caches on its way down.
    for id in [fog, cdn] {
        let node = e.network().node(id).expect("node");
        assert!(node.cache().expect("cache").has("video_1", 0), "{}", node.name());
    }

    e.create_request("USER_1_1_2", "video_1", 0, false)
        .expect("request B");
    let second_rtt = run_until_idle(&mut e, 500);

    let s = e.stats();
    assert_eq!(s.origin_served, 1, "B must not reach the origin");
    assert_eq!(s.cache_hits, 1);
    assert_eq!(s.responses_spawned, 2);
    assert_eq!(s.round_trips, 2);
    assert!(second_rtt < first_rtt, "{second_rtt} >= {first_rtt}");

    let hits = e
        .viz()
        .expect("viz")
        .events
        .iter()
        .filter_map(|ev| match &ev.kind {
            VizEventKind::CacheHit { node, .. } => Some(*node),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(hits, vec![fog.0]);
    assert_eq!(
        e.network()
            .node(fog)
            .and_then(|n| n.cache())
            .and_then(|c| c.get("video_1", 0))
            .map(|entry| entry.access_count),
        Some(1)
    );
}

#[test]
fn concurrent_requests_both_reach_the_origin() {
    let mut e = Engine::new(small_config());
    e.create_request("USER_1_1_1", "video_1", 0, false)
        .expect("request A");
    e.advance_tick();
    e.create_request("USER_1_1_2", "video_1", 0, false)
        .expect("request B");
    run_until_idle(&mut e, 500);

    let s = e.stats();
    assert_eq!(s.origin_served, 2);
    assert_eq!(s.cache_hits, 0);
    assert_eq!(s.cache_misses, 4);
    // The second response refreshes entries instead of inserting them again.
    assert_eq!(s.cache_fills, 2);
}

#[test]
fn fog_eviction_falls_back_to_the_cdn_cache() {
    let cfg = SimConfig {
        fog_cache_capacity: 1,
        ..small_config()
    };
    let mut e = Engine::new(cfg);
    let fog = e.topology().fog(0, 0);
    let cdn = e.topology().cdn(0);

    e.create_request("USER_1_1_1", "video_1", 0, false)
        .expect("request");
    run_until_idle(&mut e, 500);
    e.create_request("USER_1_1_1", "video_2", 0, false)
        .expect("request");
    run_until_idle(&mut e, 500);

    let fog_cache = e.network().node(fog).and_then(|n| n.cache()).expect("fog cache");
    assert!(!fog_cache.has("video_1", 0));
    assert!(fog_cache.has("video_2", 0));
    assert_eq!(e.stats().cache_evictions, 1);

    e.create_request("USER_1_1_2", "video_1", 0, false)
        .expect("request");
    run_until_idle(&mut e, 500);

    let s = e.stats();
    assert_eq!(s.origin_served, 2);
    assert_eq!(s.cache_hits, 1);
    let cdn_cache = e.network().node(cdn).and_then(|n| n.cache()).expect("cdn cache");
    assert_eq!(cdn_cache.hits(), 1);
    // The CDN response refills the fog, evicting video_2.
    let fog_cache = e.network().node(fog).and_then(|n| n.cache()).expect("fog cache");
    assert!(fog_cache.has("video_1", 0));
    assert_eq!(s.cache_evictions, 2);
}

#[test]
fn hit_rate_reflects_lookups() {
    let mut e = Engine::new(small_config());
    assert_eq!(e.stats().hit_rate(), 0.0);
    for user in ["USER_1_1_1", "USER_1_1_2"] {
        e.create_request(user, "video_5", 2, true).expect("request");
        run_until_idle(&mut e, 500);
    }
    // A: miss at fog + miss at cdn, B: hit at fog.
    let s = e.stats();
    assert_eq!((s.cache_hits, s.cache_misses), (1, 2));
    assert!((s.hit_rate() - 1.0 / 3.0).abs() < 1e-12);
    assert!(s.mean_round_trip_ticks().is_some());
    assert_eq!(
        e.network().nodes_of_kind(NodeKind::Fog).len(),
        1,
        "small topology has a single fog"
    );
}

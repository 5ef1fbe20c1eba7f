use super::small_config;
use crate::sim::{Engine, SimConfig};
use crate::viz::{Severity, VizEventKind, VizLogger};
use serde_json::Value;

#[test]
fn meta_event_comes_first_and_describes_the_tree() {
    let e = Engine::with_viz(SimConfig::default(), VizLogger::default());
    let viz = e.viz().expect("viz");
    let first = viz.events.first().expect("meta");
    assert_eq!(first.tick, 0);
    match &first.kind {
        VizEventKind::Meta { nodes, links } => {
            assert_eq!(nodes.len(), 40);
            assert_eq!(links.len(), 39);
            let cdn = nodes.iter().find(|n| n.name == "CDN_1").expect("cdn");
            assert_eq!(cdn.cache_capacity, Some(20));
            assert!(links.iter().all(|l| l.from != 0), "origin has no uplink");
        }
        other => panic!("expected meta, got {other:?}"),
    }
}

#[test]
fn events_below_min_level_are_discarded() {
    let mut e = Engine::with_viz(small_config(), VizLogger::new(Severity::Warn));
    e.create_request("USER_1_1_1", "video_1", 0, false)
        .expect("request");
    for _ in 0..200 {
        e.advance_tick();
    }
    let viz = e.viz().expect("viz");
    assert!(viz.events.iter().all(|ev| ev.level >= Severity::Warn));
    assert_eq!(viz.min_level(), Severity::Warn);
}

#[test]
fn engine_without_logger_records_nothing() {
    let mut e = Engine::new(small_config());
    e.create_request("USER_1_1_1", "video_1", 0, false)
        .expect("request");
    e.advance_tick();
    assert!(e.viz().is_none());
    assert!(e.take_viz().is_none());
}

#[test]
fn event_log_serialises_as_tagged_json() {
    let mut e = Engine::with_viz(small_config(), VizLogger::new(Severity::Debug));
    e.create_request("USER_1_1_2", "video_7", 3, true)
        .expect("request");
    e.advance_tick();

    let raw = e.take_viz().expect("viz").to_json().expect("json");
    let v: Value = serde_json::from_str(&raw).expect("parse");
    let arr = v.as_array().expect("array");
    assert_eq!(arr[0].get("kind").and_then(Value::as_str), Some("meta"));

    let queued = arr
        .iter()
        .find(|ev| ev.get("kind").and_then(Value::as_str) == Some("queued"))
        .expect("queued event");
    assert_eq!(queued.get("pkt_kind").and_then(Value::as_str), Some("request"));
    assert_eq!(queued.get("level").and_then(Value::as_str), Some("debug"));
    assert!(
        arr.iter()
            .any(|ev| ev.get("kind").and_then(Value::as_str) == Some("path_resolved"))
    );
}

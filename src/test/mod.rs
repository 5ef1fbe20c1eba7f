mod cache_store;
mod end_to_end;
mod topologies;
mod viz_meta;

use crate::sim::{Engine, SimConfig};

/// 1 CDN / 1 Fog / 2 Users
pub(crate) fn small_config() -> SimConfig {
    SimConfig {
        cdn_per_origin: 1,
        fog_per_cdn: 1,
        user_per_fog: 2,
        cdn_cache_capacity: 20,
        fog_cache_capacity: 5,
        ..SimConfig::default()
    }
}

/// Ticks until no packet is live; returns the number of ticks run.
pub(crate) fn run_until_idle(engine: &mut Engine, max_ticks: u64) -> u64 {
    let mut ticks = 0;
    while !engine.list_packets().is_empty() {
        assert!(ticks < max_ticks, "engine still busy after {max_ticks} ticks");
        engine.advance_tick();
        ticks += 1;
    }
    ticks
}

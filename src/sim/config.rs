//! 仿真配置
//!
//! 所有字段都有默认值，可以只在 JSON 中覆盖一部分。非法取值在
//! `sanitized()` 中被夹到安全下限，而不是报错。

use serde::{Deserialize, Serialize};

use super::zipf::MIN_ALPHA;
use crate::topo::tiered::{TierLayout, TierLink, TieredOpts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub cdn_per_origin: usize,
    pub fog_per_cdn: usize,
    pub user_per_fog: usize,
    pub cdn_link: TierLink,
    pub fog_link: TierLink,
    pub user_link: TierLink,
    pub cdn_cache_capacity: usize,
    pub fog_cache_capacity: usize,
    pub catalog_size: usize,
    pub alpha: f64,
    /// 一个 tick 对应的毫秒数（60 FPS）
    pub tick_duration_ms: f64,
    pub request_size_factor: f64,
    pub response_size_factor: f64,
    pub layout_width: f64,
    pub origin_y: f64,
    pub cdn_y: f64,
    pub fog_y: f64,
    pub user_y: f64,
    pub fog_spacing: f64,
    pub user_spacing: f64,
    /// `find_node_near` 的命中半径
    pub pick_radius: f64,
    pub chunks_per_video: u32,
    pub request_interval_ticks: u64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cdn_per_origin: 3,
            fog_per_cdn: 2,
            user_per_fog: 5,
            cdn_link: TierLink::new(100.0, 10_000.0),
            fog_link: TierLink::new(20.0, 1_000.0),
            user_link: TierLink::new(10.0, 100.0),
            cdn_cache_capacity: 20,
            fog_cache_capacity: 5,
            catalog_size: 50,
            alpha: 4.0,
            tick_duration_ms: 16.67,
            request_size_factor: 1.0,
            response_size_factor: 10.0,
            layout_width: 1600.0,
            origin_y: 50.0,
            cdn_y: 200.0,
            fog_y: 400.0,
            user_y: 500.0,
            fog_spacing: 150.0,
            user_spacing: 20.0,
            pick_radius: 10.0,
            chunks_per_video: 4,
            request_interval_ticks: 30,
            seed: 1,
        }
    }
}

fn at_least(v: f64, min: f64) -> f64 {
    if v.is_finite() { v.max(min) } else { min }
}

fn sanitize_link(l: TierLink) -> TierLink {
    TierLink::new(at_least(l.latency_ms, 0.0), at_least(l.bandwidth_mbps, 0.0))
}

impl SimConfig {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<SimConfig>(raw).map(SimConfig::sanitized)
    }

    /// 把参数夹到安全范围
    pub fn sanitized(mut self) -> Self {
        self.cdn_link = sanitize_link(self.cdn_link);
        self.fog_link = sanitize_link(self.fog_link);
        self.user_link = sanitize_link(self.user_link);
        self.cdn_cache_capacity = self.cdn_cache_capacity.max(1);
        self.fog_cache_capacity = self.fog_cache_capacity.max(1);
        self.catalog_size = self.catalog_size.max(1);
        self.alpha = at_least(self.alpha, MIN_ALPHA);
        self.tick_duration_ms = at_least(self.tick_duration_ms, 0.001);
        self.request_size_factor = at_least(self.request_size_factor, 1.0);
        self.response_size_factor = at_least(self.response_size_factor, 1.0);
        self.layout_width = at_least(self.layout_width, 0.0);
        self.pick_radius = at_least(self.pick_radius, 0.0);
        self.chunks_per_video = self.chunks_per_video.max(1);
        self.request_interval_ticks = self.request_interval_ticks.max(1);
        self
    }

    pub fn tiered_opts(&self) -> TieredOpts {
        TieredOpts {
            cdn_per_origin: self.cdn_per_origin,
            fog_per_cdn: self.fog_per_cdn,
            user_per_fog: self.user_per_fog,
            cdn_link: self.cdn_link,
            fog_link: self.fog_link,
            user_link: self.user_link,
            cdn_cache_capacity: self.cdn_cache_capacity,
            fog_cache_capacity: self.fog_cache_capacity,
            layout: TierLayout {
                width: self.layout_width,
                origin_y: self.origin_y,
                cdn_y: self.cdn_y,
                fog_y: self.fog_y,
                user_y: self.user_y,
                fog_spacing: self.fog_spacing,
                user_spacing: self.user_spacing,
            },
        }
    }
}

//! 合成请求负载
//!
//! 每隔 `interval` 个 tick 随机挑一个 User，按 Zipf 抽一个视频，
//! 依次请求它的全部分片（最后一片带 `is_last_chunk`）。

use tracing::debug;

use super::config::SimConfig;
use super::engine::Engine;
use super::time::SimTick;
use super::zipf::{RngSource, UniformSource, ZipfSampler};
use crate::net::{NodeKind, PacketId};
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct RequestWorkload<S> {
    sampler: ZipfSampler<S>,
    interval: u64,
    chunks_per_video: u32,
    next_at: SimTick,
    sessions: u64,
}

impl RequestWorkload<RngSource<StdRng>> {
    /// 由配置（目录大小、alpha、间隔、分片数、种子）创建
    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::new(
            ZipfSampler::seeded(cfg.catalog_size, cfg.alpha, cfg.seed),
            cfg.request_interval_ticks,
            cfg.chunks_per_video,
        )
    }
}

impl<S: UniformSource> RequestWorkload<S> {
    pub fn new(sampler: ZipfSampler<S>, interval: u64, chunks_per_video: u32) -> Self {
        Self {
            sampler,
            interval: interval.max(1),
            chunks_per_video: chunks_per_video.max(1),
            next_at: SimTick::ZERO,
            sessions: 0,
        }
    }

    /// 已发起的观看会话数
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// 到时间就发起新的会话，返回本次排队的请求
    pub fn drive(&mut self, engine: &mut Engine) -> Vec<PacketId> {
        let mut issued = Vec::new();
        while engine.now() >= self.next_at {
            self.next_at = self.next_at.plus(self.interval);
            issued.extend(self.start_session(engine));
        }
        issued
    }

    fn start_session(&mut self, engine: &mut Engine) -> Vec<PacketId> {
        let users = engine.network().nodes_of_kind(NodeKind::User);
        if users.is_empty() {
            return Vec::new();
        }
        let idx = ((self.sampler.next_uniform() * users.len() as f64) as usize).min(users.len() - 1);
        let user = users[idx];
        let video = self.sampler.sample();
        self.sessions += 1;
        debug!(user = ?user, video = %video, "发起观看会话");

        (0..self.chunks_per_video)
            .filter_map(|chunk| {
                let last = chunk + 1 == self.chunks_per_video;
                engine.create_request_at(user, &video, chunk, last).ok()
            })
            .collect()
    }
}

//! Zipf 流行度采样
//!
//! 排名 r 的概率正比于 `r^-alpha`：排名 1 最热门。构建时一次性算出 CDF，
//! 每次采样抽一个 U[0,1)，返回第一个 CDF >= U 的排名。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// alpha 的下限，避免退化的权重
pub const MIN_ALPHA: f64 = 0.1;

/// 均匀随机源：返回 [0, 1) 内的值
pub trait UniformSource {
    fn next_f64(&mut self) -> f64;
}

/// 把任意 `rand::Rng` 包装成均匀随机源
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// 循环返回固定序列，用于可复现的测试
#[derive(Debug, Clone)]
pub struct SeqSource {
    values: Vec<f64>,
    idx: usize,
}

impl SeqSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, idx: 0 }
    }
}

impl UniformSource for SeqSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.idx % self.values.len()];
        self.idx = self.idx.wrapping_add(1);
        v
    }
}

#[derive(Debug, Clone)]
pub struct ZipfSampler<S> {
    catalog_size: usize,
    alpha: f64,
    cdf: Vec<f64>,
    source: S,
}

impl ZipfSampler<RngSource<StdRng>> {
    /// 使用固定种子的 `StdRng`
    pub fn seeded(catalog_size: usize, alpha: f64, seed: u64) -> Self {
        Self::new(catalog_size, alpha, RngSource(StdRng::seed_from_u64(seed)))
    }
}

impl<S: UniformSource> ZipfSampler<S> {
    pub fn new(catalog_size: usize, alpha: f64, source: S) -> Self {
        let mut s = Self {
            catalog_size: 1,
            alpha: MIN_ALPHA,
            cdf: Vec::new(),
            source,
        };
        s.update_parameters(catalog_size, alpha);
        s
    }

    /// 更新目录大小和/或 alpha，并重建 CDF
    pub fn update_parameters(&mut self, catalog_size: usize, alpha: f64) {
        self.catalog_size = catalog_size.max(1);
        self.alpha = if alpha.is_finite() {
            alpha.max(MIN_ALPHA)
        } else {
            MIN_ALPHA
        };
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let weights = (1..=self.catalog_size)
            .map(|rank| (rank as f64).powf(-self.alpha))
            .collect::<Vec<_>>();
        let norm: f64 = weights.iter().sum();

        let mut running = 0.0;
        self.cdf = weights
            .iter()
            .map(|w| {
                running += w / norm;
                running
            })
            .collect();
        debug!(
            catalog_size = self.catalog_size,
            alpha = self.alpha,
            "Zipf 分布已构建"
        );
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// 累积分布表，`cdf()[i] = P(rank <= i + 1)`
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// 单个排名的概率（排名从 1 开始）
    pub fn probability(&self, rank: usize) -> f64 {
        match rank {
            0 => 0.0,
            1 => self.cdf.first().copied().unwrap_or(0.0),
            r if r <= self.cdf.len() => self.cdf[r - 1] - self.cdf[r - 2],
            _ => 0.0,
        }
    }

    /// 抽一个排名（1..=catalog_size）
    pub fn sample_rank(&mut self) -> usize {
        let u = self.source.next_f64();
        let idx = self.cdf.partition_point(|&c| c < u);
        // 浮点误差导致 U 大于最后一项时回落到最后一个排名
        idx.min(self.catalog_size - 1) + 1
    }

    /// 抽一个视频 id，形如 `video_7`
    pub fn sample(&mut self) -> String {
        format!("video_{}", self.sample_rank())
    }

    /// 直接从底层随机源取一个 U[0,1)
    pub fn next_uniform(&mut self) -> f64 {
        self.source.next_f64()
    }
}

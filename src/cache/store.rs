//! FIFO 缓存
//!
//! 不变量：`map.len() == order.len() <= capacity`，`order` 队头就是下一个被淘汰的键。

use std::collections::{HashMap, VecDeque};

use super::entry::{CacheEntry, ChunkKey};
use crate::sim::SimTick;
use tracing::trace;

/// `store` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// 新插入；如果容量已满，附带被淘汰的键
    Inserted { evicted: Option<ChunkKey> },
    /// 已存在，只记一次访问
    Refreshed,
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    capacity: usize,
    map: HashMap<ChunkKey, CacheEntry>,
    order: VecDeque<ChunkKey>,
    hits: u64,
    evictions: u64,
}

impl CacheStore {
    /// 容量至少为 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn has(&self, video_id: &str, chunk_index: u32) -> bool {
        self.map.contains_key(&ChunkKey::new(video_id, chunk_index))
    }

    pub fn get(&self, video_id: &str, chunk_index: u32) -> Option<&CacheEntry> {
        self.map.get(&ChunkKey::new(video_id, chunk_index))
    }

    /// 按插入顺序（从最旧到最新）列出缓存的键
    pub fn keys_in_order(&self) -> impl Iterator<Item = &ChunkKey> {
        self.order.iter()
    }

    /// 存入一个分片。已存在时只记访问，不改变淘汰顺序。
    pub fn store(&mut self, video_id: &str, chunk_index: u32, now: SimTick) -> StoreOutcome {
        let key = ChunkKey::new(video_id, chunk_index);
        if let Some(entry) = self.map.get_mut(&key) {
            entry.last_accessed = now;
            entry.access_count += 1;
            return StoreOutcome::Refreshed;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        trace!(key = %key, "缓存插入");
        self.map.insert(
            key.clone(),
            CacheEntry {
                stored_at: now,
                last_accessed: now,
                access_count: 0,
            },
        );
        self.order.push_back(key);
        StoreOutcome::Inserted { evicted }
    }

    /// 记录一次命中；不影响 FIFO 顺序。键不存在时返回 false。
    pub fn on_hit(&mut self, video_id: &str, chunk_index: u32, now: SimTick) -> bool {
        match self.map.get_mut(&ChunkKey::new(video_id, chunk_index)) {
            Some(entry) => {
                entry.last_accessed = now;
                entry.access_count += 1;
                self.hits += 1;
                true
            }
            None => false,
        }
    }

    fn evict_oldest(&mut self) -> Option<ChunkKey> {
        let victim = self.order.pop_front()?;
        self.map.remove(&victim);
        self.evictions += 1;
        trace!(key = %victim, "FIFO 淘汰");
        Some(victim)
    }
}

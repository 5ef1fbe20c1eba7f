use crate::sim::SimTick;
use std::fmt;

/// 视频分片的复合键 (video_id, chunk_index)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    pub video_id: String,
    pub chunk_index: u32,
}

impl ChunkKey {
    pub fn new(video_id: impl Into<String>, chunk_index: u32) -> Self {
        Self {
            video_id: video_id.into(),
            chunk_index,
        }
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.video_id, self.chunk_index)
    }
}

/// 缓存条目：只记录时间戳与访问次数，不保存负载本身
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub stored_at: SimTick,
    pub last_accessed: SimTick,
    pub access_count: u64,
}

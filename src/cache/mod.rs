//! 节点缓存（Cache Store）
//!
//! 只有 CDN/Fog 节点挂载缓存。淘汰策略为纯 FIFO：按插入顺序淘汰，
//! 访问不会提升条目的位置。

mod entry;
mod store;

pub use entry::{CacheEntry, ChunkKey};
pub use store::{CacheStore, StoreOutcome};

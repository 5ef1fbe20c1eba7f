//! 标识符类型
//!
//! 定义节点和数据包的唯一标识符。节点 id 是 arena 下标，拓扑重建后失效。

use serde::{Deserialize, Serialize};

/// 节点标识符（`Network` arena 中的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 数据包标识符（单调递增，拓扑重建后也不会复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PacketId(pub u64);

//! 节点类型
//!
//! 网络节点是一个带类型标签的值：是否带缓存由 `cache` 字段决定，
//! 而不是由具体类型决定。

use super::id::NodeId;
use super::link::Link;
use crate::cache::CacheStore;
use serde::{Deserialize, Serialize};

/// 节点所在层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Origin,
    Cdn,
    Fog,
    User,
}

/// 网络节点
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: NodeKind,
    /// 仅用于绘制
    pub x: f64,
    pub y: f64,
    links: Vec<Link>,
    parent: Option<NodeId>,
    cache: Option<CacheStore>,
}

impl Node {
    /// 创建新节点；`cache_capacity` 为 `Some` 时挂载一个缓存组件
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        cache_capacity: Option<usize>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            x: 0.0,
            y: 0.0,
            links: Vec::new(),
            parent: None,
            cache: cache_capacity.map(CacheStore::new),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut CacheStore> {
        self.cache.as_mut()
    }

    /// 是否存在指向 `to` 的出边
    pub fn links_to(&self, to: NodeId) -> bool {
        self.links.iter().any(|l| l.to == to)
    }

    pub(crate) fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }
}

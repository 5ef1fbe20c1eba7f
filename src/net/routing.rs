//! 路径解析
//!
//! 请求包沿父指针向上爬到 Origin；响应包从起点向下做 DFS 寻找目标。
//! 长度小于 2 的路径表示无需传输（起点即终点，或根本无路可走）。

use super::id::NodeId;
use super::network::Network;
use super::node::NodeKind;
use tracing::{debug, trace};

impl Network {
    /// 从 `start` 向上走到 Origin，包含两端。
    ///
    /// 父链在没有 Origin 的地方断开时，返回到断点为止的路径。
    /// 通过 `add_link` 手工构造出环时，最多走 `len()` 步。
    #[tracing::instrument(skip(self))]
    pub fn path_to_origin(&self, start: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cur = self.node(start).map(|n| n.id());

        while let Some(id) = cur {
            path.push(id);
            if self.kind_of(id) == Some(NodeKind::Origin) || path.len() > self.len() {
                break;
            }
            cur = self.parent_candidate(id);
        }

        debug!(hops = path.len(), "上行路径");
        path
    }

    /// 从 Origin 向下找到 `target` 的路径；没有 Origin 或不可达时为空
    pub fn path_from_origin(&self, target: NodeId) -> Vec<NodeId> {
        match self.origin() {
            Some(origin) => self.path_down(origin, target),
            None => Vec::new(),
        }
    }

    /// 从 `from` 向下 DFS 寻找 `target`，返回找到的第一条路径
    #[tracing::instrument(skip(self))]
    pub fn path_down(&self, from: NodeId, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut visited = vec![false; self.len()];
        if self.node(from).is_some() && self.dfs(from, target, &mut path, &mut visited) {
            debug!(hops = path.len(), "下行路径");
            path
        } else {
            debug!("下行路径不存在");
            Vec::new()
        }
    }

    fn dfs(
        &self,
        cur: NodeId,
        target: NodeId,
        path: &mut Vec<NodeId>,
        visited: &mut [bool],
    ) -> bool {
        trace!(at = ?cur, "DFS");
        visited[cur.0] = true;
        path.push(cur);
        if cur == target {
            return true;
        }
        for child in self.children_of(cur) {
            if !visited[child.0] && self.dfs(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }
}

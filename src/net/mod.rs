//! 网络模拟模块
//!
//! 此模块包含网络模拟的核心组件，如节点、链路、数据包和网络拓扑。

// 子模块声明
mod error;
mod id;
mod link;
mod network;
mod network_viz;
mod node;
mod packet;
mod routing;
mod stats;

// 重新导出公共接口
pub use error::NetError;
pub use id::{NodeId, PacketId};
pub use link::Link;
pub use network::Network;
pub use node::{Node, NodeKind};
pub use packet::{Packet, PacketKind, PacketStatus};
pub use stats::Stats;

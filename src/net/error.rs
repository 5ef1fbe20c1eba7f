//! 错误类型
//!
//! 引擎边界上可恢复的 "not found" 类错误。tick 循环本身从不返回错误。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error("topology has no origin node")]
    NoOrigin,
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    #[error("node `{0}` is not a user node")]
    NotAUser(String),
}

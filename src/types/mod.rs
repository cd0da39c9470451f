mod config;
mod error;
mod geometry;
mod rule;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use rule::*;

use serde::Serialize;

/// 单条规则在一次事件中未触发的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchMiss {
    /// 没有找到候选节点
    NoCandidate,
    /// 候选节点多于一个, 视为不可见
    Ambiguous(usize),
    /// 文本不匹配
    TextMismatch,
    /// 相对路径无法解析
    PathUnresolved,
}

/// 规则状态的一次跳变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    Seen,
    Gone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub rule_id: i64,
    pub kind: TransitionKind,
    /// 毫秒时间戳
    pub at: i64,
}

impl Transition {
    pub fn new(rule_id: i64, kind: TransitionKind) -> Self {
        Self {
            rule_id,
            kind,
            at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

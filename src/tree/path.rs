use std::fmt;
use std::str::FromStr;

use super::ElementNode;

/// 相对路径中的单步指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// `p`: 移动到父节点
    Parent,
    /// `c[n]`: 移动到第 n 个子节点(从 0 开始)
    Child(i64),
    /// `su`: 移动到前一个兄弟节点
    SiblingUp,
    /// `sd`: 移动到后一个兄弟节点
    SiblingDown,
    /// 无法识别的指令, 解析时保留, 执行时必然失败
    Invalid(String),
}

impl PathStep {
    fn parse(token: &str) -> Self {
        match token {
            "p" => PathStep::Parent,
            "su" => PathStep::SiblingUp,
            "sd" => PathStep::SiblingDown,
            other => other
                .strip_prefix("c[")
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(|index| index.trim().parse::<i64>().ok())
                .map(PathStep::Child)
                .unwrap_or_else(|| PathStep::Invalid(other.to_string())),
        }
    }

    /// 执行单步, 失败时返回 None
    pub fn apply<N: ElementNode>(&self, node: &N) -> Option<N> {
        match self {
            PathStep::Parent => node.parent(),
            PathStep::Child(index) => {
                let index = usize::try_from(*index).ok()?;
                if index >= node.child_count() {
                    return None;
                }
                node.child(index)
            }
            PathStep::SiblingUp => {
                let index = node.index_in_parent()?;
                let previous = index.checked_sub(1)?;
                node.parent()?.child(previous)
            }
            PathStep::SiblingDown => {
                let index = node.index_in_parent()?;
                let parent = node.parent()?;
                if index + 1 >= parent.child_count() {
                    return None;
                }
                parent.child(index + 1)
            }
            PathStep::Invalid(_) => None,
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Parent => f.write_str("p"),
            PathStep::Child(index) => write!(f, "c[{}]", index),
            PathStep::SiblingUp => f.write_str("su"),
            PathStep::SiblingDown => f.write_str("sd"),
            PathStep::Invalid(token) => f.write_str(token),
        }
    }
}

/// 以 `.` 分隔的相对路径, 从匹配节点出发逐步定位到动作的目标节点
///
/// 空路径等价于恒等变换。任何一步失败都会让整个解析失败, 后续步骤不再执行。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativePath {
    steps: Vec<PathStep>,
}

impl RelativePath {
    pub fn parse(path: Option<&str>) -> Self {
        let path = path.map(str::trim).unwrap_or_default();
        if path.is_empty() {
            return Self::default();
        }
        Self {
            steps: path.split('.').map(|t| PathStep::parse(t.trim())).collect(),
        }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn resolve<N: ElementNode>(&self, start: &N) -> Option<N> {
        self.steps
            .iter()
            .try_fold(start.clone(), |current, step| step.apply(&current))
    }
}

impl FromStr for RelativePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RelativePath::parse(Some(s)))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(|s| s.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

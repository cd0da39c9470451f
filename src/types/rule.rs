use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RuleError;

/// 规则定义: 当应用 `app_id` 中出现 id 为 `view_id` 的元素时执行 `action_type`
///
/// 规则由外部的规则存储持久化, 每次评估时作为不可变值交给引擎。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// 规则唯一标识, 编辑后保持不变
    pub id: i64,
    /// 显示名称, 不参与匹配
    pub name: String,
    /// 未启用的规则会被引擎完全忽略
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 目标应用标识, 精确匹配
    pub app_id: String,
    /// 应用内的元素 id, 不含 `<app_id>:id/` 前缀
    pub view_id: String,
    /// 元素文本的正则表达式, 需整串匹配; 为空表示匹配任意文本
    #[serde(default)]
    pub view_text: Option<String>,
    pub action_type: ActionType,
    /// 从匹配节点到目标节点的相对路径, 为空表示直接作用于匹配节点
    #[serde(default)]
    pub relative_path: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        app_id: impl Into<String>,
        view_id: impl Into<String>,
        action_type: ActionType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            app_id: app_id.into(),
            view_id: view_id.into(),
            view_text: None,
            action_type,
            relative_path: None,
        }
    }

    pub fn with_view_text(mut self, pattern: impl Into<String>) -> Self {
        self.view_text = Some(pattern.into());
        self
    }

    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn matches_app(&self, app_id: &str) -> bool {
        self.app_id == app_id
    }

    /// 宿主使用的完整元素 id: `<app_id>:id/<view_id>`
    pub fn complete_view_id(&self) -> String {
        format!("{}:id/{}", self.app_id, self.view_id)
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.app_id.trim().is_empty() {
            return Err(RuleError::InvalidRule {
                rule_id: self.id,
                reason: "app_id 不能为空".to_string(),
            });
        }
        if self.view_id.trim().is_empty() {
            return Err(RuleError::InvalidRule {
                rule_id: self.id,
                reason: "view_id 不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 编译文本正则。返回的正则已锚定首尾, 只接受整串匹配。
    ///
    /// 原始表达式先单独编译校验, 否则 `a)|(b` 这类写法包上锚点后会变成合法但只锚定一端的正则。
    pub fn text_pattern(&self) -> Result<Option<Regex>, RuleError> {
        let Some(pattern) = self.view_text.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let invalid = |source| RuleError::InvalidViewText {
            rule_id: self.id,
            source,
        };
        Regex::new(pattern).map_err(invalid)?;
        Regex::new(&format!("^(?:{})$", pattern))
            .map(Some)
            .map_err(invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Click,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Mute,
    Block,
    Back,
}

impl ActionType {
    pub const ALL: [ActionType; 8] = [
        ActionType::Click,
        ActionType::SwipeLeft,
        ActionType::SwipeRight,
        ActionType::SwipeUp,
        ActionType::SwipeDown,
        ActionType::Mute,
        ActionType::Block,
        ActionType::Back,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::SwipeLeft => "swipe_left",
            ActionType::SwipeRight => "swipe_right",
            ActionType::SwipeUp => "swipe_up",
            ActionType::SwipeDown => "swipe_down",
            ActionType::Mute => "mute",
            ActionType::Block => "block",
            ActionType::Back => "back",
        }
    }

    pub fn swipe_direction(&self) -> Option<SwipeDirection> {
        match self {
            ActionType::SwipeLeft => Some(SwipeDirection::Left),
            ActionType::SwipeRight => Some(SwipeDirection::Right),
            ActionType::SwipeUp => Some(SwipeDirection::Up),
            ActionType::SwipeDown => Some(SwipeDirection::Down),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RuleError::UnknownActionType(s.to_string()))
    }
}

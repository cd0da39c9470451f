use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("规则配置无效: 规则 {rule_id}: {reason}")]
    InvalidRule { rule_id: i64, reason: String },

    #[error("规则 {rule_id} 的文本正则无效: {source}")]
    InvalidViewText {
        rule_id: i64,
        #[source]
        source: regex::Error,
    },

    #[error("未知的动作类型: {0}")]
    UnknownActionType(String),

    #[error("屏幕尺寸未初始化, 无法构建滑动动作")]
    ScreenNotInitialized,

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("找不到可点击的节点: {0}")]
    NoClickableNode(String),

    #[error("宿主拒绝了对节点 {0} 的点击")]
    ClickRejected(String),

    #[error("手势分发被拒绝")]
    GestureRejected,

    #[error("全局返回操作被拒绝")]
    NavigationRejected,

    #[error("覆盖层操作失败: {0}")]
    OverlayError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RuleError {
    /// 配置类错误必须向调用方报告, 不能被吞掉
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RuleError::InvalidRule { .. }
                | RuleError::InvalidViewText { .. }
                | RuleError::UnknownActionType(_)
                | RuleError::ScreenNotInitialized
                | RuleError::ConfigError(_)
                | RuleError::Io(_)
        )
    }
}

impl From<serde_json::Error> for RuleError {
    fn from(e: serde_json::Error) -> Self {
        RuleError::ConfigError(e.to_string())
    }
}

use serde::Deserialize;
use std::time::Duration;

use super::RuleError;

/// 引擎配置, 所有字段都有默认值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 覆盖层刷新周期(毫秒)
    pub overlay_refresh_ms: u64,
    /// 点击动作向上查找可点击祖先的最大层数
    pub click_search_depth: usize,
    /// 滑动手势开始前的延迟(毫秒)
    pub swipe_dispatch_delay_ms: u64,
    /// 滑动手势持续时间(毫秒)
    pub swipe_duration_ms: u64,
    /// 删除已触发的规则时是否补发 gone
    pub force_gone_on_remove: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overlay_refresh_ms: 10,
            click_search_depth: 4,
            swipe_dispatch_delay_ms: 200,
            swipe_duration_ms: 50,
            force_gone_on_remove: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(content: &str) -> Result<Self, RuleError> {
        let config: EngineConfig = serde_json::from_str(content)?;
        if config.overlay_refresh_ms == 0 {
            return Err(RuleError::ConfigError(
                "overlay_refresh_ms 必须大于 0".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn overlay_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.overlay_refresh_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "click_search_depth": 5 }"#).unwrap();
        assert_eq!(config.click_search_depth, 5);
        assert_eq!(config.overlay_refresh_ms, 10);
        assert!(config.force_gone_on_remove);
    }

    #[test]
    fn zero_refresh_period_is_rejected() {
        let err = EngineConfig::from_json(r#"{ "overlay_refresh_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, RuleError::ConfigError(_)));
    }
}

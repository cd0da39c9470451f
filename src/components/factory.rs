use std::time::Duration;
use tracing::debug;

use super::{Action, BackAction, BlockAction, ClickAction, MuteAction, SwipeAction};
use crate::host::ActionPrimitives;
use crate::types::{ActionType, EngineConfig, RuleError};

/// 根据动作类型构建动作实例, 宿主能力由构造时注入
#[derive(Debug, Clone)]
pub struct ActionFactory {
    primitives: ActionPrimitives,
    config: EngineConfig,
}

impl ActionFactory {
    pub fn new(primitives: ActionPrimitives, config: EngineConfig) -> Self {
        Self { primitives, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn build(&self, action_type: ActionType) -> Result<Action, RuleError> {
        debug!("构建动作: {}", action_type);
        let action = match action_type {
            ActionType::Click => Action::Click(ClickAction::new(self.config.click_search_depth)),
            ActionType::SwipeLeft
            | ActionType::SwipeRight
            | ActionType::SwipeUp
            | ActionType::SwipeDown => {
                let direction = action_type.swipe_direction().ok_or_else(|| {
                    RuleError::ConfigError(format!("{} 不是滑动动作", action_type))
                })?;
                Action::Swipe(SwipeAction::new(
                    direction,
                    self.primitives.screen,
                    Duration::from_millis(self.config.swipe_dispatch_delay_ms),
                    Duration::from_millis(self.config.swipe_duration_ms),
                    self.primitives.gestures.clone(),
                )?)
            }
            ActionType::Mute => Action::Mute(MuteAction::new(self.primitives.audio.clone())),
            ActionType::Back => Action::Back(BackAction::new(self.primitives.navigator.clone())),
            ActionType::Block => Action::Block(BlockAction::new(
                self.primitives.overlays.clone(),
                self.primitives.screen,
                self.config.overlay_refresh_interval(),
            )),
        };
        Ok(action)
    }

    /// 按名称构建, 未知名称是配置错误
    pub fn build_named(&self, name: &str) -> Result<Action, RuleError> {
        self.build(name.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DryRunHost;
    use crate::types::ScreenMetrics;
    use std::sync::Arc;

    fn factory(screen: Option<ScreenMetrics>) -> ActionFactory {
        let host = Arc::new(DryRunHost::new());
        ActionFactory::new(
            ActionPrimitives::from_host(host, screen),
            EngineConfig::default(),
        )
    }

    #[test]
    fn builds_matching_variant_for_every_type() {
        let factory = factory(Some(ScreenMetrics::new(1080, 1920)));
        for action_type in ActionType::ALL {
            let action = factory.build(action_type).unwrap();
            let expected = match action_type {
                ActionType::Click => "click",
                ActionType::SwipeLeft
                | ActionType::SwipeRight
                | ActionType::SwipeUp
                | ActionType::SwipeDown => "swipe",
                ActionType::Mute => "mute",
                ActionType::Block => "block",
                ActionType::Back => "back",
            };
            assert_eq!(action.kind(), expected);
        }
    }

    #[test]
    fn swipe_without_screen_metrics_is_fatal() {
        let factory = factory(None);
        assert!(matches!(
            factory.build(ActionType::SwipeLeft),
            Err(RuleError::ScreenNotInitialized)
        ));
        // 其他动作不需要屏幕尺寸
        assert!(factory.build(ActionType::Block).is_ok());
        assert!(factory.build(ActionType::Click).is_ok());
    }

    #[test]
    fn unknown_name_is_fatal() {
        let factory = factory(None);
        assert!(matches!(
            factory.build_named("vibrate"),
            Err(RuleError::UnknownActionType(_))
        ));
        assert!(factory.build_named("back").is_ok());
    }
}

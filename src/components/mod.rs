mod back;
mod block;
mod click;
mod factory;
mod mute;
mod swipe;

pub use back::BackAction;
pub use block::{bounds_acceptable, BlockAction};
pub use click::ClickAction;
pub use factory::ActionFactory;
pub use mute::MuteAction;
pub use swipe::{build_swipe, SwipeAction};

use crate::tree::ElementNode;
use crate::types::RuleError;

/// 规则匹配后执行的动作
///
/// 每个规则运行时只构造一次, 在规则的整个生命周期内复用。
#[derive(Debug)]
pub enum Action {
    Click(ClickAction),
    Swipe(SwipeAction),
    Mute(MuteAction),
    Back(BackAction),
    Block(BlockAction),
}

impl Action {
    /// 规则从不可见变为可见时调用, `node` 是相对路径解析后的目标节点
    pub async fn on_seen<N: ElementNode>(&mut self, node: &N) -> Result<(), RuleError> {
        match self {
            Action::Click(action) => action.on_seen(node),
            Action::Swipe(action) => action.on_seen().await,
            Action::Mute(action) => {
                action.on_seen();
                Ok(())
            }
            Action::Back(action) => action.on_seen(),
            Action::Block(action) => action.on_seen(node),
        }
    }

    /// 规则从可见变为不可见时调用
    pub async fn on_gone(&mut self) -> Result<(), RuleError> {
        match self {
            Action::Mute(action) => action.on_gone(),
            Action::Block(action) => action.on_gone(),
            Action::Click(_) | Action::Swipe(_) | Action::Back(_) => {}
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Click(_) => "click",
            Action::Swipe(_) => "swipe",
            Action::Mute(_) => "mute",
            Action::Back(_) => "back",
            Action::Block(_) => "block",
        }
    }
}

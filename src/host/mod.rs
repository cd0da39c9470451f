mod dry_run;

pub use dry_run::{Actuation, DryRunHost};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::types::{Point, Rect, RuleError, ScreenMetrics};

/// 一条直线手势: 起点、终点和时间参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    pub start: Point,
    pub end: Point,
    /// 手势开始前的延迟
    pub start_delay: Duration,
    /// 手势持续时间
    pub duration: Duration,
}

/// 覆盖层句柄, 由宿主分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// 宿主的手势分发能力
#[async_trait]
pub trait GestureDispatcher: Send + Sync {
    /// 分发手势, 返回宿主是否接受
    async fn dispatch(&self, gesture: &Gesture) -> bool;
}

/// 宿主的媒体音量控制
pub trait AudioControl: Send + Sync {
    fn mute(&self);
    fn unmute(&self);
}

/// 宿主的覆盖层窗口管理
pub trait OverlayManager: Send + Sync {
    /// 创建并显示一个不透明覆盖层
    fn show(&self, bounds: Rect) -> Result<OverlayId, RuleError>;
    /// 移动或缩放覆盖层
    fn update(&self, overlay: OverlayId, bounds: Rect) -> Result<(), RuleError>;
    fn remove(&self, overlay: OverlayId);
}

/// 宿主的全局导航
pub trait GlobalNavigator: Send + Sync {
    /// 执行全局返回, 返回宿主是否接受
    fn back(&self) -> bool;
}

/// 动作工厂需要注入的全部宿主能力
#[derive(Clone)]
pub struct ActionPrimitives {
    pub gestures: Arc<dyn GestureDispatcher>,
    pub audio: Arc<dyn AudioControl>,
    pub overlays: Arc<dyn OverlayManager>,
    pub navigator: Arc<dyn GlobalNavigator>,
    /// 屏幕尺寸, 滑动动作必需
    pub screen: Option<ScreenMetrics>,
}

impl ActionPrimitives {
    /// 用同一个宿主对象提供全部能力
    pub fn from_host<H>(host: Arc<H>, screen: Option<ScreenMetrics>) -> Self
    where
        H: GestureDispatcher + AudioControl + OverlayManager + GlobalNavigator + 'static,
    {
        Self {
            gestures: host.clone(),
            audio: host.clone(),
            overlays: host.clone(),
            navigator: host,
            screen,
        }
    }

    pub fn with_screen(mut self, screen: ScreenMetrics) -> Self {
        self.screen = Some(screen);
        self
    }
}

impl fmt::Debug for ActionPrimitives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPrimitives")
            .field("primitives", &"<host primitives>")
            .field("screen", &self.screen)
            .finish()
    }
}

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::host::{Gesture, GestureDispatcher};
use crate::types::{Point, RuleError, ScreenMetrics, SwipeDirection};

/// 滑动动作, 手势在构造时根据屏幕尺寸一次性生成
pub struct SwipeAction {
    direction: SwipeDirection,
    gesture: Gesture,
    dispatcher: Arc<dyn GestureDispatcher>,
}

impl SwipeAction {
    pub fn new(
        direction: SwipeDirection,
        screen: Option<ScreenMetrics>,
        start_delay: Duration,
        duration: Duration,
        dispatcher: Arc<dyn GestureDispatcher>,
    ) -> Result<Self, RuleError> {
        let screen = screen.ok_or(RuleError::ScreenNotInitialized)?;
        Ok(Self {
            direction,
            gesture: build_swipe(direction, screen, start_delay, duration),
            dispatcher,
        })
    }

    pub fn direction(&self) -> SwipeDirection {
        self.direction
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub async fn on_seen(&self) -> Result<(), RuleError> {
        debug!("分发 {:?} 滑动手势", self.direction);
        if !self.dispatcher.dispatch(&self.gesture).await {
            error!("手势分发失败");
            return Err(RuleError::GestureRejected);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeAction")
            .field("direction", &self.direction)
            .field("gesture", &self.gesture)
            .finish()
    }
}

/// 滑动覆盖屏幕中间的一半, 例如左滑从 3/4 宽度处滑到 1/4 宽度处
pub fn build_swipe(
    direction: SwipeDirection,
    screen: ScreenMetrics,
    start_delay: Duration,
    duration: Duration,
) -> Gesture {
    let middle_y = screen.height / 2;
    let top = screen.height / 4;
    let bottom = top * 3;
    let middle_x = screen.width / 2;
    let left = screen.width / 4;
    let right = left * 3;

    let (start, end) = match direction {
        SwipeDirection::Left => (Point::new(right, middle_y), Point::new(left, middle_y)),
        SwipeDirection::Right => (Point::new(left, middle_y), Point::new(right, middle_y)),
        SwipeDirection::Up => (Point::new(middle_x, bottom), Point::new(middle_x, top)),
        SwipeDirection::Down => (Point::new(middle_x, top), Point::new(middle_x, bottom)),
    };
    Gesture {
        start,
        end,
        start_delay,
        duration,
    }
}

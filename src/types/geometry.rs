use serde::{Deserialize, Serialize};

/// 屏幕坐标系中的矩形, 与宿主的 bounds-in-screen 一致 (右/下边界不包含)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// 以左上角和尺寸构造
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// 宿主给出的边界可能是任意值, 在 i64 中计算避免溢出
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 屏幕像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: i32,
    pub height: i32,
}

impl ScreenMetrics {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// 判断覆盖层边界是否可用: 尺寸为正, 且不超过屏幕
    pub fn accepts(&self, bounds: &Rect) -> bool {
        bounds.width() > 0
            && bounds.height() > 0
            && bounds.width() <= i64::from(self.width)
            && bounds.height() <= i64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_dimensions() {
        let r = Rect::from_origin(10, 20, 100, 50);
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
        assert_eq!(r.right, 110);
    }

    #[test]
    fn screen_rejects_degenerate_and_oversized_bounds() {
        let screen = ScreenMetrics::new(1080, 1920);
        assert!(screen.accepts(&Rect::new(0, 0, 1080, 1920)));
        assert!(!screen.accepts(&Rect::EMPTY));
        assert!(!screen.accepts(&Rect::new(50, 50, 40, 100)));
        assert!(!screen.accepts(&Rect::new(0, 0, 1081, 100)));
        assert!(!screen.accepts(&Rect::new(0, 0, 100, 2000)));
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let wide = Rect::new(i32::MIN, 0, i32::MAX, 100);
        assert_eq!(wide.width(), u32::MAX as i64);
        assert_eq!(Rect::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN).height(), -(u32::MAX as i64));
        assert!(!ScreenMetrics::new(1080, 1920).accepts(&wide));
    }
}

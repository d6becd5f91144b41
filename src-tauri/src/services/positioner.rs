//! # 浮动按钮定位
//!
//! 将选区包围矩形换算为浮动操作按钮的锚点坐标，并保证按钮完整落在视口内：
//! - 优先放在选区正上方，水平居中
//! - 左右越界时贴边收回（保留 padding）
//! - 上方空间不足时翻转到选区下方
//!
//! 返回的 `x` 是按钮水平中心，前端配合 `translateX(-50%)` 使用；`y` 是按钮顶边。

use crate::models::selection::{Anchor, IndicatorPlacement, Point, Rect, Viewport};
use crate::models::settings::AnnotatorConfig;

/// 浮动按钮尺寸与边距
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlMetrics {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl ControlMetrics {
    pub fn from_config(config: &AnnotatorConfig) -> Self {
        Self {
            width: config.control_width,
            height: config.control_height,
            padding: config.control_padding,
        }
    }

    fn half_width(&self) -> f64 {
        self.width / 2.0
    }
}

/// 计算浮动按钮锚点
///
/// # 参数
/// - `rect` - 选区包围矩形
/// - `viewport` - 视口尺寸
/// - `metrics` - 按钮尺寸与边距
///
/// # 返回值
/// 锚点坐标与指示箭头方向
pub fn position(rect: &Rect, viewport: &Viewport, metrics: &ControlMetrics) -> Anchor {
    let half = metrics.half_width();
    let pad = metrics.padding;

    let mut x = rect.center_x();
    if x - half < pad {
        x = half + pad;
    } else if x + half > viewport.width - pad {
        x = viewport.width - half - pad;
    }

    let mut y = rect.top - metrics.height - pad;
    let mut indicator = IndicatorPlacement::Below;
    if y < pad {
        y = rect.bottom() + pad;
        indicator = IndicatorPlacement::Above;
    }

    Anchor {
        point: Point { x, y },
        indicator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ControlMetrics {
        ControlMetrics {
            width: 120.0,
            height: 40.0,
            padding: 10.0,
        }
    }

    const VIEWPORT: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    #[test]
    fn test_preferred_above_and_centered() {
        let anchor = position(&Rect::new(400.0, 300.0, 80.0, 20.0), &VIEWPORT, &metrics());
        assert_eq!(anchor.point, Point { x: 440.0, y: 250.0 });
        assert_eq!(anchor.indicator, IndicatorPlacement::Below);
    }

    #[test]
    fn test_clamp_left_edge() {
        let anchor = position(&Rect::new(5.0, 300.0, 10.0, 20.0), &VIEWPORT, &metrics());
        assert_eq!(anchor.point.x, 70.0);
    }

    #[test]
    fn test_clamp_right_edge() {
        let anchor = position(&Rect::new(1000.0, 300.0, 20.0, 20.0), &VIEWPORT, &metrics());
        assert_eq!(anchor.point.x, 1024.0 - 60.0 - 10.0);
    }

    #[test]
    fn test_flip_below_when_no_room_above() {
        let anchor = position(&Rect::new(400.0, 30.0, 80.0, 18.0), &VIEWPORT, &metrics());
        assert_eq!(anchor.point.y, 30.0 + 18.0 + 10.0);
        assert_eq!(anchor.indicator, IndicatorPlacement::Above);
    }

    #[test]
    fn test_from_config() {
        let m = ControlMetrics::from_config(&AnnotatorConfig::default());
        assert_eq!(m, metrics());
    }
}

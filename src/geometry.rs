use glam::Vec2;
use serde::Serialize;

/// An axis-aligned rectangle in world units, used for rooms, corridors and BSP regions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Check if a point is inside this rectangle (edges included)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// True if the two rectangles overlap or are separated by at most `tolerance`.
    pub fn touches(&self, other: &Rect, tolerance: f32) -> bool {
        self.x <= other.right() + tolerance
            && other.x <= self.right() + tolerance
            && self.y <= other.bottom() + tolerance
            && other.y <= self.bottom() + tolerance
    }

    /// Closest point inside the rectangle after shrinking it by `inset` on every side.
    /// An inset larger than half the rectangle collapses that axis to its center line.
    pub fn clamp_point(&self, point: Vec2, inset: f32) -> Vec2 {
        let clamp_axis = |v: f32, lo: f32, len: f32| {
            if len <= inset * 2.0 {
                lo + len * 0.5
            } else {
                v.clamp(lo + inset, lo + len - inset)
            }
        };
        Vec2::new(
            clamp_axis(point.x, self.x, self.w),
            clamp_axis(point.y, self.y, self.h),
        )
    }

    /// Shift the rectangle (without resizing where possible) so it lies inside `bounds`.
    /// Axes longer than the bounds are cropped to them.
    pub fn fit_within(&self, bounds: &Rect) -> Rect {
        let fit_axis = |pos: f32, len: f32, lo: f32, span: f32| {
            if len >= span {
                (lo, span)
            } else {
                (pos.clamp(lo, lo + span - len), len)
            }
        };
        let (x, w) = fit_axis(self.x, self.w, bounds.x, bounds.w);
        let (y, h) = fit_axis(self.y, self.h, bounds.y, bounds.h);
        Rect::new(x, y, w, h)
    }

    /// The smaller of width and height.
    pub fn min_side(&self) -> f32 {
        self.w.min(self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.center(), Vec2::new(5.0, 5.0));

        let rect2 = Rect::new(5.0, 5.0, 4.0, 6.0);
        assert_eq!(rect2.center(), Vec2::new(7.0, 8.0));
    }

    #[test]
    fn test_touches_overlap_and_edge() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.touches(&Rect::new(5.0, 5.0, 10.0, 10.0), 0.0));
        assert!(a.touches(&Rect::new(10.0, 0.0, 5.0, 5.0), 0.0));
        assert!(!a.touches(&Rect::new(11.0, 0.0, 5.0, 5.0), 0.5));
    }

    #[test]
    fn test_clamp_point_with_inset() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let p = rect.clamp_point(Vec2::new(-50.0, 50.0), 5.0);
        assert_eq!(p, Vec2::new(5.0, 15.0));
        // inset too large for the height collapses to the center line
        let p = rect.clamp_point(Vec2::new(50.0, 0.0), 12.0);
        assert_eq!(p, Vec2::new(50.0, 10.0));
    }

    #[test]
    fn test_fit_within_shifts_inside() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let fitted = Rect::new(-10.0, 80.0, 50.0, 50.0).fit_within(&bounds);
        assert_eq!(fitted, Rect::new(0.0, 50.0, 50.0, 50.0));
    }
}

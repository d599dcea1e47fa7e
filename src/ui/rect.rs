//! Rectangle type for panel layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Check if a point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Split off a strip from the top, returning (strip, rest)
    pub fn split_top(&self, height: f32) -> (Self, Self) {
        let height = height.min(self.h);
        (
            Self::new(self.x, self.y, self.w, height),
            Self::new(self.x, self.y + height, self.w, self.h - height),
        )
    }

    /// Split off a strip from the bottom, returning (rest, strip)
    pub fn split_bottom(&self, height: f32) -> (Self, Self) {
        let height = height.min(self.h);
        (
            Self::new(self.x, self.y, self.w, self.h - height),
            Self::new(self.x, self.bottom() - height, self.w, height),
        )
    }

    /// Split off a strip from the left, returning (strip, rest)
    pub fn split_left(&self, width: f32) -> (Self, Self) {
        let width = width.min(self.w);
        (
            Self::new(self.x, self.y, width, self.h),
            Self::new(self.x + width, self.y, self.w - width, self.h),
        )
    }

    /// Split off a strip from the right, returning (rest, strip)
    pub fn split_right(&self, width: f32) -> (Self, Self) {
        let width = width.min(self.w);
        (
            Self::new(self.x, self.y, self.w - width, self.h),
            Self::new(self.right() - width, self.y, width, self.h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_top_partitions_the_area() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (top, rest) = rect.split_top(20.0);
        assert_eq!(top.h, 20.0);
        assert_eq!(rest.y, 20.0);
        assert_eq!(rest.h, 30.0);
    }

    #[test]
    fn contains_is_exclusive_of_far_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(!rect.contains(10.0, 10.0));
    }
}

//! Axis-aligned bounding boxes in screen orientation: x grows to the right, y grows downward.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Aabb {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.
    }

    /// Move the box vertically so that its bottom edge sits at `y`
    #[inline]
    pub fn set_bottom(&mut self, y: f64) {
        self.y = y - self.height;
    }

    /// Move the box vertically so that its top edge sits at `y`
    #[inline]
    pub fn set_top(&mut self, y: f64) {
        self.y = y;
    }

    /// A copy of this box shifted horizontally by `dx`
    #[inline]
    pub fn translated_x(&self, dx: f64) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }

    /// Whether the open horizontal spans overlap; touching edges do not count
    #[inline]
    pub fn overlaps_x(&self, other: &Self) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    #[inline]
    pub fn overlaps_y(&self, other: &Self) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Whether the interiors of both boxes overlap
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_edges() {
        let mut b = Aabb::new(10., 20., 30., 40.);
        assert_eq!(10., b.left());
        assert_eq!(40., b.right());
        assert_eq!(20., b.top());
        assert_eq!(60., b.bottom());
        assert_eq!(25., b.center_x());

        b.set_bottom(100.);
        assert_eq!(60., b.top());
        assert_eq!(100., b.bottom());
        b.set_top(0.);
        assert_eq!(40., b.bottom());
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::new(0., 0., 10., 10.);
        assert!(a.intersects(&Aabb::new(5., 5., 10., 10.)));
        assert!(a.intersects(&Aabb::new(2., 2., 2., 2.)));
        // touching edges
        assert!(!a.intersects(&Aabb::new(10., 0., 10., 10.)));
        assert!(!a.intersects(&Aabb::new(0., 10., 10., 10.)));
        assert!(!a.intersects(&Aabb::new(20., 20., 1., 1.)));
    }

    #[test]
    fn test_translated() {
        let a = Aabb::new(0., 3., 10., 10.);
        let b = a.translated_x(-15.);
        assert_eq!(Aabb::new(-15., 3., 10., 10.), b);
        assert!(!a.overlaps_x(&b));
        assert!(a.overlaps_x(&a.translated_x(9.5)));
    }
}

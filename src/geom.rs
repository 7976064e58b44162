//! Axis-aligned boxes in pixel space.
//!
//! Every comparison here is inclusive. Two tiles that share an edge are
//! touching, and a point sitting exactly on `max` is inside.

use macroquad::prelude::*;

/// Axis-aligned rectangle defined by its min (top-left) and max
/// (bottom-right) corners. Y grows downwards, like the tile grid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Box from its two corners, taken as given.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box at `pos` with the given size.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Width and height.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Midpoint.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Smallest x.
    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    /// Largest x.
    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Smallest y.
    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Largest y.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Corner at (left, top).
    pub fn top_left(&self) -> Vec2 {
        self.min
    }

    /// Corner at (right, top).
    pub fn top_right(&self) -> Vec2 {
        vec2(self.max.x, self.min.y)
    }

    /// Corner at (left, bottom).
    pub fn bottom_left(&self) -> Vec2 {
        vec2(self.min.x, self.max.y)
    }

    /// Corner at (right, bottom).
    pub fn bottom_right(&self) -> Vec2 {
        self.max
    }

    /// Same box moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Clipped overlap of two boxes, `None` when they do not touch.
    ///
    /// Boxes sharing only an edge yield a zero-area box.
    pub fn intersection(a: &Aabb, b: &Aabb) -> Option<Aabb> {
        if !a.intersects_inclusive(b) {
            return None;
        }
        Some(Aabb {
            min: a.min.max(b.min),
            max: a.max.min(b.max),
        })
    }

    /// True when `p` is inside or on the edge.
    pub fn contains_point_inclusive(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// True when the boxes overlap or share an edge.
    pub fn intersects_inclusive(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Slab test for the ray `origin + t * dir`, `t >= 0`.
    ///
    /// Returns the parametric time of the first contact, `0.0` when the
    /// origin already lies inside the box.
    pub fn intersect_ray(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..2 {
            let (o, d, lo, hi) = match axis {
                0 => (origin.x, dir.x, self.min.x, self.max.x),
                _ => (origin.y, dir.y, self.min.y, self.max.y),
            };

            if d == 0.0 {
                // parallel to this slab
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    /// Segment test from `a` to `b`; the returned time is in `[0, 1]`.
    pub fn intersect_segment(&self, a: Vec2, b: Vec2) -> Option<f32> {
        self.intersect_ray(a, b - a).filter(|t| *t <= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: f32, y: f32) -> Aabb {
        Aabb::from_pos_size(vec2(x, y), vec2(16.0, 16.0))
    }

    #[test]
    fn accessors() {
        let b = Aabb::new(vec2(0.0, 8.0), vec2(32.0, 24.0));
        assert_eq!(b.width(), 32.0);
        assert_eq!(b.height(), 16.0);
        assert_eq!(b.center(), vec2(16.0, 16.0));
        assert_eq!(b.top_right(), vec2(32.0, 8.0));
        assert_eq!(b.bottom_left(), vec2(0.0, 24.0));
        assert_eq!((b.left(), b.right(), b.top(), b.bottom()), (0.0, 32.0, 8.0, 24.0));
    }

    #[test]
    fn point_on_max_corner_is_contained() {
        let b = unit(0.0, 0.0);
        assert!(b.contains_point_inclusive(vec2(16.0, 16.0)));
        assert!(b.contains_point_inclusive(vec2(0.0, 0.0)));
        assert!(!b.contains_point_inclusive(vec2(16.01, 8.0)));
    }

    #[test]
    fn boxes_sharing_an_edge_intersect() {
        let a = unit(0.0, 0.0);
        let b = unit(16.0, 0.0);
        let c = unit(32.5, 0.0);
        assert!(a.intersects_inclusive(&b));
        assert!(b.intersects_inclusive(&a));
        assert!(!a.intersects_inclusive(&c));

        let overlap = Aabb::intersection(&a, &b).expect("edge contact");
        assert_eq!(overlap.width(), 0.0);
        assert_eq!(overlap.height(), 16.0);
        assert!(Aabb::intersection(&a, &c).is_none());
    }

    #[test]
    fn clipped_intersection() {
        let a = Aabb::new(vec2(0.0, 0.0), vec2(20.0, 20.0));
        let b = Aabb::new(vec2(10.0, 5.0), vec2(30.0, 15.0));
        let i = Aabb::intersection(&a, &b).unwrap();
        assert_eq!(i, Aabb::new(vec2(10.0, 5.0), vec2(20.0, 15.0)));
    }

    #[test]
    fn ray_slab_test() {
        let b = unit(16.0, 0.0);
        assert_eq!(b.intersect_ray(vec2(0.0, 8.0), vec2(1.0, 0.0)), Some(16.0));
        assert_eq!(b.intersect_ray(vec2(0.0, 8.0), vec2(-1.0, 0.0)), None);
        assert_eq!(b.intersect_ray(vec2(20.0, 8.0), vec2(1.0, 0.0)), Some(0.0));
        // parallel, outside the slab
        assert_eq!(b.intersect_ray(vec2(0.0, 40.0), vec2(1.0, 0.0)), None);
    }

    #[test]
    fn segment_stops_at_its_end() {
        let b = unit(16.0, 0.0);
        assert_eq!(b.intersect_segment(vec2(0.0, 8.0), vec2(32.0, 8.0)), Some(0.5));
        assert_eq!(b.intersect_segment(vec2(0.0, 8.0), vec2(8.0, 8.0)), None);
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box grown one point at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Inverted box, ready to be merged into.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut result = Self::EMPTY;
        for p in points {
            result.merge(p);
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Grow to include `point`.
    pub fn merge(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to include another box. Merging an empty box is a no-op.
    pub fn merge_aabb(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.merge(other.min);
        self.merge(other.max);
    }

    /// Grown by `margin` on every side. An empty box stays empty.
    pub fn expanded(&self, margin: Vec3) -> Aabb {
        if self.is_empty() {
            *self
        } else {
            Self::new(self.min - margin, self.max + margin)
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let b = Aabb::default();
        assert!(b.is_empty());
        assert!(!b.contains(Vec3::ZERO));
        assert_eq!(b.size(), Vec3::ZERO);
    }

    #[test]
    fn merge_grows_to_fit() {
        let mut b = Aabb::EMPTY;
        b.merge(Vec3::new(1.0, -2.0, 3.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, b.max);

        b.merge(Vec3::new(-1.0, 4.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
        assert!(b.contains(Vec3::new(0.0, 0.0, 1.0)));
        assert!(!b.contains(Vec3::new(2.0, 0.0, 1.0)));
    }

    #[test]
    fn merge_empty_box_is_noop() {
        let mut b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        b.merge_aabb(&Aabb::EMPTY);
        assert_eq!(b, Aabb::new(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn expanded_grows_both_sides() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE).expanded(Vec3::new(0.5, 0.0, 2.0));
        assert_eq!(b.min, Vec3::new(-0.5, 0.0, -2.0));
        assert_eq!(b.max, Vec3::new(1.5, 1.0, 3.0));
        assert!(Aabb::EMPTY.expanded(Vec3::ONE).is_empty());
    }

    #[test]
    fn from_points_center() {
        let b = Aabb::from_points([Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 0.0)]);
        assert_eq!(b.center(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(b.size(), Vec3::new(4.0, 4.0, 0.0));
    }
}

// Copyright 2025 the Tessera contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Axis-aligned bounding volume accumulation.

use super::Vec3;

/// An axis-aligned bounding box defined by its minimum and maximum corners.
///
/// The box is valid iff `min <= max` component-wise. An empty accumulator is
/// represented by [`Aabb::INVALID`], which acts as the neutral element for
/// merging: merging any valid box or point into it yields that box or point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// An invalid `Aabb` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// Useful as a neutral starting point for merging operations.
    pub const INVALID: Self = Self {
        min: Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        max: Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points.
    ///
    /// The `min` field receives the component-wise minimum and `max` the
    /// component-wise maximum regardless of argument order.
    #[inline]
    pub fn from_min_max(min_pt: Vec3, max_pt: Vec3) -> Self {
        Self {
            min: min_pt.min(max_pt),
            max: min_pt.max(max_pt),
        }
    }

    /// Creates a degenerate `Aabb` containing a single point.
    #[inline]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Checks if the `Aabb` is valid (`min <= max` on all axes).
    /// Degenerate boxes where `min == max` are considered valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the full size (width, height, depth) of the `Aabb`.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Checks if a point is contained within or on the boundary of the `Aabb`.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and another one.
    ///
    /// Merging with an invalid box is a no-op; merging an invalid box with a
    /// valid one yields the valid one.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        if !other.is_valid() {
            return *self;
        }
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and an additional point.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }
}

impl Default for Aabb {
    /// Returns the default `Aabb`, which is `Aabb::INVALID`.
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_min_max_swaps_corners() {
        let aabb = Aabb::from_min_max(Vec3::new(4.0, 5.0, 6.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_aabb_from_point_is_valid() {
        let p = Vec3::new(5.0, 6.0, 7.0);
        let aabb = Aabb::from_point(p);
        assert_eq!(aabb.min, p);
        assert_eq!(aabb.max, p);
        assert!(aabb.is_valid());
        assert!(!Aabb::INVALID.is_valid());
    }

    #[test]
    fn test_aabb_merge_point_from_invalid_initializes() {
        let p = Vec3::new(-1.0, 0.5, 2.0);
        let merged = Aabb::INVALID.merged_with_point(p);
        assert_eq!(merged, Aabb::from_point(p));
    }

    #[test]
    fn test_aabb_merge_with_invalid_is_noop() {
        let aabb = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.merge(&Aabb::INVALID), aabb);
        assert_eq!(Aabb::INVALID.merge(&aabb), aabb);
    }

    #[test]
    fn test_aabb_merge_boxes() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_min_max(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5));
        let merged = a.merge(&b);
        assert_eq!(merged.min, Vec3::ZERO);
        assert_eq!(merged.max, Vec3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn test_aabb_accumulation_is_order_independent() {
        let points = [
            Vec3::new(1.0, 5.0, -1.0),
            Vec3::new(0.0, 2.0, 3.0),
            Vec3::new(4.0, 8.0, 0.0),
            Vec3::new(-2.0, 2.5, 1.0),
        ];

        let forward = points
            .iter()
            .fold(Aabb::INVALID, |acc, p| acc.merged_with_point(*p));
        let backward = points
            .iter()
            .rev()
            .fold(Aabb::INVALID, |acc, p| acc.merged_with_point(*p));

        assert_eq!(forward, backward);
        for p in points {
            assert!(forward.contains_point(p));
        }
        assert_eq!(forward.min, Vec3::new(-2.0, 2.0, -1.0));
        assert_eq!(forward.max, Vec3::new(4.0, 8.0, 3.0));
    }

    #[test]
    fn test_aabb_utils() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(3.0, 2.0, 5.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 2.0, 4.0));
    }
}

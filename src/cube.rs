//! Axis-aligned 3D boxes ("cubes")
//!
//! The simulation-space bounding volume shared by bodies, the octree and the
//! depth sorter. A cube is stored as its back-bottom corner plus three
//! non-negative extents; edges, center and corners are all derived from those
//! six scalars on demand.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in simulation space
///
/// `pos` is the back-bottom corner (minimum x/y/z). Extents are assumed
/// non-negative; a cube with any extent <= 0 is "empty" and neither contains
/// nor intersects anything.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cube {
    /// Back-bottom corner (minimum x/y/z)
    pub pos: Vec3,
    /// Extent along +x
    pub width_x: f32,
    /// Extent along +y
    pub width_y: f32,
    /// Extent along +z
    pub height: f32,
}

impl Cube {
    pub fn new(x: f32, y: f32, z: f32, width_x: f32, width_y: f32, height: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            width_x,
            width_y,
            height,
        }
    }

    pub fn from_corner_size(pos: Vec3, size: Vec3) -> Self {
        Self {
            pos,
            width_x: size.x,
            width_y: size.y,
            height: size.z,
        }
    }

    /// Reposition and resize in place
    pub fn set_to(&mut self, x: f32, y: f32, z: f32, width_x: f32, width_y: f32, height: f32) {
        self.pos = Vec3::new(x, y, z);
        self.width_x = width_x;
        self.width_y = width_y;
        self.height = height;
    }

    /// Front face position on x
    #[inline]
    pub fn front_x(&self) -> f32 {
        self.pos.x + self.width_x
    }

    /// Front face position on y
    #[inline]
    pub fn front_y(&self) -> f32 {
        self.pos.y + self.width_y
    }

    /// Top face position on z
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.z + self.height
    }

    /// Bottom face position on z
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.z
    }

    /// Move the back-x face, keeping the front-x face fixed
    pub fn set_back_x(&mut self, x: f32) {
        self.width_x = self.front_x() - x;
        self.pos.x = x;
    }

    /// Move the back-y face, keeping the front-y face fixed
    pub fn set_back_y(&mut self, y: f32) {
        self.width_y = self.front_y() - y;
        self.pos.y = y;
    }

    /// Move the bottom face, keeping the top face fixed
    pub fn set_bottom(&mut self, z: f32) {
        self.height = self.top() - z;
        self.pos.z = z;
    }

    /// Move the front-x face by resizing; the origin stays put
    pub fn set_front_x(&mut self, x: f32) {
        self.width_x = x - self.pos.x;
    }

    /// Move the front-y face by resizing; the origin stays put
    pub fn set_front_y(&mut self, y: f32) {
        self.width_y = y - self.pos.y;
    }

    /// Move the top face by resizing; the origin stays put
    pub fn set_top(&mut self, z: f32) {
        self.height = z - self.pos.z;
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width_x * 0.5
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.width_y * 0.5
    }

    #[inline]
    pub fn center_z(&self) -> f32 {
        self.pos.z + self.height * 0.5
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(self.center_x(), self.center_y(), self.center_z())
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width_x, self.width_y, self.height)
    }

    pub fn volume(&self) -> f32 {
        self.width_x * self.width_y * self.height
    }

    /// True when any extent is zero or negative
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width_x <= 0.0 || self.width_y <= 0.0 || self.height <= 0.0
    }

    /// The eight corners, derived on demand. Order: the four bottom corners
    /// counter-clockwise from `pos`, then the four top corners above them.
    pub fn corners(&self) -> [Vec3; 8] {
        let p = self.pos;
        let fx = self.front_x();
        let fy = self.front_y();
        let top = self.top();
        [
            p,
            Vec3::new(fx, p.y, p.z),
            Vec3::new(fx, fy, p.z),
            Vec3::new(p.x, fy, p.z),
            Vec3::new(p.x, p.y, top),
            Vec3::new(fx, p.y, top),
            Vec3::new(fx, fy, top),
            Vec3::new(p.x, fy, top),
        ]
    }

    /// Inclusive containment test; points on any face count as inside
    pub fn contains(&self, x: f32, y: f32, z: f32) -> bool {
        if self.is_empty() {
            return false;
        }
        x >= self.pos.x
            && x <= self.front_x()
            && y >= self.pos.y
            && y <= self.front_y()
            && z >= self.pos.z
            && z <= self.top()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.contains(p.x, p.y, p.z)
    }

    /// Containment on the ground plane only
    pub fn contains_xy(&self, x: f32, y: f32) -> bool {
        if self.width_x <= 0.0 || self.width_y <= 0.0 {
            return false;
        }
        x >= self.pos.x && x <= self.front_x() && y >= self.pos.y && y <= self.front_y()
    }

    /// Strict overlap test; cubes that merely share a face do not intersect
    pub fn intersects(&self, other: &Cube) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.front_x() > self.pos.x
            && other.pos.x < self.front_x()
            && other.front_y() > self.pos.y
            && other.pos.y < self.front_y()
            && other.top() > self.pos.z
            && other.pos.z < self.top()
    }

    /// Strict overlap test on x/y only
    pub fn intersects_xy(&self, other: &Cube) -> bool {
        if self.width_x <= 0.0 || self.width_y <= 0.0 {
            return false;
        }
        if other.width_x <= 0.0 || other.width_y <= 0.0 {
            return false;
        }
        other.front_x() > self.pos.x
            && other.pos.x < self.front_x()
            && other.front_y() > self.pos.y
            && other.pos.y < self.front_y()
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.pos += delta;
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        let mut out = *self;
        out.pos += delta;
        out
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_cube() -> impl Strategy<Value = Cube> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            -500.0f32..500.0,
            0.1f32..100.0,
            0.1f32..100.0,
            0.1f32..100.0,
        )
            .prop_map(|(x, y, z, wx, wy, h)| Cube::new(x, y, z, wx, wy, h))
    }

    proptest! {
        #[test]
        fn prop_intersects_symmetric(a in arb_cube(), b in arb_cube()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_contains_center(cube in arb_cube()) {
            let c = cube.center();
            prop_assert!(cube.contains(c.x, c.y, c.z));
        }

        #[test]
        fn prop_self_intersects(cube in arb_cube()) {
            prop_assert!(cube.intersects(&cube));
        }
    }
}

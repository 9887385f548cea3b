//! Axonometric projection and depth ordering
//!
//! Maps 3D simulation coordinates to 2D screen coordinates at a configurable
//! projection angle, inverts that mapping onto a chosen z-plane, and orders
//! positioned objects back-to-front for painter's-algorithm rendering. Two
//! sorts are provided: a cheap scalar heuristic for flat scenes and an exact
//! topological sort for stacked ones.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use crate::consts::{CLASSIC, SORT_PADDING};
use crate::cube::Cube;

/// Smallest distance the projection angle keeps from 0 and pi/2, so the
/// inverse mapping stays solvable
const MIN_ANGLE: f32 = 1.0e-3;

/// Implemented by anything the depth sorters can order
///
/// The sorters write each object's computed key through [`set_depth`] and
/// reorder the slice by it; hosts that keep their own display list can instead
/// re-sort by the stored key after the call.
///
/// [`set_depth`]: DepthSortable::set_depth
pub trait DepthSortable {
    /// Position used for behind-ness tests (the back-bottom reference point)
    fn depth_position(&self) -> Vec3;
    /// Bounds used for behind-ness tests
    fn depth_bounds(&self) -> Cube;
    /// The stored sort key
    fn depth(&self) -> f32;
    /// Receives the computed sort key
    fn set_depth(&mut self, depth: f32);
}

/// Bidirectional mapping between 3D simulation space and 2D screen space
#[derive(Debug, Clone)]
pub struct Projector {
    angle: f32,
    cos: f32,
    sin: f32,
    /// Anchor ratio applied against the viewport; (0.5, 0.0) centers
    /// horizontally and keeps the origin at the top
    pub anchor: Vec2,
    /// Host render-surface dimensions the anchor ratio scales against
    pub viewport: Vec2,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(CLASSIC)
    }
}

impl Projector {
    pub fn new(angle: f32) -> Self {
        Self::with_viewport(angle, Vec2::ZERO)
    }

    pub fn with_viewport(angle: f32, viewport: Vec2) -> Self {
        let mut projector = Self {
            angle: 0.0,
            cos: 0.0,
            sin: 0.0,
            anchor: Vec2::new(0.5, 0.0),
            viewport,
        };
        projector.set_projection_angle(angle);
        projector
    }

    #[inline]
    pub fn projection_angle(&self) -> f32 {
        self.angle
    }

    /// Change the projection angle; the trigonometric factors are recomputed
    /// here and nowhere else. Angles outside (0, pi/2) are clamped.
    pub fn set_projection_angle(&mut self, angle: f32) {
        let clamped = angle.clamp(MIN_ANGLE, FRAC_PI_2 - MIN_ANGLE);
        if clamped != angle {
            log::warn!("projection angle {angle} outside (0, pi/2), clamped to {clamped}");
        }
        self.angle = clamped;
        self.cos = clamped.cos();
        self.sin = clamped.sin();
    }

    /// Project a simulation-space point to screen space
    #[inline]
    pub fn project(&self, p: Vec3) -> Vec2 {
        Vec2::new(
            (p.x - p.y) * self.cos + self.anchor.x * self.viewport.x,
            (p.x + p.y) * self.sin - p.z + self.anchor.y * self.viewport.y,
        )
    }

    /// Project ignoring height; useful for ground-plane-only placement
    #[inline]
    pub fn project_xy(&self, p: Vec3) -> Vec2 {
        Vec2::new(
            (p.x - p.y) * self.cos + self.anchor.x * self.viewport.x,
            (p.x + p.y) * self.sin + self.anchor.y * self.viewport.y,
        )
    }

    /// Exact inverse of [`project`] restricted to the z-plane `z`
    ///
    /// [`project`]: Projector::project
    pub fn unproject(&self, screen: Vec2, z: f32) -> Vec3 {
        let sx = (screen.x - self.anchor.x * self.viewport.x) / self.cos;
        let sy = (screen.y - self.anchor.y * self.viewport.y + z) / self.sin;
        Vec3::new((sx + sy) * 0.5, (sy - sx) * 0.5, z)
    }

    /// Order objects by the scalar depth heuristic `x + y + 1.25 * z`
    ///
    /// Stable: objects with equal depth keep their input order, so flat scenes
    /// do not flicker frame to frame. Misorders some stacked 3D
    /// configurations; use [`topological_sort`] for those.
    ///
    /// [`topological_sort`]: Projector::topological_sort
    pub fn simple_sort<T: DepthSortable>(&self, objects: &mut [T]) {
        for obj in objects.iter_mut() {
            let p = obj.depth_position();
            obj.set_depth(p.x + p.y + p.z * 1.25);
        }
        sort_by_depth(objects);
    }

    /// Exact back-to-front ordering via an is-behind graph, with the default
    /// padding
    pub fn topological_sort<T: DepthSortable>(&self, objects: &mut [T]) {
        self.topological_sort_padded(objects, SORT_PADDING);
    }

    /// Exact back-to-front ordering via an is-behind graph
    ///
    /// For every pair, `b` is recorded as behind `a` when `b`'s position,
    /// shrunk by `padding`, sits strictly behind `a`'s bounds on all three
    /// axes. A depth-first visit then keys every object after everything
    /// behind it. Cyclic behind relationships (mutual partial occlusion) are
    /// not detected; the visited flag short-circuits them and the result is
    /// some total order, not necessarily a correct one.
    pub fn topological_sort_padded<T: DepthSortable>(&self, objects: &mut [T], padding: f32) {
        let len = objects.len();

        // Short-lived adjacency, rebuilt per call and discarded
        let mut behind: Vec<Vec<usize>> = vec![Vec::new(); len];
        for i in 0..len {
            let bounds = objects[i].depth_bounds();
            for j in 0..len {
                if i == j {
                    continue;
                }
                let p = objects[j].depth_position();
                if p.x + padding < bounds.front_x() - padding
                    && p.y + padding < bounds.front_y() - padding
                    && p.z + padding < bounds.top() - padding
                {
                    behind[i].push(j);
                }
            }
        }

        let mut visited = vec![false; len];
        let mut keys = vec![0usize; len];
        let mut next_key = 0usize;
        for i in 0..len {
            visit(i, &behind, &mut visited, &mut keys, &mut next_key);
        }

        for (i, obj) in objects.iter_mut().enumerate() {
            obj.set_depth(keys[i] as f32);
        }
        sort_by_depth(objects);
    }
}

/// Depth-first visit assigning each node a key greater than everything
/// recorded behind it
fn visit(
    node: usize,
    behind: &[Vec<usize>],
    visited: &mut [bool],
    keys: &mut [usize],
    next_key: &mut usize,
) {
    if visited[node] {
        return;
    }
    visited[node] = true;
    for &back in &behind[node] {
        visit(back, behind, visited, keys, next_key);
    }
    keys[node] = *next_key;
    *next_key += 1;
}

fn sort_by_depth<T: DepthSortable>(objects: &mut [T]) {
    objects.sort_by(|a, b| {
        a.depth()
            .partial_cmp(&b.depth())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Prop {
        name: &'static str,
        bounds: Cube,
        depth: f32,
    }

    impl Prop {
        fn new(name: &'static str, x: f32, y: f32, z: f32, size: f32) -> Self {
            Self {
                name,
                bounds: Cube::new(x, y, z, size, size, size),
                depth: 0.0,
            }
        }
    }

    impl DepthSortable for Prop {
        fn depth_position(&self) -> Vec3 {
            self.bounds.pos
        }
        fn depth_bounds(&self) -> Cube {
            self.bounds
        }
        fn depth(&self) -> f32 {
            self.depth
        }
        fn set_depth(&mut self, depth: f32) {
            self.depth = depth;
        }
    }

    fn names(props: &[Prop]) -> Vec<&'static str> {
        props.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_project_classic_angle() {
        let projector = Projector::new(crate::consts::CLASSIC);
        let screen = projector.project(Vec3::new(10.0, 0.0, 0.0));
        // cos(atan(0.5)) = 2/sqrt(5), sin = 1/sqrt(5)
        assert!((screen.x - 8.944).abs() < 0.01);
        assert!((screen.y - 4.472).abs() < 0.01);
    }

    #[test]
    fn test_project_applies_anchor_offset() {
        let mut projector = Projector::with_viewport(crate::consts::CLASSIC, Vec2::new(800.0, 600.0));
        projector.anchor = Vec2::new(0.5, 0.0);
        let origin = projector.project(Vec3::ZERO);
        assert_eq!(origin, Vec2::new(400.0, 0.0));
    }

    #[test]
    fn test_project_xy_ignores_height() {
        let projector = Projector::new(crate::consts::ISOMETRIC);
        let flat = projector.project_xy(Vec3::new(4.0, 2.0, 100.0));
        let grounded = projector.project(Vec3::new(4.0, 2.0, 0.0));
        assert!((flat - grounded).length() < 1e-6);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let projector = Projector::with_viewport(crate::consts::CLASSIC, Vec2::new(800.0, 600.0));
        let p = Vec3::new(12.5, -3.75, 20.0);
        let back = projector.unproject(projector.project(p), p.z);
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn test_angle_clamped_to_open_interval() {
        let projector = Projector::new(0.0);
        assert!(projector.projection_angle() > 0.0);
        let projector = Projector::new(FRAC_PI_2);
        assert!(projector.projection_angle() < FRAC_PI_2);
    }

    #[test]
    fn test_simple_sort_orders_by_depth() {
        let projector = Projector::default();
        let mut props = vec![
            Prop::new("front", 20.0, 20.0, 0.0, 5.0),
            Prop::new("back", 0.0, 0.0, 0.0, 5.0),
            Prop::new("mid", 10.0, 10.0, 0.0, 5.0),
        ];
        projector.simple_sort(&mut props);
        assert_eq!(names(&props), vec!["back", "mid", "front"]);
    }

    #[test]
    fn test_simple_sort_is_stable() {
        let projector = Projector::default();
        // Same depth scalar: x+y identical, z zero
        let mut props = vec![
            Prop::new("first", 5.0, 5.0, 0.0, 2.0),
            Prop::new("second", 6.0, 4.0, 0.0, 2.0),
            Prop::new("third", 4.0, 6.0, 0.0, 2.0),
        ];
        projector.simple_sort(&mut props);
        assert_eq!(names(&props), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_topological_sort_respects_behind_relation() {
        let projector = Projector::default();
        // A chain along +x: each object occludes the one behind it
        let mut props = vec![
            Prop::new("c", 20.0, 0.0, 0.0, 5.0),
            Prop::new("a", 0.0, 0.0, 0.0, 5.0),
            Prop::new("b", 10.0, 0.0, 0.0, 5.0),
        ];
        projector.topological_sort(&mut props);
        assert_eq!(names(&props), vec!["a", "b", "c"]);
        assert!(props[0].depth < props[1].depth);
        assert!(props[1].depth < props[2].depth);
    }

    #[test]
    fn test_topological_sort_stacked_column() {
        let projector = Projector::default();
        // Boxes stacked on z; lower boxes draw first
        let mut props = vec![
            Prop::new("top", 0.0, 0.0, 20.0, 5.0),
            Prop::new("bottom", 0.0, 0.0, 0.0, 5.0),
            Prop::new("middle", 0.0, 0.0, 10.0, 5.0),
        ];
        projector.topological_sort(&mut props);
        assert_eq!(names(&props), vec!["bottom", "middle", "top"]);
    }

    #[test]
    fn test_topological_sort_cycle_degrades_to_total_order() {
        let projector = Projector::default();
        // Interpenetrating boxes where each reads as behind the other
        let mut props = vec![
            Prop::new("a", 0.0, 0.0, 0.0, 10.0),
            Prop::new("b", 2.0, 2.0, 2.0, 10.0),
        ];
        projector.topological_sort(&mut props);
        // No panic, every key assigned and distinct
        assert_ne!(props[0].depth, props[1].depth);
    }
}

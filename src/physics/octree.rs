//! Octree broad phase
//!
//! Recursive 8-way partition over axis-aligned cubes, used to prune collision
//! candidates before the exact narrow-phase test. Retrieval may return false
//! positives (callers re-test every candidate) but never false negatives.
//!
//! In quad mode the z axis is ignored: nodes split into 4 children spanning
//! the node's full height, for worlds that need no vertical pruning.

use crate::consts::{TREE_MAX_LEVELS, TREE_MAX_OBJECTS};
use crate::cube::Cube;

/// A spatial index of `(Cube, T)` entries
///
/// A node holds entries directly until it exceeds `max_objects`; it then
/// splits into octants and pushes down every entry that fits wholly inside
/// one. Entries straddling a midplane stay at the split level.
#[derive(Debug, Clone)]
pub struct Octree<T> {
    bounds: Cube,
    level: usize,
    max_objects: usize,
    max_levels: usize,
    quad: bool,
    entries: Vec<(Cube, T)>,
    children: Vec<Octree<T>>,
}

impl<T: Copy> Octree<T> {
    pub fn new(bounds: Cube) -> Self {
        Self::with_config(bounds, TREE_MAX_OBJECTS, TREE_MAX_LEVELS, false)
    }

    pub fn with_config(bounds: Cube, max_objects: usize, max_levels: usize, quad: bool) -> Self {
        Self {
            bounds,
            level: 0,
            max_objects,
            max_levels,
            quad,
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    fn child(bounds: Cube, level: usize, max_objects: usize, max_levels: usize, quad: bool) -> Self {
        Self {
            bounds,
            level,
            max_objects,
            max_levels,
            quad,
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn bounds(&self) -> &Cube {
        &self.bounds
    }

    /// Drop all entries and children, keeping the configuration and region
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
    }

    /// Clear and rebind the root region
    pub fn reset(&mut self, bounds: Cube) {
        self.clear();
        self.bounds = bounds;
    }

    /// Number of entries held by this node and all descendants
    pub fn total_len(&self) -> usize {
        self.entries.len() + self.children.iter().map(Octree::total_len).sum::<usize>()
    }

    pub fn insert(&mut self, cube: Cube, item: T) {
        if !self.children.is_empty() {
            if let Some(i) = self.octant(&cube) {
                self.children[i].insert(cube, item);
                return;
            }
        }

        self.entries.push((cube, item));

        if self.entries.len() > self.max_objects
            && self.level < self.max_levels
            && self.children.is_empty()
        {
            self.split();
            // Push down everything that fits wholly inside one child;
            // straddlers stay here
            let held = std::mem::take(&mut self.entries);
            for (cube, item) in held {
                match self.octant(&cube) {
                    Some(i) => self.children[i].insert(cube, item),
                    None => self.entries.push((cube, item)),
                }
            }
        }
    }

    /// Collect every candidate near the query cube
    pub fn retrieve(&self, query: &Cube) -> Vec<(Cube, T)> {
        let mut out = Vec::new();
        self.retrieve_into(query, &mut out);
        out
    }

    /// Collect candidates into a caller-owned buffer, appending
    pub fn retrieve_into(&self, query: &Cube, out: &mut Vec<(Cube, T)>) {
        out.extend_from_slice(&self.entries);
        if self.children.is_empty() {
            return;
        }
        match self.octant(query) {
            Some(i) => self.children[i].retrieve_into(query, out),
            // Straddling query: every octant may hold a hit
            None => {
                for child in &self.children {
                    child.retrieve_into(query, out);
                }
            }
        }
    }

    /// Index of the child octant wholly containing `cube`, if any
    ///
    /// Bit 0 is the +x half, bit 1 the +y half, bit 2 the +z half, so
    /// 0 = (-x,-y,-z) up to 7 = (+x,+y,+z). Quad mode drops the z bit.
    fn octant(&self, cube: &Cube) -> Option<usize> {
        let mid = self.bounds.center();
        let x = axis_half(cube.pos.x, cube.front_x(), mid.x)?;
        let y = axis_half(cube.pos.y, cube.front_y(), mid.y)?;
        let z = if self.quad {
            0
        } else {
            axis_half(cube.pos.z, cube.top(), mid.z)?
        };
        Some(x | (y << 1) | (z << 2))
    }

    fn split(&mut self) {
        let p = self.bounds.pos;
        let half_x = self.bounds.width_x * 0.5;
        let half_y = self.bounds.width_y * 0.5;
        let half_z = self.bounds.height * 0.5;

        let count = if self.quad { 4 } else { 8 };
        self.children.reserve_exact(count);
        for i in 0..count {
            let x = if i & 1 != 0 { p.x + half_x } else { p.x };
            let y = if i & 2 != 0 { p.y + half_y } else { p.y };
            let (z, height) = if self.quad {
                (p.z, self.bounds.height)
            } else if i & 4 != 0 {
                (p.z + half_z, half_z)
            } else {
                (p.z, half_z)
            };
            self.children.push(Octree::child(
                Cube::new(x, y, z, half_x, half_y, height),
                self.level + 1,
                self.max_objects,
                self.max_levels,
                self.quad,
            ));
        }
    }
}

/// Which half of an axis a span occupies: 0 below the midplane, 1 above,
/// None when it straddles
fn axis_half(lo: f32, hi: f32, mid: f32) -> Option<usize> {
    if lo < mid && hi < mid {
        Some(0)
    } else if lo > mid {
        Some(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_bounds() -> Cube {
        Cube::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0)
    }

    fn unit_cube(x: f32, y: f32, z: f32) -> Cube {
        Cube::new(x, y, z, 2.0, 2.0, 2.0)
    }

    #[test]
    fn test_insert_and_retrieve_single() {
        let mut tree: Octree<usize> = Octree::new(world_bounds());
        tree.insert(unit_cube(10.0, 10.0, 10.0), 0);
        let hits = tree.retrieve(&unit_cube(9.0, 9.0, 9.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, 0);
    }

    #[test]
    fn test_split_after_capacity() {
        let mut tree: Octree<usize> = Octree::with_config(world_bounds(), 2, 4, false);
        // All in the (-x,-y,-z) octant
        for i in 0..5 {
            tree.insert(unit_cube(5.0 + i as f32, 5.0, 5.0), i);
        }
        assert_eq!(tree.total_len(), 5);
        // A query in the far octant should not sweep up the near cluster
        let far = tree.retrieve(&unit_cube(90.0, 90.0, 90.0));
        assert!(far.len() < 5);
    }

    #[test]
    fn test_straddlers_stay_at_split_level() {
        let mut tree: Octree<usize> = Octree::with_config(world_bounds(), 1, 4, false);
        // Crosses the x midplane at 50
        let straddler = Cube::new(45.0, 10.0, 10.0, 10.0, 2.0, 2.0);
        tree.insert(straddler, 99);
        tree.insert(unit_cube(10.0, 10.0, 10.0), 0);
        tree.insert(unit_cube(80.0, 80.0, 80.0), 1);

        // The straddler must come back for queries on either side of the plane
        let left = tree.retrieve(&unit_cube(44.0, 10.0, 10.0));
        assert!(left.iter().any(|(_, i)| *i == 99));
        let right = tree.retrieve(&unit_cube(56.0, 10.0, 10.0));
        assert!(right.iter().any(|(_, i)| *i == 99));
    }

    #[test]
    fn test_octant_indexing_convention() {
        let tree: Octree<usize> = Octree::new(world_bounds());
        assert_eq!(tree.octant(&unit_cube(10.0, 10.0, 10.0)), Some(0));
        assert_eq!(tree.octant(&unit_cube(80.0, 10.0, 10.0)), Some(1));
        assert_eq!(tree.octant(&unit_cube(10.0, 80.0, 10.0)), Some(2));
        assert_eq!(tree.octant(&unit_cube(80.0, 80.0, 10.0)), Some(3));
        assert_eq!(tree.octant(&unit_cube(10.0, 10.0, 80.0)), Some(4));
        assert_eq!(tree.octant(&unit_cube(80.0, 10.0, 80.0)), Some(5));
        assert_eq!(tree.octant(&unit_cube(10.0, 80.0, 80.0)), Some(6));
        assert_eq!(tree.octant(&unit_cube(80.0, 80.0, 80.0)), Some(7));
        assert_eq!(tree.octant(&Cube::new(45.0, 10.0, 10.0, 10.0, 2.0, 2.0)), None);
    }

    #[test]
    fn test_quad_mode_ignores_z() {
        let mut tree: Octree<usize> = Octree::with_config(world_bounds(), 1, 4, true);
        // Same x/y cell, wildly different heights
        tree.insert(unit_cube(10.0, 10.0, 5.0), 0);
        tree.insert(unit_cube(10.0, 10.0, 95.0), 1);
        tree.insert(unit_cube(80.0, 80.0, 50.0), 2);

        let hits = tree.retrieve(&unit_cube(10.0, 10.0, 50.0));
        let ids: Vec<usize> = hits.iter().map(|(_, i)| *i).collect();
        assert!(ids.contains(&0));
        assert!(ids.contains(&1));
    }

    #[test]
    fn test_clear_and_reset() {
        let mut tree: Octree<usize> = Octree::with_config(world_bounds(), 1, 4, false);
        for i in 0..10 {
            tree.insert(unit_cube(i as f32 * 9.0, 10.0, 10.0), i);
        }
        tree.clear();
        assert_eq!(tree.total_len(), 0);

        tree.reset(Cube::new(-50.0, -50.0, -50.0, 100.0, 100.0, 100.0));
        tree.insert(unit_cube(-10.0, -10.0, -10.0), 0);
        assert_eq!(tree.retrieve(&unit_cube(-10.0, -10.0, -10.0)).len(), 1);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn random_cubes(seed: u64, count: usize) -> Vec<Cube> {
        let mut rng = Pcg32::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                Cube::new(
                    rng.random_range(-500.0..500.0),
                    rng.random_range(-500.0..500.0),
                    rng.random_range(-500.0..500.0),
                    rng.random_range(1.0..60.0),
                    rng.random_range(1.0..60.0),
                    rng.random_range(1.0..60.0),
                )
            })
            .collect()
    }

    proptest! {
        // No false negatives: every cube the query truly intersects must be
        // among the retrieved candidates, whatever the node configuration.
        #[test]
        fn prop_retrieve_never_misses(
            seed in 0u64..1000,
            max_objects in 1usize..8,
            max_levels in 1usize..6,
            quad in proptest::bool::ANY,
        ) {
            let cubes = random_cubes(seed, 64);
            let bounds = Cube::new(-600.0, -600.0, -600.0, 1200.0, 1200.0, 1200.0);
            let mut tree: Octree<usize> =
                Octree::with_config(bounds, max_objects, max_levels, quad);
            for (i, cube) in cubes.iter().enumerate() {
                tree.insert(*cube, i);
            }
            prop_assert_eq!(tree.total_len(), cubes.len());

            let query = cubes[seed as usize % cubes.len()];
            let hits: Vec<usize> = tree.retrieve(&query).iter().map(|(_, i)| *i).collect();
            for (i, cube) in cubes.iter().enumerate() {
                if query.intersects(cube) {
                    prop_assert!(hits.contains(&i), "missed cube {} for query {:?}", i, query);
                }
            }
        }
    }
}

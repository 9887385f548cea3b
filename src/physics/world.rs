//! The arcade physics world
//!
//! Owns global configuration and every body, dispatches collide/overlap
//! requests across single bodies and groups, runs the octree broad phase and
//! the axis-by-axis narrow-phase separation.
//!
//! Step contract (single-threaded, run to completion):
//! 1. [`World::pre_update`] integrates every body, exactly once per tick.
//! 2. The host issues its `collide`/`overlap` calls.
//! 3. [`World::post_update`] commits deltas back onto the sprites.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::body::{Body, SpriteState};
use super::octree::Octree;
use super::{BodyId, Faces, PhysicsEvent};
use crate::consts::{OVERLAP_BIAS, TREE_MAX_LEVELS, TREE_MAX_OBJECTS};
use crate::cube::Cube;
use crate::projector::Projector;

/// Veto callback consulted per candidate pair before any mutation
pub type ProcessCallback<'a> = &'a mut dyn FnMut(&Body, &Body) -> bool;
/// Contact callback invoked for each pair that collided or overlapped
pub type ContactCallback<'a> = &'a mut dyn FnMut(&mut Body, &mut Body);

/// One side of a collide/overlap request
///
/// The tagged union the dispatcher resolves once at the boundary: a request
/// side is either a single body or a group (slice of body ids). Passing the
/// *same slice* on both sides selects group-vs-self pairing.
#[derive(Debug, Clone, Copy)]
pub enum Collider<'a> {
    Body(BodyId),
    Group(&'a [BodyId]),
}

impl From<BodyId> for Collider<'_> {
    fn from(id: BodyId) -> Self {
        Collider::Body(id)
    }
}

impl<'a> From<&'a [BodyId]> for Collider<'a> {
    fn from(group: &'a [BodyId]) -> Self {
        Collider::Group(group)
    }
}

impl<'a> From<&'a Vec<BodyId>> for Collider<'a> {
    fn from(group: &'a Vec<BodyId>) -> Self {
        Collider::Group(group.as_slice())
    }
}

/// Tuning and global state for a physics world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Region bodies with `collide_world_bounds` are confined to
    pub bounds: Cube,
    /// World gravity, applied to bodies with `allow_gravity`
    pub gravity: Vec3,
    /// Which world edges stop bodies (gates `check_world_bounds`)
    pub check_collision: Faces,
    /// Octree node capacity before splitting
    pub max_objects: usize,
    /// Octree depth limit
    pub max_levels: usize,
    /// Skip the octree entirely; groups are tested brute force
    pub skip_tree: bool,
    /// Broad phase on x/y only, for worlds without vertical play
    pub use_quad_tree: bool,
    /// Always separate x before y before z, regardless of gravity
    pub force_xy: bool,
    /// Slop added to the maximum separation distance per call
    pub overlap_bias: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: Cube::default(),
            gravity: Vec3::ZERO,
            check_collision: Faces::ALL,
            max_objects: TREE_MAX_OBJECTS,
            max_levels: TREE_MAX_LEVELS,
            skip_tree: false,
            use_quad_tree: false,
            force_xy: false,
            overlap_bias: OVERLAP_BIAS,
        }
    }
}

/// The physics simulation: configuration, bodies, dispatch and separation
#[derive(Debug, Default)]
pub struct World {
    pub config: WorldConfig,
    bodies: Vec<Body>,
    events: Vec<PhysicsEvent>,
    next_id: u32,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            events: Vec::new(),
            next_id: 0,
        }
    }

    pub fn with_bounds(bounds: Cube) -> Self {
        Self::new(WorldConfig {
            bounds,
            ..WorldConfig::default()
        })
    }

    pub fn set_bounds(&mut self, bounds: Cube) {
        log::debug!("world bounds set to {bounds:?}");
        self.config.bounds = bounds;
    }

    /// Create a body for a host display object and return its handle
    pub fn enable(&mut self, sprite: SpriteState) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        log::debug!("physics enabled for body {id:?}");
        self.bodies.push(Body::new(id, sprite));
        id
    }

    /// Destroy a body; its id becomes invalid
    pub fn remove(&mut self, id: BodyId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                log::debug!("physics body {id:?} removed");
                self.bodies.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(|i| &mut self.bodies[i])
    }

    /// Every body, in ascending id order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PhysicsEvent> {
        self.events.drain(..)
    }

    /// Phase 1: integrate every enabled body. Call exactly once per tick.
    pub fn pre_update(&mut self, dt: f32) {
        let Self {
            bodies,
            config,
            events,
            ..
        } = self;
        for body in bodies.iter_mut() {
            if !body.pre_update(dt, config) {
                events.push(PhysicsEvent::OutOfBounds(body.id()));
            }
        }
    }

    /// Phase 3: commit every body's frame delta. Idempotent within a tick.
    pub fn post_update(&mut self) {
        for body in &mut self.bodies {
            body.post_update();
        }
    }

    /// Exact AABB overlap test between two bodies
    pub fn intersects(&self, a: BodyId, b: BodyId) -> bool {
        match (self.body(a), self.body(b)) {
            (Some(a), Some(b)) => a.bounds().intersects(&b.bounds()),
            _ => false,
        }
    }

    /// Collision test *and response* across bodies and groups.
    /// Returns true when any pair collided.
    pub fn collide<'a>(&mut self, a: impl Into<Collider<'a>>, b: impl Into<Collider<'a>>) -> bool {
        self.collide_with(a, b, None, None)
    }

    /// [`collide`] with callbacks: `process` may veto a pair before any
    /// mutation; `contact` fires for each colliding pair after separation.
    ///
    /// [`collide`]: World::collide
    pub fn collide_with<'a>(
        &mut self,
        a: impl Into<Collider<'a>>,
        b: impl Into<Collider<'a>>,
        mut contact: Option<ContactCallback<'_>>,
        mut process: Option<ProcessCallback<'_>>,
    ) -> bool {
        self.dispatch(a.into(), b.into(), &mut contact, &mut process, false) > 0
    }

    /// Overlap test across bodies and groups; never mutates positions or
    /// velocities. Returns true when any pair overlapped.
    pub fn overlap<'a>(&mut self, a: impl Into<Collider<'a>>, b: impl Into<Collider<'a>>) -> bool {
        self.overlap_with(a, b, None, None)
    }

    /// [`overlap`] with callbacks, same contract as [`collide_with`]
    ///
    /// [`overlap`]: World::overlap
    /// [`collide_with`]: World::collide_with
    pub fn overlap_with<'a>(
        &mut self,
        a: impl Into<Collider<'a>>,
        b: impl Into<Collider<'a>>,
        mut contact: Option<ContactCallback<'_>>,
        mut process: Option<ProcessCallback<'_>>,
    ) -> bool {
        self.dispatch(a.into(), b.into(), &mut contact, &mut process, true) > 0
    }

    /// Narrow-phase test-and-respond for one pair, without callbacks
    pub fn separate(&mut self, a: BodyId, b: BodyId) -> bool {
        self.separate_with(a, b, None, false)
    }

    /// [`separate`] with an optional veto callback; `overlap_only` reports
    /// and records the overlap without displacing either body
    ///
    /// [`separate`]: World::separate
    pub fn separate_with(
        &mut self,
        a: BodyId,
        b: BodyId,
        mut process: Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> bool {
        let (Some(ai), Some(bi)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        if ai == bi {
            return false;
        }
        self.separate_indices(ai, bi, &mut process, overlap_only)
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        // Bodies are kept in ascending id order
        self.bodies.binary_search_by_key(&id, Body::id).ok()
    }

    fn dispatch(
        &mut self,
        a: Collider<'_>,
        b: Collider<'_>,
        contact: &mut Option<ContactCallback<'_>>,
        process: &mut Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> usize {
        match (a, b) {
            (Collider::Body(a), Collider::Body(b)) => {
                usize::from(self.pair_ids(a, b, contact, process, overlap_only))
            }
            (Collider::Body(a), Collider::Group(group))
            | (Collider::Group(group), Collider::Body(a)) => {
                self.body_vs_group(a, group, contact, process, overlap_only)
            }
            (Collider::Group(a), Collider::Group(b)) => {
                if same_group(a, b) {
                    self.group_vs_self(a, contact, process, overlap_only)
                } else {
                    let mut total = 0;
                    for &id in a {
                        total += self.body_vs_group(id, b, contact, process, overlap_only);
                    }
                    total
                }
            }
        }
    }

    /// All unique pairs within one group (i < j, strict upper bound)
    fn group_vs_self(
        &mut self,
        group: &[BodyId],
        contact: &mut Option<ContactCallback<'_>>,
        process: &mut Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> usize {
        let mut total = 0;
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                if self.pair_ids(group[i], group[j], contact, process, overlap_only) {
                    total += 1;
                }
            }
        }
        total
    }

    /// One query body against a group, pruned by the octree unless skipped
    fn body_vs_group(
        &mut self,
        id: BodyId,
        group: &[BodyId],
        contact: &mut Option<ContactCallback<'_>>,
        process: &mut Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> usize {
        let Some(qi) = self.index_of(id) else {
            return 0;
        };
        if !self.bodies[qi].enable {
            return 0;
        }

        let mut total = 0;
        if self.config.skip_tree || self.bodies[qi].skip_tree {
            log::trace!("broad phase skipped for body {id:?}");
            for &other in group {
                if other == id {
                    continue;
                }
                let Some(oi) = self.index_of(other) else {
                    continue;
                };
                if self.pair_indices(qi, oi, contact, process, overlap_only) {
                    total += 1;
                }
            }
        } else {
            // Rebuilt from current bounds on every query; no stale index
            let mut tree: Octree<usize> = Octree::with_config(
                self.config.bounds,
                self.config.max_objects,
                self.config.max_levels,
                self.config.use_quad_tree,
            );
            for &member in group {
                if member == id {
                    continue;
                }
                let Some(mi) = self.index_of(member) else {
                    continue;
                };
                let body = &self.bodies[mi];
                if !body.enable {
                    continue;
                }
                tree.insert(body.bounds(), mi);
            }
            for (_, mi) in tree.retrieve(&self.bodies[qi].bounds()) {
                if self.pair_indices(qi, mi, contact, process, overlap_only) {
                    total += 1;
                }
            }
        }
        total
    }

    fn pair_ids(
        &mut self,
        a: BodyId,
        b: BodyId,
        contact: &mut Option<ContactCallback<'_>>,
        process: &mut Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> bool {
        let (Some(ai), Some(bi)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        self.pair_indices(ai, bi, contact, process, overlap_only)
    }

    fn pair_indices(
        &mut self,
        ai: usize,
        bi: usize,
        contact: &mut Option<ContactCallback<'_>>,
        process: &mut Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> bool {
        if ai == bi {
            return false;
        }
        if !self.separate_indices(ai, bi, process, overlap_only) {
            return false;
        }
        if let Some(cb) = contact.as_mut() {
            let (a, b) = pair_mut(&mut self.bodies, ai, bi);
            cb(a, b);
        }
        true
    }

    /// Test one pair and resolve on the first axis that separates.
    /// Z runs first unless `force_xy` is set or gravity points mostly
    /// sideways; only one axis's result is kept per call.
    fn separate_indices(
        &mut self,
        ai: usize,
        bi: usize,
        process: &mut Option<ProcessCallback<'_>>,
        overlap_only: bool,
    ) -> bool {
        let g = self.config.gravity;
        let z_first = !self.config.force_xy && g.z.abs() >= g.x.abs() && g.z.abs() >= g.y.abs();
        let bias = self.config.overlap_bias;

        let (a, b) = pair_mut(&mut self.bodies, ai, bi);
        if !a.enable || !b.enable {
            return false;
        }
        if a.immovable && b.immovable {
            return false;
        }
        if !a.bounds().intersects(&b.bounds()) {
            return false;
        }
        if let Some(p) = process.as_mut() {
            if !p(a, b) {
                return false;
            }
        }

        if z_first {
            separate_z(a, b, overlap_only, bias)
                || separate_x(a, b, overlap_only, bias)
                || separate_y(a, b, overlap_only, bias)
        } else {
            separate_x(a, b, overlap_only, bias)
                || separate_y(a, b, overlap_only, bias)
                || separate_z(a, b, overlap_only, bias)
        }
    }

    // --- Kinematics helpers ---
    // All one-shot setters: none of these track a moving target, so homing
    // behavior means calling them again every step.

    /// 3D distance between two bodies' centers
    pub fn distance_between(&self, a: BodyId, b: BodyId) -> Option<f32> {
        let a = self.body(a)?;
        let b = self.body(b)?;
        Some((a.bounds().center() - b.bounds().center()).length())
    }

    /// Ground-plane distance from a body's center to a point
    pub fn distance_to_xy(&self, id: BodyId, x: f32, y: f32) -> Option<f32> {
        let body = self.body(id)?;
        let c = body.bounds().center();
        Some(Vec2::new(x - c.x, y - c.y).length())
    }

    /// 3D distance from a body's center to a point
    pub fn distance_to_xyz(&self, id: BodyId, target: Vec3) -> Option<f32> {
        let body = self.body(id)?;
        Some((target - body.bounds().center()).length())
    }

    /// Spherical angles from a body's center to a target: radial distance,
    /// azimuth `theta`, polar `phi`. A zero radius yields zeroed angles
    /// instead of propagating NaN.
    pub fn angles_to_xyz(&self, id: BodyId, target: Vec3) -> Option<(f32, f32, f32)> {
        let body = self.body(id)?;
        let d = target - body.bounds().center();
        let r = d.length();
        if r == 0.0 {
            return Some((0.0, 0.0, 0.0));
        }
        Some((r, d.y.atan2(d.x), (d.z / r).acos()))
    }

    /// Velocity vector of magnitude `speed` along spherical angles
    pub fn velocity_from_angles(&self, theta: f32, phi: f32, speed: f32) -> Vec3 {
        Vec3::new(
            theta.cos() * phi.sin() * speed,
            theta.sin() * phi.sin() * speed,
            phi.cos() * speed,
        )
    }

    /// Point the body's velocity at a target point
    pub fn move_to_xyz(&mut self, id: BodyId, target: Vec3, speed: f32) -> bool {
        let Some((r, theta, phi)) = self.angles_to_xyz(id, target) else {
            return false;
        };
        let velocity = if r == 0.0 {
            Vec3::ZERO
        } else {
            self.velocity_from_angles(theta, phi, speed)
        };
        match self.body_mut(id) {
            Some(body) => {
                body.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Point body `a`'s velocity at body `b`'s center
    pub fn move_to_object(&mut self, a: BodyId, b: BodyId, speed: f32) -> bool {
        let Some(target) = self.body(b).map(|b| b.bounds().center()) else {
            return false;
        };
        self.move_to_xyz(a, target, speed)
    }

    /// Point the body's velocity at a 2D pointer, unprojected onto the
    /// body's current z-plane
    pub fn move_to_pointer(
        &mut self,
        id: BodyId,
        pointer: Vec2,
        projector: &Projector,
        speed: f32,
    ) -> bool {
        let Some(z) = self.body(id).map(|b| b.position.z) else {
            return false;
        };
        let target = projector.unproject(pointer, z);
        self.move_to_xyz(id, target, speed)
    }

    /// Accelerate the body toward a target point, capping velocity at
    /// `max_xy` on the ground axes and `max_z` vertically
    pub fn accelerate_to_xyz(
        &mut self,
        id: BodyId,
        target: Vec3,
        speed: f32,
        max_xy: f32,
        max_z: f32,
    ) -> bool {
        let Some((r, theta, phi)) = self.angles_to_xyz(id, target) else {
            return false;
        };
        let acceleration = if r == 0.0 {
            Vec3::ZERO
        } else {
            self.velocity_from_angles(theta, phi, speed)
        };
        match self.body_mut(id) {
            Some(body) => {
                body.acceleration = acceleration;
                body.max_velocity = Vec3::new(max_xy, max_xy, max_z);
                true
            }
            None => false,
        }
    }
}

/// Both sides reference the very same slice
fn same_group(a: &[BodyId], b: &[BodyId]) -> bool {
    std::ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len()
}

/// Disjoint mutable borrows of two bodies
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Separate a pair on the x axis
///
/// Signed overlap is derived from which body moved toward the other this
/// step. The overlap is discarded when it exceeds what the pair actually
/// travelled (plus slop) or a face gate disallows it. Resolution splits the
/// correction 50/50 between movable bodies and exchanges velocity scaled by
/// mass and bounce; an immovable partner takes no correction.
fn separate_x(a: &mut Body, b: &mut Body, overlap_only: bool, bias: f32) -> bool {
    if a.immovable && b.immovable {
        return false;
    }

    let mut overlap = 0.0f32;
    let max_overlap = a.delta_abs_x() + b.delta_abs_x() + bias;

    if a.delta_x() == 0.0 && b.delta_x() == 0.0 {
        // Neither moved on this axis yet they overlap
        a.embedded = true;
        b.embedded = true;
    } else if a.delta_x() > b.delta_x() {
        overlap = a.front_x() - b.position.x;
        if overlap > max_overlap || !a.check_collision.front_x || !b.check_collision.back_x {
            overlap = 0.0;
        } else {
            a.touching.none = false;
            a.touching.front_x = true;
            b.touching.none = false;
            b.touching.back_x = true;
        }
    } else if a.delta_x() < b.delta_x() {
        overlap = a.position.x - b.width_x - b.position.x;
        if -overlap > max_overlap || !a.check_collision.back_x || !b.check_collision.front_x {
            overlap = 0.0;
        } else {
            a.touching.none = false;
            a.touching.back_x = true;
            b.touching.none = false;
            b.touching.front_x = true;
        }
    }

    if overlap == 0.0 {
        return false;
    }
    a.overlap_x = overlap;
    b.overlap_x = overlap;

    if overlap_only || a.custom_separate_x || b.custom_separate_x {
        return true;
    }

    let v1 = a.velocity.x;
    let v2 = b.velocity.x;
    if !a.immovable && !b.immovable {
        let half = overlap * 0.5;
        a.position.x -= half;
        b.position.x += half;
        let (nv1, nv2, average) = exchange_velocity(v1, v2, a.mass, b.mass);
        a.velocity.x = average + nv1 * a.bounce.x;
        b.velocity.x = average + nv2 * b.bounce.x;
    } else if !a.immovable {
        a.position.x -= overlap;
        a.velocity.x = v2 - v1 * a.bounce.x;
    } else {
        b.position.x += overlap;
        b.velocity.x = v1 - v2 * b.bounce.x;
    }
    true
}

/// Separate a pair on the y axis; mirrors [`separate_x`]
fn separate_y(a: &mut Body, b: &mut Body, overlap_only: bool, bias: f32) -> bool {
    if a.immovable && b.immovable {
        return false;
    }

    let mut overlap = 0.0f32;
    let max_overlap = a.delta_abs_y() + b.delta_abs_y() + bias;

    if a.delta_y() == 0.0 && b.delta_y() == 0.0 {
        a.embedded = true;
        b.embedded = true;
    } else if a.delta_y() > b.delta_y() {
        overlap = a.front_y() - b.position.y;
        if overlap > max_overlap || !a.check_collision.front_y || !b.check_collision.back_y {
            overlap = 0.0;
        } else {
            a.touching.none = false;
            a.touching.front_y = true;
            b.touching.none = false;
            b.touching.back_y = true;
        }
    } else if a.delta_y() < b.delta_y() {
        overlap = a.position.y - b.width_y - b.position.y;
        if -overlap > max_overlap || !a.check_collision.back_y || !b.check_collision.front_y {
            overlap = 0.0;
        } else {
            a.touching.none = false;
            a.touching.back_y = true;
            b.touching.none = false;
            b.touching.front_y = true;
        }
    }

    if overlap == 0.0 {
        return false;
    }
    a.overlap_y = overlap;
    b.overlap_y = overlap;

    if overlap_only || a.custom_separate_y || b.custom_separate_y {
        return true;
    }

    let v1 = a.velocity.y;
    let v2 = b.velocity.y;
    if !a.immovable && !b.immovable {
        let half = overlap * 0.5;
        a.position.y -= half;
        b.position.y += half;
        let (nv1, nv2, average) = exchange_velocity(v1, v2, a.mass, b.mass);
        a.velocity.y = average + nv1 * a.bounce.y;
        b.velocity.y = average + nv2 * b.bounce.y;
    } else if !a.immovable {
        a.position.y -= overlap;
        a.velocity.y = v2 - v1 * a.bounce.y;
    } else {
        b.position.y += overlap;
        b.velocity.y = v1 - v2 * b.bounce.y;
    }
    true
}

/// Separate a pair on the z axis; mirrors [`separate_x`] with one addition:
/// a movable body resting on an immovable platform that `moves` is carried
/// by the platform's x/y delta this step
fn separate_z(a: &mut Body, b: &mut Body, overlap_only: bool, bias: f32) -> bool {
    if a.immovable && b.immovable {
        return false;
    }

    let mut overlap = 0.0f32;
    let max_overlap = a.delta_abs_z() + b.delta_abs_z() + bias;

    if a.delta_z() == 0.0 && b.delta_z() == 0.0 {
        a.embedded = true;
        b.embedded = true;
    } else if a.delta_z() > b.delta_z() {
        overlap = a.top() - b.position.z;
        if overlap > max_overlap || !a.check_collision.up || !b.check_collision.down {
            overlap = 0.0;
        } else {
            a.touching.none = false;
            a.touching.up = true;
            b.touching.none = false;
            b.touching.down = true;
        }
    } else if a.delta_z() < b.delta_z() {
        overlap = a.position.z - b.height - b.position.z;
        if -overlap > max_overlap || !a.check_collision.down || !b.check_collision.up {
            overlap = 0.0;
        } else {
            a.touching.none = false;
            a.touching.down = true;
            b.touching.none = false;
            b.touching.up = true;
        }
    }

    if overlap == 0.0 {
        return false;
    }
    a.overlap_z = overlap;
    b.overlap_z = overlap;

    if overlap_only || a.custom_separate_z || b.custom_separate_z {
        return true;
    }

    let v1 = a.velocity.z;
    let v2 = b.velocity.z;
    if !a.immovable && !b.immovable {
        let half = overlap * 0.5;
        a.position.z -= half;
        b.position.z += half;
        let (nv1, nv2, average) = exchange_velocity(v1, v2, a.mass, b.mass);
        a.velocity.z = average + nv1 * a.bounce.z;
        b.velocity.z = average + nv2 * b.bounce.z;
    } else if !a.immovable {
        a.position.z -= overlap;
        a.velocity.z = v2 - v1 * a.bounce.z;
        // Ride along with a moving platform
        if b.moves {
            a.position.x += b.delta_x();
            a.position.y += b.delta_y();
        }
    } else {
        b.position.z += overlap;
        b.velocity.z = v1 - v2 * b.bounce.z;
        if a.moves {
            b.position.x += a.delta_x();
            b.position.y += a.delta_y();
        }
    }
    true
}

/// Elastic-style velocity exchange scaled by mass ratio. Returns each body's
/// deviation from the shared average (to be scaled by its bounce) plus the
/// average itself.
fn exchange_velocity(v1: f32, v2: f32, mass1: f32, mass2: f32) -> (f32, f32, f32) {
    let mut nv1 = ((v2 * v2 * mass2) / mass1).sqrt() * if v2 > 0.0 { 1.0 } else { -1.0 };
    let mut nv2 = ((v1 * v1 * mass1) / mass2).sqrt() * if v1 > 0.0 { 1.0 } else { -1.0 };
    let average = (nv1 + nv2) * 0.5;
    nv1 -= average;
    nv2 -= average;
    (nv1, nv2, average)
}

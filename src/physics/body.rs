//! Per-object physics state and integration
//!
//! A body belongs to exactly one host display object, mirrored here as a
//! [`SpriteState`] the host syncs in. Each step the body integrates its
//! velocity in `pre_update`, the world separates colliding pairs, and
//! `post_update` commits the resulting frame delta back onto the sprite's
//! nominal position.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::world::WorldConfig;
use super::{BodyId, Faces, Facing};
use crate::cube::Cube;
use crate::projector::DepthSortable;

/// Velocity/angular-velocity cap applied when the caller sets no explicit one
const DEFAULT_MAX_VELOCITY: f32 = 10_000.0;
const DEFAULT_MAX_ANGULAR: f32 = 1_000.0;

/// The slice of a host display object the physics core reads and writes
///
/// The host syncs this in before `pre_update` and reads `pos`, `angle` and
/// `alive` back after `post_update`. `pos` is the nominal anchor position the
/// host places the object at; the body's simulation position is derived from
/// it and written back by delta, never absolutely, so host-side repositioning
/// mid-frame is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteState {
    /// Nominal 3D position
    pub pos: Vec3,
    /// Intrinsic 2D footprint width
    pub width: f32,
    /// Intrinsic 2D footprint height
    pub height: f32,
    /// 2D render scale
    pub scale: Vec2,
    /// 2D anchor ratio ((0,0) = top-left, (0.5, 0.5) = centered)
    pub anchor: Vec2,
    /// Visual rotation in radians
    pub angle: f32,
    /// Depth sort key, written by the depth sorters
    pub depth: f32,
    /// Cleared when the out-of-bounds kill policy fires
    pub alive: bool,
}

impl SpriteState {
    pub fn new(pos: Vec3, width: f32, height: f32) -> Self {
        Self {
            pos,
            width,
            height,
            scale: Vec2::ONE,
            anchor: Vec2::new(0.5, 0.0),
            angle: 0.0,
            depth: 0.0,
            alive: true,
        }
    }
}

/// A single simulated body
///
/// Created through `World::enable`. Field groups: lifecycle/behavior flags,
/// kinematic state (position is the authoritative simulation position, offset
/// from the sprite's nominal position), box extents, and per-step contact
/// state. `prev` is the snapshot the frame deltas are measured against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    id: BodyId,
    /// Mirror of the owning display object
    pub sprite: SpriteState,

    /// Master switch; disabled bodies are skipped everywhere
    pub enable: bool,
    /// Integrated by the world each step (false = positioned manually)
    pub moves: bool,
    /// Never displaced by separation
    pub immovable: bool,
    pub allow_gravity: bool,
    pub allow_rotation: bool,
    /// Clamp/bounce against the world bounds each step
    pub collide_world_bounds: bool,
    /// Kill the sprite once the body leaves the world bounds entirely
    pub out_of_bounds_kill: bool,
    /// Exclude this body's queries from the octree (always brute force)
    pub skip_tree: bool,
    /// Record overlap on the axis but leave resolution to the caller
    pub custom_separate_x: bool,
    pub custom_separate_y: bool,
    pub custom_separate_z: bool,

    /// Authoritative simulation position: the box's back-bottom corner
    pub position: Vec3,
    /// Position snapshot from the end of the previous step
    pub prev: Vec3,
    /// User offset added on top of the anchor-derived position
    pub offset: Vec3,

    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Deceleration applied on axes with no acceleration
    pub drag: Vec3,
    /// Per-body gravity added to the world's
    pub gravity: Vec3,
    /// Restitution per axis (0 = dead stop, 1 = full rebound)
    pub bounce: Vec3,
    pub max_velocity: Vec3,
    /// Per-axis cap on the committed frame delta (0 = uncapped)
    pub delta_max: Vec3,

    pub mass: f32,
    pub rotation: f32,
    pre_rotation: f32,
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    pub angular_drag: f32,
    pub max_angular: f32,

    /// Box extent along x (footprint-derived unless `set_size` was called)
    pub width_x: f32,
    /// Box extent along y
    pub width_y: f32,
    /// Box extent along z
    pub height: f32,
    /// Geometric center, refreshed by `post_update`
    pub center: Vec3,

    pub facing: Facing,
    /// Faces in contact after the last separation pass
    pub touching: Faces,
    /// `touching` from the previous step
    pub was_touching: Faces,
    /// Faces stopped by the world bounds this step
    pub blocked: Faces,
    /// Which of this body's faces may collide at all
    pub check_collision: Faces,
    /// Overlapping with zero relative motion on the tested axis
    pub embedded: bool,

    /// Overlap recorded by the last separation attempt, per axis
    pub overlap_x: f32,
    pub overlap_y: f32,
    pub overlap_z: f32,

    // Scaled footprint cache, used to detect scale changes
    source_width: f32,
    source_height: f32,
    #[serde(skip)]
    phase: u8,
    #[serde(skip, default = "default_fresh")]
    fresh: bool,
}

fn default_fresh() -> bool {
    true
}

impl Body {
    pub(crate) fn new(id: BodyId, sprite: SpriteState) -> Self {
        let (source_width, source_height) = scaled_footprint(&sprite);
        let width_x = (source_width * 0.5).ceil();
        let height = ((source_height - source_width * 0.5).ceil()).max(0.0);

        let mut body = Self {
            id,
            sprite,
            enable: true,
            moves: true,
            immovable: false,
            allow_gravity: true,
            allow_rotation: true,
            collide_world_bounds: false,
            out_of_bounds_kill: false,
            skip_tree: false,
            custom_separate_x: false,
            custom_separate_y: false,
            custom_separate_z: false,
            position: Vec3::ZERO,
            prev: Vec3::ZERO,
            offset: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            drag: Vec3::ZERO,
            gravity: Vec3::ZERO,
            bounce: Vec3::ZERO,
            max_velocity: Vec3::splat(DEFAULT_MAX_VELOCITY),
            delta_max: Vec3::ZERO,
            mass: 1.0,
            rotation: sprite.angle,
            pre_rotation: sprite.angle,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            angular_drag: 0.0,
            max_angular: DEFAULT_MAX_ANGULAR,
            width_x,
            width_y: width_x,
            height,
            center: Vec3::ZERO,
            facing: Facing::None,
            touching: Faces::NONE,
            was_touching: Faces::NONE,
            blocked: Faces::NONE,
            check_collision: Faces::ALL,
            embedded: false,
            overlap_x: 0.0,
            overlap_y: 0.0,
            overlap_z: 0.0,
            source_width,
            source_height,
            phase: 0,
            fresh: true,
        };
        body.update_position();
        body.prev = body.position;
        body.center = body.bounds().center();
        body
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Front face position on x
    #[inline]
    pub fn front_x(&self) -> f32 {
        self.position.x + self.width_x
    }

    /// Front face position on y
    #[inline]
    pub fn front_y(&self) -> f32 {
        self.position.y + self.width_y
    }

    /// Top face position on z
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.z + self.height
    }

    /// Bottom face position on z
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.z
    }

    /// Current box in simulation space
    pub fn bounds(&self) -> Cube {
        Cube::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.width_x,
            self.width_y,
            self.height,
        )
    }

    /// Point-in-box test against the current bounds
    pub fn hit_test(&self, x: f32, y: f32, z: f32) -> bool {
        self.bounds().contains(x, y, z)
    }

    #[inline]
    pub fn delta_x(&self) -> f32 {
        self.position.x - self.prev.x
    }

    #[inline]
    pub fn delta_y(&self) -> f32 {
        self.position.y - self.prev.y
    }

    #[inline]
    pub fn delta_z(&self) -> f32 {
        self.position.z - self.prev.z
    }

    #[inline]
    pub fn delta_r(&self) -> f32 {
        self.rotation - self.pre_rotation
    }

    #[inline]
    pub fn delta_abs_x(&self) -> f32 {
        self.delta_x().abs()
    }

    #[inline]
    pub fn delta_abs_y(&self) -> f32 {
        self.delta_y().abs()
    }

    #[inline]
    pub fn delta_abs_z(&self) -> f32 {
        self.delta_z().abs()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Travel direction on the ground plane, radians
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    /// Integrate one step. Must run exactly once per tick per body, before
    /// any collision queries. Returns false when the out-of-bounds kill
    /// policy fired this step.
    pub fn pre_update(&mut self, dt: f32, config: &WorldConfig) -> bool {
        if !self.enable {
            return true;
        }
        self.phase = 1;

        self.was_touching = self.touching;
        self.touching = Faces::NONE;
        self.blocked = Faces::NONE;
        self.embedded = false;

        self.update_bounds();
        self.update_position();
        self.rotation = self.sprite.angle;
        self.pre_rotation = self.rotation;

        if self.fresh {
            self.prev = self.position;
        }

        let mut in_bounds = true;
        if self.moves {
            self.update_motion(dt, config);
            self.position += self.velocity * dt;

            if self.collide_world_bounds {
                self.check_world_bounds(config);
            }
            if self.out_of_bounds_kill && !self.bounds().intersects(&config.bounds) {
                self.sprite.alive = false;
                in_bounds = false;
            }
        }

        self.fresh = false;
        in_bounds
    }

    /// Commit the step: classify facing, write the frame delta back onto the
    /// sprite, refresh the center and snapshot `prev`. Guarded so repeated
    /// calls within one tick are no-ops.
    pub fn post_update(&mut self) {
        if !self.enable || self.phase == 2 {
            return;
        }
        self.phase = 2;

        // Dominant displacement wins; ties resolve X over Y over Z
        if self.delta_abs_x() >= self.delta_abs_y() && self.delta_abs_x() >= self.delta_abs_z() {
            if self.delta_x() < 0.0 {
                self.facing = Facing::BackX;
            } else if self.delta_x() > 0.0 {
                self.facing = Facing::FrontX;
            }
        } else if self.delta_abs_y() >= self.delta_abs_x()
            && self.delta_abs_y() >= self.delta_abs_z()
        {
            if self.delta_y() < 0.0 {
                self.facing = Facing::BackY;
            } else if self.delta_y() > 0.0 {
                self.facing = Facing::FrontY;
            }
        } else if self.delta_z() < 0.0 {
            self.facing = Facing::Down;
        } else if self.delta_z() > 0.0 {
            self.facing = Facing::Up;
        }

        if self.moves {
            let mut dx = self.delta_x();
            let mut dy = self.delta_y();
            let mut dz = self.delta_z();
            if self.delta_max.x != 0.0 {
                dx = dx.clamp(-self.delta_max.x, self.delta_max.x);
            }
            if self.delta_max.y != 0.0 {
                dy = dy.clamp(-self.delta_max.y, self.delta_max.y);
            }
            if self.delta_max.z != 0.0 {
                dz = dz.clamp(-self.delta_max.z, self.delta_max.z);
            }
            // Delta write-back: the sprite accumulates, so host-side moves
            // made mid-frame are not fought
            self.sprite.pos += Vec3::new(dx, dy, dz);
        }

        self.center = self.bounds().center();

        if self.allow_rotation {
            self.sprite.angle += self.delta_r();
        }

        self.prev = self.position;
    }

    /// Override the footprint-derived extents and position offset
    pub fn set_size(&mut self, width_x: f32, width_y: f32, height: f32, offset: Vec3) {
        self.width_x = width_x;
        self.width_y = width_y;
        self.height = height;
        self.offset = offset;
        self.update_position();
        self.center = self.bounds().center();
    }

    /// Zero all motion and reposition the body (and its sprite)
    pub fn reset(&mut self, x: f32, y: f32, z: f32) {
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.angular_velocity = 0.0;
        self.angular_acceleration = 0.0;

        self.sprite.pos = Vec3::new(x, y, z);
        let (sw, sh) = scaled_footprint(&self.sprite);
        self.source_width = sw;
        self.source_height = sh;

        self.update_position();
        self.prev = self.position;
        self.rotation = self.sprite.angle;
        self.pre_rotation = self.rotation;
        self.center = self.bounds().center();
        self.fresh = true;
        self.phase = 0;
    }

    /// Zero velocity and acceleration, linear and angular
    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.angular_velocity = 0.0;
        self.angular_acceleration = 0.0;
    }

    /// Re-derive extents from the sprite footprint when its scale changed
    fn update_bounds(&mut self) {
        let (sw, sh) = scaled_footprint(&self.sprite);
        if sw != self.source_width || sh != self.source_height {
            self.width_x = (sw * 0.5).ceil();
            self.width_y = self.width_x;
            self.height = ((sh - sw * 0.5).ceil()).max(0.0);
            self.source_width = sw;
            self.source_height = sh;
        }
    }

    /// Derive the simulation position from the sprite's nominal position,
    /// its anchor and the user offset, so the box sits centered under a
    /// sprite whose origin is not its geometric center. The horizontal
    /// anchor steers both ground axes; they are symmetric on screen.
    fn update_position(&mut self) {
        let s = &self.sprite;
        let (sw, sh) = scaled_footprint(s);
        self.position.x =
            s.pos.x + (self.width_x * -s.anchor.x) + self.width_x * 0.5 + self.offset.x;
        self.position.y =
            s.pos.y + (self.width_y * s.anchor.x) - self.width_y * 0.5 + self.offset.y;
        self.position.z = s.pos.z - (sh * (1.0 - s.anchor.y)) + sw * 0.5 + self.offset.z;
    }

    /// Gravity, then acceleration or drag per axis, then the velocity caps;
    /// finally advance the angular state
    fn update_motion(&mut self, dt: f32, config: &WorldConfig) {
        let gravity = if self.allow_gravity {
            config.gravity + self.gravity
        } else {
            Vec3::ZERO
        };

        self.velocity.x = integrate_axis(
            self.velocity.x,
            gravity.x,
            self.acceleration.x,
            self.drag.x,
            self.max_velocity.x,
            dt,
        );
        self.velocity.y = integrate_axis(
            self.velocity.y,
            gravity.y,
            self.acceleration.y,
            self.drag.y,
            self.max_velocity.y,
            dt,
        );
        self.velocity.z = integrate_axis(
            self.velocity.z,
            gravity.z,
            self.acceleration.z,
            self.drag.z,
            self.max_velocity.z,
            dt,
        );

        self.angular_velocity = integrate_axis(
            self.angular_velocity,
            0.0,
            self.angular_acceleration,
            self.angular_drag,
            self.max_angular,
            dt,
        );
        self.rotation += self.angular_velocity * dt;
    }

    /// Clamp against the world bounds, bouncing and flagging blocked faces.
    /// Each edge is gated by the world's face flags.
    fn check_world_bounds(&mut self, config: &WorldConfig) {
        let bounds = &config.bounds;
        let check = &config.check_collision;

        if self.position.x < bounds.pos.x && check.back_x {
            self.position.x = bounds.pos.x;
            self.velocity.x *= -self.bounce.x;
            self.blocked.back_x = true;
            self.blocked.none = false;
        } else if self.front_x() > bounds.front_x() && check.front_x {
            self.position.x = bounds.front_x() - self.width_x;
            self.velocity.x *= -self.bounce.x;
            self.blocked.front_x = true;
            self.blocked.none = false;
        }

        if self.position.y < bounds.pos.y && check.back_y {
            self.position.y = bounds.pos.y;
            self.velocity.y *= -self.bounce.y;
            self.blocked.back_y = true;
            self.blocked.none = false;
        } else if self.front_y() > bounds.front_y() && check.front_y {
            self.position.y = bounds.front_y() - self.width_y;
            self.velocity.y *= -self.bounce.y;
            self.blocked.front_y = true;
            self.blocked.none = false;
        }

        if self.position.z < bounds.pos.z && check.down {
            self.position.z = bounds.pos.z;
            self.velocity.z *= -self.bounce.z;
            self.blocked.down = true;
            self.blocked.none = false;
        } else if self.top() > bounds.top() && check.up {
            self.position.z = bounds.top() - self.height;
            self.velocity.z *= -self.bounce.z;
            self.blocked.up = true;
            self.blocked.none = false;
        }
    }
}

/// One axis of velocity integration: gravity, then acceleration *or* drag
/// (forces override friction), then the cap
fn integrate_axis(velocity: f32, gravity: f32, acceleration: f32, drag: f32, max: f32, dt: f32) -> f32 {
    let mut v = velocity + gravity * dt;
    if acceleration != 0.0 {
        v += acceleration * dt;
    } else if drag != 0.0 {
        let d = drag * dt;
        if v - d > 0.0 {
            v -= d;
        } else if v + d < 0.0 {
            v += d;
        } else {
            v = 0.0;
        }
    }
    v.clamp(-max, max)
}

fn scaled_footprint(sprite: &SpriteState) -> (f32, f32) {
    (
        (sprite.width * sprite.scale.x).abs(),
        (sprite.height * sprite.scale.y).abs(),
    )
}

impl DepthSortable for Body {
    fn depth_position(&self) -> Vec3 {
        self.position
    }

    fn depth_bounds(&self) -> Cube {
        self.bounds()
    }

    fn depth(&self) -> f32 {
        self.sprite.depth
    }

    fn set_depth(&mut self, depth: f32) {
        self.sprite.depth = depth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WorldConfig {
        WorldConfig {
            bounds: Cube::new(0.0, 0.0, 0.0, 1000.0, 1000.0, 1000.0),
            ..WorldConfig::default()
        }
    }

    fn centered_sprite(x: f32, y: f32, z: f32) -> SpriteState {
        // Anchor (0.5, 0) keeps the anchor-derived offset at zero on x/y;
        // 16x48 gives a solid box (width_x 8, height 40)
        SpriteState::new(Vec3::new(x, y, z), 16.0, 48.0)
    }

    fn test_body(x: f32, y: f32, z: f32) -> Body {
        Body::new(BodyId(0), centered_sprite(x, y, z))
    }

    #[test]
    fn test_default_extents_from_footprint() {
        // width 20 -> width_x = width_y = 10, height = 10 - 10 = 0
        let flat = Body::new(BodyId(0), SpriteState::new(Vec3::ZERO, 20.0, 10.0));
        assert_eq!(flat.width_x, 10.0);
        assert_eq!(flat.width_y, 10.0);
        assert_eq!(flat.height, 0.0);

        let tall = Body::new(BodyId(1), SpriteState::new(Vec3::ZERO, 16.0, 48.0));
        assert_eq!(tall.width_x, 8.0);
        assert_eq!(tall.height, 40.0);
    }

    #[test]
    fn test_integration_applies_acceleration_over_drag() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.acceleration.x = 10.0;
        body.drag.x = 100.0; // Must be ignored while accelerating
        body.pre_update(1.0, &config);
        assert!((body.velocity.x - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_integration_drag_stops_at_zero() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.velocity.x = 5.0;
        body.drag.x = 10.0;
        body.pre_update(1.0, &config);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_integration_clamps_to_max_velocity() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.velocity.y = 90.0;
        body.acceleration.y = 100.0;
        body.max_velocity = Vec3::splat(100.0);
        body.pre_update(1.0, &config);
        assert_eq!(body.velocity.y, 100.0);
    }

    #[test]
    fn test_gravity_moves_body_down() {
        let mut config = test_config();
        config.gravity.z = -50.0;
        let mut body = test_body(100.0, 100.0, 500.0);
        let z0 = body.position.z;
        body.pre_update(0.1, &config);
        assert!(body.velocity.z < 0.0);
        assert!(body.position.z < z0);
    }

    #[test]
    fn test_world_bounds_bounce() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.collide_world_bounds = true;
        body.bounce.x = 1.0;
        body.velocity.x = -500.0;
        // One long step drives the body through the back-x wall
        body.pre_update(1.0, &config);
        assert_eq!(body.position.x, 0.0);
        assert_eq!(body.velocity.x, 500.0);
        assert!(body.blocked.back_x);
        assert!(!body.blocked.none);
    }

    #[test]
    fn test_out_of_bounds_kill() {
        let mut config = test_config();
        config.bounds = Cube::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
        let mut body = test_body(50.0, 50.0, 50.0);
        body.allow_gravity = false;
        body.out_of_bounds_kill = true;
        body.velocity.x = 10_000.0;
        let alive = body.pre_update(1.0, &config);
        assert!(!alive);
        assert!(!body.sprite.alive);
    }

    #[test]
    fn test_post_update_commits_delta_to_sprite() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.velocity.x = 30.0;
        body.pre_update(1.0, &config);
        let sprite_x0 = body.sprite.pos.x;
        body.post_update();
        assert!((body.sprite.pos.x - sprite_x0 - 30.0).abs() < 1e-4);
        assert_eq!(body.facing, Facing::FrontX);
        // Snapshot taken: deltas are zero until the next integration
        assert_eq!(body.delta_x(), 0.0);
    }

    #[test]
    fn test_post_update_idempotent_per_tick() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.velocity.y = 10.0;
        body.pre_update(1.0, &config);
        body.post_update();
        let sprite_y = body.sprite.pos.y;
        body.post_update();
        assert_eq!(body.sprite.pos.y, sprite_y);
    }

    #[test]
    fn test_delta_max_caps_committed_delta() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.velocity.x = 100.0;
        body.delta_max.x = 2.0;
        body.pre_update(1.0, &config);
        let sprite_x0 = body.sprite.pos.x;
        body.post_update();
        assert!((body.sprite.pos.x - sprite_x0 - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_facing_tie_prefers_x() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        body.velocity = Vec3::new(10.0, 10.0, 10.0);
        body.pre_update(1.0, &config);
        body.post_update();
        assert_eq!(body.facing, Facing::FrontX);
    }

    #[test]
    fn test_set_size_and_hit_test() {
        let mut body = test_body(10.0, 10.0, 10.0);
        body.set_size(4.0, 4.0, 4.0, Vec3::ZERO);
        let c = body.bounds().center();
        assert!(body.hit_test(c.x, c.y, c.z));
        assert!(!body.hit_test(c.x + 100.0, c.y, c.z));
    }

    #[test]
    fn test_reset_zeroes_motion_and_repositions() {
        let config = test_config();
        let mut body = test_body(0.0, 0.0, 0.0);
        body.allow_gravity = false;
        body.velocity = Vec3::new(5.0, 6.0, 7.0);
        body.acceleration = Vec3::ONE;
        body.pre_update(1.0, &config);
        body.post_update();

        body.reset(300.0, 300.0, 300.0);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.acceleration, Vec3::ZERO);
        assert_eq!(body.sprite.pos, Vec3::new(300.0, 300.0, 300.0));
        assert_eq!(body.delta_x(), 0.0);
    }

    #[test]
    fn test_scale_change_rederives_extents() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.allow_gravity = false;
        assert_eq!(body.width_x, 8.0);
        body.sprite.scale = Vec2::splat(2.0);
        body.pre_update(1.0, &config);
        assert_eq!(body.width_x, 16.0);
    }

    #[test]
    fn test_speed_and_heading() {
        let mut body = test_body(0.0, 0.0, 0.0);
        body.velocity = Vec3::new(3.0, 4.0, 0.0);
        assert!((body.speed() - 5.0).abs() < 1e-6);
        assert!((body.heading() - (4.0f32).atan2(3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_body_is_inert() {
        let config = test_config();
        let mut body = test_body(100.0, 100.0, 100.0);
        body.enable = false;
        body.velocity.x = 50.0;
        let p0 = body.position;
        body.pre_update(1.0, &config);
        body.post_update();
        assert_eq!(body.position, p0);
    }
}

//! Isoarcade - axonometric projection and arcade physics for 2D renderers
//!
//! Lets a 2D scene graph simulate a third spatial axis (height) with
//! game-appropriate approximations instead of full 3D physics.
//!
//! Core modules:
//! - `cube`: axis-aligned 3D boxes, the bounding volume everything shares
//! - `projector`: 3D-to-2D projection, its inverse, and depth sorting
//! - `physics`: octree broad phase, per-object bodies, and the arcade world
//!
//! The host drives a simulation step in two sub-phases: `World::pre_update`
//! integrates every body, the host issues its `collide`/`overlap` calls, then
//! `World::post_update` commits the resulting position deltas back to the
//! owning display objects.

pub mod cube;
pub mod physics;
pub mod projector;

pub use cube::Cube;
pub use physics::{
    Body, BodyId, Collider, Faces, Facing, Octree, PhysicsEvent, SpriteState, World, WorldConfig,
};
pub use projector::{DepthSortable, Projector};

/// Engine configuration constants
pub mod consts {
    /// 2:1 pixel-art dimetric projection angle, atan(1/2)
    pub const CLASSIC: f32 = 0.463_647_6;
    /// True isometric projection angle (30 degrees)
    pub const ISOMETRIC: f32 = std::f32::consts::FRAC_PI_6;

    /// Slop added to the maximum separation distance so a separation never
    /// displaces a body further than it actually travelled this step
    pub const OVERLAP_BIAS: f32 = 4.0;

    /// Octree node capacity before it splits
    pub const TREE_MAX_OBJECTS: usize = 10;
    /// Octree recursion depth limit
    pub const TREE_MAX_LEVELS: usize = 4;

    /// Default padding for the topological depth sort; dampens flicker from
    /// near-equal boundaries at the cost of precision for packed objects
    pub const SORT_PADDING: f32 = 1.5;
}

//! Arcade-style physics over axonometric space
//!
//! Simplified rigid-body simulation for objects positioned in 3D but rendered
//! in 2D. The model is deliberately game-shaped rather than physically exact:
//! - Axis-aligned boxes only; separation resolves one axis per contact
//! - Velocity integration with drag, gravity, bounce and per-axis caps
//! - Octree broad phase rebuilt from current body bounds on every query
//! - No continuous collision detection; fast bodies can tunnel
//!
//! Step contract: every body completes `pre_update` before any collision
//! query, and every `collide`/`overlap` call completes before `post_update`
//! commits deltas back to the owning display objects.

pub mod body;
pub mod octree;
pub mod world;

pub use body::{Body, SpriteState};
pub use octree::Octree;
pub use world::{Collider, ContactCallback, ProcessCallback, World, WorldConfig};

use serde::{Deserialize, Serialize};

/// Stable handle to a body owned by a [`World`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BodyId(pub u32);

/// Per-face boolean flags for touching/blocked/collision-gate state
///
/// `none` is the aggregate: true while no directional face is set. Face names
/// follow the cube convention: `back_*` is the -axis face, `front_*` the
/// +axis face, `down`/`up` the -z/+z faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faces {
    pub none: bool,
    pub up: bool,
    pub down: bool,
    pub back_x: bool,
    pub back_y: bool,
    pub front_x: bool,
    pub front_y: bool,
}

impl Faces {
    /// Every directional face off
    pub const NONE: Faces = Faces {
        none: true,
        up: false,
        down: false,
        back_x: false,
        back_y: false,
        front_x: false,
        front_y: false,
    };

    /// Every directional face on
    pub const ALL: Faces = Faces {
        none: false,
        up: true,
        down: true,
        back_x: true,
        back_y: true,
        front_x: true,
        front_y: true,
    };

    /// True when any directional face is set
    pub fn any(&self) -> bool {
        self.up || self.down || self.back_x || self.back_y || self.front_x || self.front_y
    }

    pub fn clear(&mut self) {
        *self = Faces::NONE;
    }
}

impl Default for Faces {
    fn default() -> Self {
        Faces::NONE
    }
}

/// Dominant travel direction, classified each step from position deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    None,
    FrontX,
    BackX,
    FrontY,
    BackY,
    Up,
    Down,
}

/// Notifications queued by the world during a step, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsEvent {
    /// A body with the out-of-bounds kill policy left the world bounds
    /// entirely; its sprite has been marked dead
    OutOfBounds(BodyId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_aggregate_flag() {
        let mut faces = Faces::NONE;
        assert!(faces.none);
        assert!(!faces.any());

        faces.front_x = true;
        faces.none = false;
        assert!(faces.any());

        faces.clear();
        assert_eq!(faces, Faces::NONE);
    }

    #[test]
    fn test_body_id_ordering() {
        let mut ids = vec![BodyId(3), BodyId(0), BodyId(7)];
        ids.sort();
        assert_eq!(ids, vec![BodyId(0), BodyId(3), BodyId(7)]);
    }
}

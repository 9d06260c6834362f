//! Collision detection and response against static tile geometry
//!
//! Bodies move one axis at a time. After each single-axis move every solid the
//! body now overlaps pushes it back out along that axis only, against the
//! direction of travel. Resolving X then Y separately removes the diagonal
//! corner ambiguity without a continuous sweep.

use glam::Vec2;

use super::body::{Enemy, Player};
use super::level::LevelGeometry;
use super::rect::Rect;

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What resolving one axis touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisContact {
    /// At least one solid was pushed against
    pub hit: bool,
    /// Pushed up out of a solid while falling
    pub landed: bool,
    /// Pushed down out of a solid while rising
    pub bumped: bool,
}

/// Push `rect` out of `solids` along `axis` given the velocity it moved with.
///
/// Every overlap is resolved against the same direction, so each push only
/// retreats further from solids already cleared. Velocity on the axis is
/// zeroed on any hit.
pub fn resolve_axis(rect: &mut Rect, vel: &mut Vec2, axis: Axis, solids: &[Rect]) -> AxisContact {
    let mut contact = AxisContact::default();
    let dir = match axis {
        Axis::X => vel.x,
        Axis::Y => vel.y,
    };

    for solid in solids {
        if !rect.overlaps(solid) {
            continue;
        }
        contact.hit = true;
        match axis {
            Axis::X => {
                if dir > 0.0 {
                    rect.set_right(solid.left());
                } else if dir < 0.0 {
                    rect.set_left(solid.right());
                }
            }
            Axis::Y => {
                if dir > 0.0 {
                    rect.set_bottom(solid.top());
                    contact.landed = true;
                } else if dir < 0.0 {
                    rect.set_top(solid.bottom());
                    contact.bumped = true;
                }
            }
        }
    }

    if contact.hit {
        match axis {
            Axis::X => vel.x = 0.0,
            Axis::Y => vel.y = 0.0,
        }
    }
    contact
}

/// Result of a full two-axis move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveContacts {
    pub x: AxisContact,
    pub y: AxisContact,
}

/// Move by `vel` on X, resolve, then on Y, resolve. Only solids near the
/// body (spatial grid broad phase) are tested.
pub fn move_and_collide(rect: &mut Rect, vel: &mut Vec2, geometry: &LevelGeometry) -> MoveContacts {
    rect.x += vel.x;
    let solids = geometry.overlapping_solids(rect);
    let x = resolve_axis(rect, vel, Axis::X, &solids);

    rect.y += vel.y;
    let solids = geometry.overlapping_solids(rect);
    let y = resolve_axis(rect, vel, Axis::Y, &solids);

    MoveContacts { x, y }
}

/// Stomp test: falling, with the player's feet above the enemy's middle.
///
/// No previous-frame check is made, so a fast fall into an enemy's side can
/// still read as a stomp.
pub fn is_stomp(player: &Player, enemy: &Enemy) -> bool {
    player.vel.y > 0.0 && player.rect.bottom() < enemy.rect.center_y()
}

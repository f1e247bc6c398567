//! Block-player collision
//!
//! Pure hit tests between the fixed-radius player circle and a resolved
//! block transform. Dispatch follows the block's shape: rectangles get a
//! rotated rounded-rect test, everything else never collides (ellipse
//! blocks are authored in levels but their overlap test is still open).

use glam::Vec3;

use crate::consts::PLAYER_RADIUS;
use crate::level::ShapeKind;
use crate::rotate_vector;

/// Whether the player circle overlaps the block at `pos`/`rot`/`sca`.
pub fn player_hits_block(pos: Vec3, rot: Vec3, sca: Vec3, player: Vec3, shape: ShapeKind) -> bool {
    match shape {
        ShapeKind::Rectangle => circle_rectangle(pos, rot, sca, player),
        ShapeKind::Ellipse => circle_ellipse(pos, rot, sca, player),
        _ => false,
    }
}

/// Rounded-rectangle test in the block's local frame: the player center is
/// counter-rotated around the block, compared against half extents grown by
/// the player radius, with a true distance check in the corner region.
pub fn circle_rectangle(pos: Vec3, rot: Vec3, sca: Vec3, player: Vec3) -> bool {
    let local = rotate_vector(player - pos, -rot.z);

    let distance_x = local.x.abs();
    let distance_y = local.y.abs();

    if distance_x > sca.x / 2.0 + PLAYER_RADIUS {
        return false;
    }
    if distance_y > sca.y / 2.0 + PLAYER_RADIUS {
        return false;
    }
    if distance_x <= sca.x / 2.0 {
        return true;
    }
    if distance_y <= sca.y / 2.0 {
        return true;
    }

    let corner_x = distance_x - sca.x / 2.0;
    let corner_y = distance_y - sca.y / 2.0;
    corner_x * corner_x + corner_y * corner_y <= PLAYER_RADIUS * PLAYER_RADIUS
}

/// Ellipse overlap is unimplemented; ellipse blocks never land a hit.
pub fn circle_ellipse(_pos: Vec3, _rot: Vec3, _sca: Vec3, _player: Vec3) -> bool {
    false
}

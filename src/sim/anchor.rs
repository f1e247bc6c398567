//! Anchors and pivots
//!
//! The nine placement presets resolve to coefficient vectors here: screen
//! anchors scale the playfield border, pivots offset a block from the point
//! it rotates and scales around.

use glam::Vec3;

use crate::consts::RAD2DEG;
use crate::level::AnchorPreset;
use crate::rotate_vector;

/// Coefficients per preset, indexed in declaration order
/// (left/center/right across, top/middle/bottom down).
const ANCHOR_COEFF: [Vec3; 9] = [
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
];

/// Unit-box coefficient for a preset.
#[inline]
pub fn coefficient(preset: AnchorPreset) -> Vec3 {
    ANCHOR_COEFF[preset as usize]
}

/// World position of a preset corner of the playfield.
#[inline]
pub fn center_anchor(border_screen: Vec3, anchor: AnchorPreset) -> Vec3 {
    border_screen * coefficient(anchor)
}

/// Offset that keeps the chosen pivot corner fixed while the block carries
/// rotation `rot_deg` at scale `sca`.
pub fn calculate_pivot(rot_deg: f32, sca: Vec3, pivot: AnchorPreset) -> Vec3 {
    rotate_vector(sca * (coefficient(pivot) / -2.0), rot_deg)
}

/// Point at `radius` from (x, y) along a heading in degrees, 0 pointing
/// down and 90 pointing right.
pub fn point_on_circle(x: f32, y: f32, angle_deg: f32, radius: f32) -> Vec3 {
    let angle = angle_deg - 90.0;
    let direction = Vec3::new((angle / RAD2DEG).cos(), (angle / RAD2DEG).sin(), 0.0);
    Vec3::new(x, y, 0.0) + direction * radius
}

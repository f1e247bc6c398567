//! Blockstorm - a timeline-driven obstacle runtime
//!
//! Core modules:
//! - `level`: Authored level data model (blocks, markers, validation)
//! - `sim`: Deterministic per-frame resolution (noise, easing, hierarchy, collision)
//! - `driver`: 60 Hz frame gate and collaborator publication
//! - `demo`: Seeded procedural demo level

pub mod demo;
pub mod driver;
pub mod level;
pub mod sim;

pub use driver::{DamageSink, RenderSink, Runtime, TickInput};
pub use level::{AuthoringError, BlockDef, EffectsConfig, LevelData};

use glam::Vec3;

/// Runtime configuration constants
pub mod consts {
    /// Timeline resolution (frames per second of level time)
    pub const FRAME_RATE: f32 = 60.0;
    /// Noise lattice seed, fixed for every run of every level
    pub const NOISE_SEED: i32 = 1337;

    /// Player hurt-circle radius, same for every level
    pub const PLAYER_RADIUS: f32 = 0.25;
    /// Half the visible playfield height; width is this times the aspect ratio
    pub const SCREEN_HALF_HEIGHT: f32 = 9.0;

    /// Degrees per radian at the precision the authoring tool bakes angles with
    pub const RAD2DEG: f32 = 57.295_779_513;
}

/// Rotate `v` around the origin by `offset_deg` degrees (z untouched, magnitude from xy)
#[inline]
pub fn rotate_vector(v: Vec3, offset_deg: f32) -> Vec3 {
    use consts::RAD2DEG;
    let power = (v.x * v.x + v.y * v.y).sqrt();
    let angle = v.y.atan2(v.x) * RAD2DEG + offset_deg;
    Vec3::new((angle / RAD2DEG).cos(), (angle / RAD2DEG).sin(), 0.0) * power
}

/// Snap `value` down to a multiple of `step`, clamped to [min, max]
///
/// Bounds may arrive inverted when an author animates from a high start to a
/// low end; `min` then wins the whole range, so this must not use
/// `f32::clamp` (which panics on inverted bounds).
#[inline]
pub fn quantize_step(value: f32, min: f32, max: f32, step: f32) -> f32 {
    ((value / step).floor() * step).min(max).max(min)
}

//! Deterministic resolution module
//!
//! All level evaluation lives here. This module must be pure and deterministic:
//! - Frame index and timer in, values out
//! - Seeded noise only, no frame-time RNG
//! - Stable resolution order (parents before children)
//! - No rendering or platform dependencies

pub mod anchor;
pub mod channel;
pub mod collision;
pub mod easing;
pub mod frame;
pub mod hierarchy;
pub mod noise;

pub use channel::Evaluator;
pub use collision::player_hits_block;
pub use easing::EasingKind;
pub use frame::{FrameResolve, FrameStats, ResolvedBlock, active_set, resolve_frame};
pub use hierarchy::{ResolvePlan, ResolveStep};
pub use noise::NoiseField;

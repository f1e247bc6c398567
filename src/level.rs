//! Authored level data
//!
//! Everything a level file carries: block definitions, their four marker
//! timelines, pivot/anchor presets, and the effects tuning handed to the
//! player collaborator at launch. Validated once; immutable while running.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::easing::EasingKind;

/// Result alias for launch-time validation.
pub type AuthoringResult<T> = std::result::Result<T, AuthoringError>;

/// Rejections raised when a level is handed to the runtime.
///
/// All of these are authoring mistakes: a level that loads cleanly can no
/// longer fail inside the frame loop.
#[derive(Debug, Error)]
pub enum AuthoringError {
    /// Block id 0 is the "no parent" sentinel and cannot name a block.
    #[error("block at index {index} uses reserved id 0")]
    ZeroId { index: usize },
    /// Two blocks share an id, so parent references would be ambiguous.
    #[error("duplicate block id {0}")]
    DuplicateId(u32),
    /// A block lists itself as its parent.
    #[error("block {id} is its own parent")]
    SelfParent { id: u32 },
    /// Active window runs backwards.
    #[error("block {id} ends on frame {end} before starting on frame {start}")]
    InvertedWindow { id: u32, start: i32, end: i32 },
    /// Every channel needs at least one marker to evaluate.
    #[error("block {id} has an empty {channel} timeline")]
    EmptyTimeline { id: u32, channel: &'static str },
}

/// Nine-way placement preset, used both as a screen anchor and as a pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPreset {
    LeftTop,
    CenterTop,
    RightTop,
    LeftMiddle,
    #[default]
    CenterMiddle,
    RightMiddle,
    LeftBottom,
    CenterBottom,
    RightBottom,
}

/// Visible shape of a block. `None` blocks move and collide but never paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    None = 0,
    Rectangle = 1,
    Triangle = 2,
    Spike = 3,
    Ellipse = 4,
}

impl ShapeKind {
    /// Index into the collaborator's sprite table.
    pub fn sprite_index(self) -> usize {
        self as usize
    }

    /// Whether the block publishes color/sprite/layer at all.
    pub fn has_sprite(self) -> bool {
        self != ShapeKind::None
    }
}

/// Randomization mode for the two-component channels (position, scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorMode {
    /// Start value only, no noise.
    #[default]
    N,
    /// Noise-driven slide between start and end.
    Imm,
    /// Like `Imm`, then snapped to multiples of the marker step.
    Mm,
    /// Start point displaced along a noise-picked compass direction.
    C,
    /// Start value scaled by a noise-picked factor between `ex` and `ey`.
    M,
}

/// Randomization mode for the rotation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarMode {
    #[default]
    N,
    Imm,
    Mm,
    /// Start angle scaled by a noise-picked factor between `ea` and `i`.
    M,
}

/// Randomization mode for the color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    N,
    Imm,
    Mm,
}

/// One keyframe on a position timeline.
///
/// `sx`/`sy` are the authored point; `ex`/`ey` are the mode-dependent second
/// operand (end point for `Imm`/`Mm`, radius in `ex` for `C`, factor range
/// for `M`). `i` is the snap step for `Mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosMarker {
    /// Timeline time in seconds.
    pub t: f32,
    /// Curve applied while interpolating *into* this marker.
    #[serde(default)]
    pub easing: EasingKind,
    /// Randomization mode.
    #[serde(default)]
    pub mode: VectorMode,
    /// Screen-corner anchor this marker's point is measured from.
    #[serde(default)]
    pub anchor: AnchorPreset,
    #[serde(default)]
    pub sx: f32,
    #[serde(default)]
    pub sy: f32,
    #[serde(default)]
    pub ex: f32,
    #[serde(default)]
    pub ey: f32,
    #[serde(default)]
    pub i: f32,
}

/// One keyframe on a rotation timeline (degrees, z axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotMarker {
    pub t: f32,
    #[serde(default)]
    pub easing: EasingKind,
    #[serde(default)]
    pub mode: ScalarMode,
    /// Start angle in degrees.
    #[serde(default)]
    pub sa: f32,
    /// End angle (`Imm`/`Mm`) or factor bound (`M`).
    #[serde(default)]
    pub ea: f32,
    /// Snap step (`Mm`) or second factor bound (`M`).
    #[serde(default)]
    pub i: f32,
}

/// One keyframe on a scale timeline. Same field roles as [`PosMarker`],
/// minus the anchor: scale is never screen-relative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaMarker {
    pub t: f32,
    #[serde(default)]
    pub easing: EasingKind,
    #[serde(default)]
    pub mode: VectorMode,
    #[serde(default)]
    pub sx: f32,
    #[serde(default)]
    pub sy: f32,
    #[serde(default)]
    pub ex: f32,
    #[serde(default)]
    pub ey: f32,
    #[serde(default)]
    pub i: f32,
}

/// One keyframe on a color timeline, RGBA in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClrMarker {
    pub t: f32,
    #[serde(default)]
    pub easing: EasingKind,
    #[serde(default)]
    pub mode: ColorMode,
    #[serde(default)]
    pub sr: f32,
    #[serde(default)]
    pub sg: f32,
    #[serde(default)]
    pub sb: f32,
    /// Start alpha.
    #[serde(default)]
    pub sa: f32,
    #[serde(default)]
    pub er: f32,
    #[serde(default)]
    pub eg: f32,
    #[serde(default)]
    pub eb: f32,
    /// End alpha.
    #[serde(default)]
    pub ea: f32,
    /// Per-component snap step for `Mm`.
    #[serde(default)]
    pub i: f32,
}

/// One authored block: identity, active window, shape, and four timelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    /// Unique nonzero id.
    pub id: u32,
    /// Id of the parent block, or 0 for none.
    #[serde(default)]
    pub parent_id: u32,
    /// First frame (inclusive) the block exists on.
    #[serde(default)]
    pub start_frame: i32,
    /// Last frame (inclusive) the block exists on.
    #[serde(default)]
    pub end_frame: i32,
    /// Visible shape; also selects the collision routine.
    #[serde(default)]
    pub shape: ShapeKind,
    /// Whether the block can damage the player.
    #[serde(default)]
    pub collider: bool,
    /// Pivot preset the block rotates and scales around.
    #[serde(default)]
    pub pivot: AnchorPreset,
    /// Draw-order layer, forwarded untouched to the render collaborator.
    #[serde(default)]
    pub layer: i32,
    pub pos: Vec<PosMarker>,
    pub rot: Vec<RotMarker>,
    pub sca: Vec<ScaMarker>,
    pub clr: Vec<ClrMarker>,
}

/// A complete authored level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub blocks: Vec<BlockDef>,
}

impl LevelData {
    /// Launch-time check of every rule a block definition must satisfy.
    ///
    /// Missing parent ids are deliberately *not* rejected here: a dangling
    /// reference degrades to root behavior at runtime and is only logged.
    pub fn validate(&self) -> AuthoringResult<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.blocks.len());
        for (index, block) in self.blocks.iter().enumerate() {
            if block.id == 0 {
                return Err(AuthoringError::ZeroId { index });
            }
            if !seen.insert(block.id) {
                return Err(AuthoringError::DuplicateId(block.id));
            }
            if block.parent_id == block.id {
                return Err(AuthoringError::SelfParent { id: block.id });
            }
            if block.start_frame > block.end_frame {
                return Err(AuthoringError::InvertedWindow {
                    id: block.id,
                    start: block.start_frame,
                    end: block.end_frame,
                });
            }
            for (channel, empty) in [
                ("pos", block.pos.is_empty()),
                ("rot", block.rot.is_empty()),
                ("sca", block.sca.is_empty()),
                ("clr", block.clr.is_empty()),
            ] {
                if empty {
                    return Err(AuthoringError::EmptyTimeline {
                        id: block.id,
                        channel,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Hit-feedback tuning carried at launch and consumed by the player
/// collaborator; the frame core never reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Seconds of invulnerability after a hit.
    pub invuln_secs: f32,
    /// Seconds the player flashes after a hit.
    pub flash_secs: f32,
    /// Camera shake amplitude in world units.
    pub shake_strength: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            invuln_secs: 1.5,
            flash_secs: 0.1,
            shake_strength: 0.35,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_block(id: u32) -> BlockDef {
        BlockDef {
            id,
            parent_id: 0,
            start_frame: 0,
            end_frame: 600,
            shape: ShapeKind::Rectangle,
            collider: true,
            pivot: AnchorPreset::CenterMiddle,
            layer: 0,
            pos: vec![PosMarker {
                t: 0.0,
                easing: EasingKind::Linear,
                mode: VectorMode::N,
                anchor: AnchorPreset::CenterMiddle,
                sx: 0.0,
                sy: 0.0,
                ex: 0.0,
                ey: 0.0,
                i: 0.0,
            }],
            rot: vec![RotMarker {
                t: 0.0,
                easing: EasingKind::Linear,
                mode: ScalarMode::N,
                sa: 0.0,
                ea: 0.0,
                i: 0.0,
            }],
            sca: vec![ScaMarker {
                t: 0.0,
                easing: EasingKind::Linear,
                mode: VectorMode::N,
                sx: 1.0,
                sy: 1.0,
                ex: 0.0,
                ey: 0.0,
                i: 0.0,
            }],
            clr: vec![ClrMarker {
                t: 0.0,
                easing: EasingKind::Linear,
                mode: ColorMode::N,
                sr: 1.0,
                sg: 1.0,
                sb: 1.0,
                sa: 1.0,
                er: 0.0,
                eg: 0.0,
                eb: 0.0,
                ea: 0.0,
                i: 0.0,
            }],
        }
    }

    #[test]
    fn test_validate_accepts_minimal_level() {
        let level = LevelData {
            name: "ok".into(),
            blocks: vec![minimal_block(1), minimal_block(2)],
        };
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_id() {
        let level = LevelData {
            name: String::new(),
            blocks: vec![minimal_block(0)],
        };
        assert!(matches!(
            level.validate(),
            Err(AuthoringError::ZeroId { index: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_id() {
        let level = LevelData {
            name: String::new(),
            blocks: vec![minimal_block(7), minimal_block(7)],
        };
        assert!(matches!(
            level.validate(),
            Err(AuthoringError::DuplicateId(7))
        ));
    }

    #[test]
    fn test_validate_rejects_self_parent() {
        let mut block = minimal_block(3);
        block.parent_id = 3;
        let level = LevelData {
            name: String::new(),
            blocks: vec![block],
        };
        assert!(matches!(
            level.validate(),
            Err(AuthoringError::SelfParent { id: 3 })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut block = minimal_block(4);
        block.start_frame = 100;
        block.end_frame = 50;
        let level = LevelData {
            name: String::new(),
            blocks: vec![block],
        };
        assert!(matches!(
            level.validate(),
            Err(AuthoringError::InvertedWindow { id: 4, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_timeline() {
        let mut block = minimal_block(5);
        block.rot.clear();
        let level = LevelData {
            name: String::new(),
            blocks: vec![block],
        };
        match level.validate() {
            Err(AuthoringError::EmptyTimeline { id: 5, channel }) => {
                assert_eq!(channel, "rot");
            }
            other => panic!("expected empty-timeline error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_parent_is_not_an_authoring_error() {
        let mut block = minimal_block(6);
        block.parent_id = 999;
        let level = LevelData {
            name: String::new(),
            blocks: vec![block],
        };
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_marker_json_defaults() {
        let marker: PosMarker = serde_json::from_str(r#"{"t":1.5,"sx":2.0,"sy":-3.0}"#)
            .expect("terse marker should parse");
        assert_eq!(marker.easing, EasingKind::Linear);
        assert_eq!(marker.mode, VectorMode::N);
        assert_eq!(marker.anchor, AnchorPreset::CenterMiddle);
        assert_eq!(marker.ex, 0.0);
        assert_eq!(marker.i, 0.0);
    }

    #[test]
    fn test_block_json_round_trip() {
        let block = minimal_block(9);
        let json = serde_json::to_string(&block).expect("serialize");
        let back: BlockDef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.id, 9);
        assert_eq!(back.shape, ShapeKind::Rectangle);
        assert_eq!(back.pos.len(), 1);
    }

    #[test]
    fn test_shape_sprite_indices() {
        assert_eq!(ShapeKind::None.sprite_index(), 0);
        assert_eq!(ShapeKind::Rectangle.sprite_index(), 1);
        assert_eq!(ShapeKind::Triangle.sprite_index(), 2);
        assert_eq!(ShapeKind::Spike.sprite_index(), 3);
        assert_eq!(ShapeKind::Ellipse.sprite_index(), 4);
        assert!(!ShapeKind::None.has_sprite());
        assert!(ShapeKind::Ellipse.has_sprite());
    }
}

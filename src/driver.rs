//! Level runtime driver
//!
//! The stateful shell around the pure frame pass: accumulates wall-clock
//! time, gates evaluation to 60 Hz frame boundaries, and publishes each
//! evaluated frame to the render and player collaborators. A stall is
//! caught up with a single evaluation at the newest frame; intermediate
//! frames are never replayed.

use glam::{Vec3, Vec4};

use crate::consts::{FRAME_RATE, NOISE_SEED, SCREEN_HALF_HEIGHT};
use crate::level::{AuthoringResult, EffectsConfig, LevelData, ShapeKind};
use crate::sim::channel::Evaluator;
use crate::sim::frame::{FrameStats, resolve_frame};

/// Per-tick input from the platform layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Player center in world units.
    pub player_pos: Vec3,
}

/// Receives the resolved scene each evaluated frame.
pub trait RenderSink {
    /// Drop the sprites published for the previous frame's `count` slots.
    fn clear(&mut self, count: usize);
    /// Transform for arena slot `slot`; called for every active block.
    fn place(&mut self, slot: usize, pos: Vec3, rot: Vec3, sca: Vec3);
    /// Sprite, color and draw order for `slot`; only called for blocks
    /// with a visible shape.
    fn paint(&mut self, slot: usize, sprite: usize, color: Vec4, layer: i32);
}

/// Receives one call per block overlapping the player per evaluated frame.
pub trait DamageSink {
    fn damage(&mut self);
}

/// A launched level: authored data, the seeded evaluator, and the frame
/// gate. Create with [`Runtime::launch`], then feed wall-clock deltas to
/// [`Runtime::advance`].
#[derive(Debug)]
pub struct Runtime {
    level: LevelData,
    effects: EffectsConfig,
    eval: Evaluator,
    /// (start, end) frame per block, in authored order.
    windows: Vec<(i32, i32)>,
    timer: f32,
    active_frame: i32,
    /// Slots published on the last evaluated frame.
    visible: usize,
    last_stats: FrameStats,
}

impl Runtime {
    /// Validate and arm a level. The noise seed is fixed, so a level looks
    /// the same on every run and every machine.
    pub fn launch(
        level: LevelData,
        effects: EffectsConfig,
        aspect_ratio: f32,
    ) -> AuthoringResult<Self> {
        level.validate()?;

        let windows: Vec<(i32, i32)> = level
            .blocks
            .iter()
            .map(|b| (b.start_frame, b.end_frame))
            .collect();
        let border = Vec3::new(
            SCREEN_HALF_HEIGHT * aspect_ratio,
            SCREEN_HALF_HEIGHT,
            0.0,
        );

        let colliders = level.blocks.iter().filter(|b| b.collider).count();
        let untestable = level
            .blocks
            .iter()
            .filter(|b| b.collider && b.shape != ShapeKind::Rectangle)
            .count();
        log::info!(
            "level '{}' launched: {} blocks, {} colliders, border {:.2}x{:.2}",
            level.name,
            level.blocks.len(),
            colliders,
            border.x,
            border.y
        );
        if untestable > 0 {
            log::warn!(
                "{untestable} collider block(s) use shapes without an overlap test and will never hit"
            );
        }

        Ok(Self {
            level,
            effects,
            eval: Evaluator::new(NOISE_SEED, border),
            windows,
            timer: 0.0,
            active_frame: 0,
            visible: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Level time in seconds.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Seek the level clock; checkpoints restore through this. The next
    /// `advance` evaluates at whatever frame the new time falls on.
    pub fn set_timer(&mut self, timer: f32) {
        self.timer = timer;
    }

    /// Frame index of the last gate crossing.
    pub fn active_frame(&self) -> i32 {
        self.active_frame
    }

    /// Hit-feedback tuning for the player collaborator.
    pub fn effects(&self) -> EffectsConfig {
        self.effects
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    /// Counters from the most recently evaluated frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Advance the clock by `dt` seconds. If the 60 Hz frame index did not
    /// change, nothing is evaluated or published.
    pub fn advance<R: RenderSink, D: DamageSink>(
        &mut self,
        dt: f32,
        input: &TickInput,
        render: &mut R,
        player: &mut D,
    ) {
        self.timer += dt;
        let last_frame = self.active_frame;
        self.active_frame = (self.timer * FRAME_RATE).floor() as i32;
        // evaluation happens on the frame boundary, not at the raw timer
        let frame_timer = self.active_frame as f32 / FRAME_RATE;

        if self.active_frame == last_frame {
            return;
        }

        let resolved = resolve_frame(
            &self.level.blocks,
            &self.windows,
            self.active_frame,
            frame_timer,
            input.player_pos,
            &self.eval,
        );

        render.clear(self.visible);
        self.visible = resolved.blocks.len();

        for (slot, block) in resolved.blocks.iter().enumerate() {
            render.place(slot, block.pos, block.rot, block.sca);
            let def = &self.level.blocks[block.def_index];
            if def.shape.has_sprite() {
                render.paint(slot, def.shape.sprite_index(), block.clr, def.layer);
            }
        }

        for _ in &resolved.hits {
            player.damage();
        }

        if resolved.stats.missing_parents > 0 {
            log::debug!(
                "frame {}: {} dangling parent reference(s)",
                self.active_frame,
                resolved.stats.missing_parents
            );
        }
        self.last_stats = resolved.stats;
    }
}

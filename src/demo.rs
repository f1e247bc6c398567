//! Built-in demo level
//!
//! A procedural showcase used by the binary when no level file is given:
//! a backdrop wash, a gauntlet of sweeping collider walls, a spinning hub
//! with proportionally-geared children, a noise-wander field, and a
//! breathing spike ring. Generation is seeded, so one seed is one level
//! on every run and every machine.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::level::{
    AnchorPreset, BlockDef, ClrMarker, ColorMode, LevelData, PosMarker, RotMarker, ScaMarker,
    ScalarMode, ShapeKind, VectorMode,
};
use crate::sim::easing::EasingKind;

/// Level length in seconds; every authored window fits inside it.
pub const DEMO_LENGTH_SECS: f32 = 60.0;

/// Curves the sweeping walls pick from.
const SWEEP_EASINGS: [EasingKind; 6] = [
    EasingKind::Linear,
    EasingKind::InOutSine,
    EasingKind::OutQuad,
    EasingKind::InOutCubic,
    EasingKind::OutBack,
    EasingKind::InOutQuint,
];

/// Generate the demo level for `seed`.
pub fn generate(seed: u64) -> LevelData {
    let mut builder = Builder {
        rng: Pcg32::seed_from_u64(seed),
        next_id: 1,
        blocks: Vec::new(),
    };

    builder.backdrop();
    builder.sweeper_gauntlet();
    builder.spinner_hub();
    builder.wander_field();
    builder.spike_ring();

    let colliders = builder.blocks.iter().filter(|b| b.collider).count();
    log::info!(
        "demo level seed {seed}: {} blocks, {colliders} colliders, {DEMO_LENGTH_SECS:.0}s",
        builder.blocks.len()
    );

    LevelData {
        name: format!("demo-{seed}"),
        blocks: builder.blocks,
    }
}

struct Builder {
    rng: Pcg32,
    next_id: u32,
    blocks: Vec<BlockDef>,
}

impl Builder {
    fn next_block_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// One huge rectangle behind everything, washing slowly between two hues.
    fn backdrop(&mut self) {
        let id = self.next_block_id();
        self.blocks.push(BlockDef {
            id,
            parent_id: 0,
            start_frame: 0,
            end_frame: secs_to_frame(DEMO_LENGTH_SECS),
            shape: ShapeKind::Rectangle,
            collider: false,
            pivot: AnchorPreset::CenterMiddle,
            layer: -10,
            pos: vec![pos(0.0, 0.0, 0.0)],
            rot: vec![rot(0.0, 0.0)],
            sca: vec![sca(0.0, 40.0, 20.0)],
            clr: vec![
                clr(0.0, 0.07, 0.08, 0.14, 1.0),
                ClrMarker {
                    easing: EasingKind::InOutSine,
                    ..clr(DEMO_LENGTH_SECS, 0.13, 0.07, 0.11, 1.0)
                },
            ],
        });
    }

    /// Walls entering from the right edge and sweeping off the left one,
    /// each on its own lane, curve, and window. These are the threats.
    fn sweeper_gauntlet(&mut self) {
        let count = self.rng.random_range(8..=12);
        for _ in 0..count {
            let lane = self.rng.random_range(-7.0..7.0);
            let height = self.rng.random_range(1.5..4.0);
            let enter = self.rng.random_range(2.0..48.0);
            let duration = self.rng.random_range(2.5..6.0);
            let easing = SWEEP_EASINGS[self.rng.random_range(0..SWEEP_EASINGS.len())];

            // some walls tumble while crossing
            let rot_markers = if self.rng.random_bool(0.3) {
                let spin = self.rng.random_range(-180.0..180.0);
                vec![rot(enter, 0.0), rot(enter + duration, spin)]
            } else {
                vec![rot(enter, 0.0)]
            };

            let id = self.next_block_id();
            self.blocks.push(BlockDef {
                id,
                parent_id: 0,
                start_frame: secs_to_frame(enter),
                end_frame: secs_to_frame(enter + duration),
                shape: ShapeKind::Rectangle,
                collider: true,
                pivot: AnchorPreset::CenterMiddle,
                layer: 2,
                pos: vec![
                    PosMarker {
                        anchor: AnchorPreset::RightMiddle,
                        ..pos(enter, 3.0, lane)
                    },
                    PosMarker {
                        easing,
                        anchor: AnchorPreset::LeftMiddle,
                        ..pos(enter + duration, -3.0, lane)
                    },
                ],
                rot: rot_markers,
                sca: vec![sca(enter, 0.8, height)],
                clr: vec![clr(
                    enter,
                    0.92,
                    self.rng.random_range(0.2..0.4),
                    0.2,
                    1.0,
                )],
            });
        }
    }

    /// A spinning hub whose off-center pivot swings three geared children
    /// around it. The children spin and scale relative to the hub.
    fn spinner_hub(&mut self) {
        let start = 5.0;
        let end = 35.0;
        let hub = self.next_block_id();
        self.blocks.push(BlockDef {
            id: hub,
            parent_id: 0,
            start_frame: secs_to_frame(start),
            end_frame: secs_to_frame(end),
            shape: ShapeKind::Triangle,
            collider: false,
            pivot: AnchorPreset::LeftMiddle,
            layer: 3,
            pos: vec![pos(start, 0.0, 3.0)],
            rot: vec![rot(start, 0.0), rot(end, 720.0)],
            sca: vec![sca(start, 2.0, 2.0)],
            clr: vec![clr(start, 0.95, 0.8, 0.3, 1.0)],
        });

        let offsets = [(2.5, 0.0), (-2.5, 0.0), (0.0, -2.5)];
        for (index, (dx, dy)) in offsets.into_iter().enumerate() {
            // first child's gearing wobbles through noise, the rest are fixed
            let rot_marker = if index == 0 {
                RotMarker {
                    mode: ScalarMode::M,
                    ea: 0.5,
                    i: 1.5,
                    ..rot(start, 1.0)
                }
            } else {
                rot(start, self.rng.random_range(0.5..1.5))
            };

            let id = self.next_block_id();
            self.blocks.push(BlockDef {
                id,
                parent_id: hub,
                start_frame: secs_to_frame(start),
                end_frame: secs_to_frame(end),
                shape: ShapeKind::Spike,
                collider: true,
                pivot: AnchorPreset::CenterMiddle,
                layer: 3,
                pos: vec![pos(start, dx, dy)],
                rot: vec![rot_marker],
                sca: vec![sca(start, 0.9, 0.9)],
                clr: vec![clr(start, 0.4, 0.7, 0.95, 1.0)],
            });
        }
    }

    /// Harmless triangles drifting on raw noise; half of them snapped to a
    /// grid so they stutter instead of glide.
    fn wander_field(&mut self) {
        let count = self.rng.random_range(5..=8);
        for index in 0..count {
            let snapped = index % 2 == 0;
            let step = self.rng.random_range(0.5..1.5);
            let x_min = self.rng.random_range(-10.0..-2.0);
            let x_max = self.rng.random_range(2.0..10.0);
            let y_min = self.rng.random_range(-6.0..-1.0);
            let y_max = self.rng.random_range(1.0..6.0);
            let size = self.rng.random_range(0.6..1.2);

            let id = self.next_block_id();
            self.blocks.push(BlockDef {
                id,
                parent_id: 0,
                start_frame: secs_to_frame(10.0),
                end_frame: secs_to_frame(50.0),
                shape: ShapeKind::Triangle,
                collider: false,
                pivot: AnchorPreset::CenterMiddle,
                layer: 1,
                pos: vec![PosMarker {
                    mode: if snapped { VectorMode::Mm } else { VectorMode::Imm },
                    sx: x_min,
                    ex: x_max,
                    sy: y_min,
                    ey: y_max,
                    i: step,
                    ..pos(10.0, 0.0, 0.0)
                }],
                rot: vec![RotMarker {
                    mode: ScalarMode::Imm,
                    sa: -30.0,
                    ea: 30.0,
                    ..rot(10.0, 0.0)
                }],
                sca: vec![sca(10.0, size, size)],
                clr: vec![ClrMarker {
                    mode: ColorMode::Imm,
                    er: 0.4,
                    eg: 0.6,
                    eb: 1.0,
                    ea: 1.0,
                    ..clr(10.0, 0.1, 0.2, 0.6, 0.6)
                }],
            });
        }
    }

    /// Spikes riding the rim of a circle on noise-picked headings, breathing
    /// through a scale factor and flickering through posterized color.
    fn spike_ring(&mut self) {
        for index in 0..6u32 {
            let id = self.next_block_id();
            self.blocks.push(BlockDef {
                id,
                parent_id: 0,
                start_frame: secs_to_frame(20.0),
                end_frame: secs_to_frame(45.0),
                shape: ShapeKind::Spike,
                collider: true,
                pivot: AnchorPreset::CenterMiddle,
                layer: 2,
                pos: vec![PosMarker {
                    mode: VectorMode::C,
                    ex: index as f32 * 37.0,
                    ey: index as f32 * 11.0,
                    i: 4.0,
                    ..pos(20.0, 0.0, 0.0)
                }],
                rot: vec![RotMarker {
                    mode: ScalarMode::Mm,
                    sa: 0.0,
                    ea: 360.0,
                    i: 45.0,
                    ..rot(20.0, 0.0)
                }],
                sca: vec![ScaMarker {
                    mode: VectorMode::M,
                    ex: 0.7,
                    ey: 1.4,
                    ..sca(20.0, 1.2, 1.2)
                }],
                clr: vec![ClrMarker {
                    mode: ColorMode::Mm,
                    er: 1.0,
                    eg: 0.4,
                    eb: 0.9,
                    ea: 1.0,
                    i: 0.25,
                    ..clr(20.0, 0.5, 0.1, 0.5, 1.0)
                }],
            });
        }
    }
}

fn secs_to_frame(t: f32) -> i32 {
    (t * 60.0) as i32
}

fn pos(t: f32, x: f32, y: f32) -> PosMarker {
    PosMarker {
        t,
        easing: EasingKind::Linear,
        mode: VectorMode::N,
        anchor: AnchorPreset::CenterMiddle,
        sx: x,
        sy: y,
        ex: 0.0,
        ey: 0.0,
        i: 0.0,
    }
}

fn rot(t: f32, deg: f32) -> RotMarker {
    RotMarker {
        t,
        easing: EasingKind::Linear,
        mode: ScalarMode::N,
        sa: deg,
        ea: 0.0,
        i: 0.0,
    }
}

fn sca(t: f32, x: f32, y: f32) -> ScaMarker {
    ScaMarker {
        t,
        easing: EasingKind::Linear,
        mode: VectorMode::N,
        sx: x,
        sy: y,
        ex: 0.0,
        ey: 0.0,
        i: 0.0,
    }
}

fn clr(t: f32, r: f32, g: f32, b: f32, a: f32) -> ClrMarker {
    ClrMarker {
        t,
        easing: EasingKind::Linear,
        mode: ColorMode::N,
        sr: r,
        sg: g,
        sb: b,
        sa: a,
        er: 0.0,
        eg: 0.0,
        eb: 0.0,
        ea: 0.0,
        i: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DamageSink, RenderSink, Runtime, TickInput};
    use crate::level::EffectsConfig;
    use glam::{Vec3, Vec4};

    struct NullRender;

    impl RenderSink for NullRender {
        fn clear(&mut self, _count: usize) {}
        fn place(&mut self, _slot: usize, _pos: Vec3, _rot: Vec3, _sca: Vec3) {}
        fn paint(&mut self, _slot: usize, _sprite: usize, _color: Vec4, _layer: i32) {}
    }

    struct NullPlayer;

    impl DamageSink for NullPlayer {
        fn damage(&mut self) {}
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = serde_json::to_string(&generate(7)).unwrap();
        let b = serde_json::to_string(&generate(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = serde_json::to_string(&generate(1)).unwrap();
        let b = serde_json::to_string(&generate(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_demo_level_validates() {
        assert!(generate(0xB10C).validate().is_ok());
    }

    #[test]
    fn test_demo_exercises_every_mode() {
        let level = generate(42);
        let pos_modes: Vec<VectorMode> = level
            .blocks
            .iter()
            .flat_map(|b| b.pos.iter().map(|m| m.mode))
            .collect();
        let sca_modes: Vec<VectorMode> = level
            .blocks
            .iter()
            .flat_map(|b| b.sca.iter().map(|m| m.mode))
            .collect();
        let rot_modes: Vec<ScalarMode> = level
            .blocks
            .iter()
            .flat_map(|b| b.rot.iter().map(|m| m.mode))
            .collect();
        let clr_modes: Vec<ColorMode> = level
            .blocks
            .iter()
            .flat_map(|b| b.clr.iter().map(|m| m.mode))
            .collect();

        for mode in [
            VectorMode::N,
            VectorMode::Imm,
            VectorMode::Mm,
            VectorMode::C,
        ] {
            assert!(pos_modes.contains(&mode), "missing position mode {mode:?}");
        }
        assert!(sca_modes.contains(&VectorMode::M), "missing scale mode M");
        for mode in [ScalarMode::N, ScalarMode::Imm, ScalarMode::Mm, ScalarMode::M] {
            assert!(rot_modes.contains(&mode), "missing rotation mode {mode:?}");
        }
        for mode in [ColorMode::N, ColorMode::Imm, ColorMode::Mm] {
            assert!(clr_modes.contains(&mode), "missing color mode {mode:?}");
        }
    }

    #[test]
    fn test_demo_has_a_parent_chain() {
        let level = generate(42);
        assert!(level.blocks.iter().any(|b| b.parent_id != 0));
    }

    #[test]
    fn test_demo_runs_under_the_driver() {
        let mut rt = Runtime::launch(generate(3), EffectsConfig::default(), 16.0 / 9.0)
            .expect("demo level is valid");
        let mut render = NullRender;
        let mut player = NullPlayer;

        // mid-level, every section is live
        rt.set_timer(25.0);
        rt.advance(1.0 / 60.0, &TickInput::default(), &mut render, &mut player);
        let stats = rt.last_stats();
        assert!(stats.active > 0);
        assert!(stats.parents > 0);
    }
}

//! Single-frame resolution
//!
//! The pure center of the runtime: given the authored blocks, a frame
//! index, and the evaluation timer, produce every active block's transform,
//! color, and collision outcome. Nothing here carries state between frames;
//! calling twice with the same inputs yields identical output.

use glam::{Vec3, Vec4};

use crate::level::BlockDef;
use crate::sim::anchor::calculate_pivot;
use crate::sim::channel::Evaluator;
use crate::sim::collision::player_hits_block;
use crate::sim::hierarchy;

/// Resolved state of one active block for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBlock {
    /// Index into the level's block list.
    pub def_index: usize,
    pub pos: Vec3,
    /// Euler degrees; only z is ever nonzero.
    pub rot: Vec3,
    pub sca: Vec3,
    pub clr: Vec4,
}

/// Counters for one evaluated frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub active: usize,
    pub parents: usize,
    pub waves: u32,
    pub missing_parents: u32,
    pub hits: u32,
}

/// Output of one frame: blocks in arena order plus the slots that hit.
#[derive(Debug, Clone, Default)]
pub struct FrameResolve {
    pub blocks: Vec<ResolvedBlock>,
    /// Arena slots whose collider overlapped the player, in resolve order.
    pub hits: Vec<usize>,
    pub stats: FrameStats,
}

/// Indices of blocks whose window covers `frame`, in authored order.
pub fn active_set(windows: &[(i32, i32)], frame: i32) -> Vec<usize> {
    windows
        .iter()
        .enumerate()
        .filter(|&(_, &(start, end))| start <= frame && frame <= end)
        .map(|(i, _)| i)
        .collect()
}

/// Resolve every block active on `frame` at evaluation time `timer`.
pub fn resolve_frame(
    defs: &[BlockDef],
    windows: &[(i32, i32)],
    frame: i32,
    timer: f32,
    player: Vec3,
    eval: &Evaluator,
) -> FrameResolve {
    let active = active_set(windows, frame);

    let ids: Vec<u32> = active.iter().map(|&i| defs[i].id).collect();
    let parent_ids: Vec<u32> = active.iter().map(|&i| defs[i].parent_id).collect();
    let (order, parent_count) = hierarchy::classify(&ids, &parent_ids);

    // arena arrays: parent set first, simple blocks after
    let arena_ids: Vec<u32> = order.iter().map(|&k| ids[k]).collect();
    let arena_pids: Vec<u32> = order.iter().map(|&k| parent_ids[k]).collect();
    let plan = hierarchy::resolve_order(&arena_ids, &arena_pids, parent_count);

    let mut out = FrameResolve {
        blocks: order
            .iter()
            .map(|&k| ResolvedBlock {
                def_index: active[k],
                pos: Vec3::ZERO,
                rot: Vec3::ZERO,
                sca: Vec3::ZERO,
                clr: Vec4::ZERO,
            })
            .collect(),
        hits: Vec::new(),
        stats: FrameStats {
            active: active.len(),
            parents: parent_count,
            waves: plan.waves,
            missing_parents: plan.missing_parents,
            hits: 0,
        },
    };

    for step in &plan.steps {
        let def = &defs[out.blocks[step.slot].def_index];
        let (clr, rot, sca, pos) = match step.parent_slot {
            None => {
                let clr = eval.color(&def.clr, timer);
                let rot = eval.rotation(&def.rot, timer);
                let sca = eval.scale(&def.sca, timer);
                let local = calculate_pivot(rot.z, sca, def.pivot);
                let pos = eval.position(&def.pos, timer, local);
                (clr, rot, sca, pos)
            }
            Some(parent_slot) => {
                let parent = out.blocks[parent_slot];
                let parent_pivot = defs[parent.def_index].pivot;
                let clr = eval.color(&def.clr, timer);
                let rot = eval.rotation_child(&def.rot, timer, parent.rot);
                let sca = eval.scale_child(&def.sca, timer, parent.sca);
                let local = calculate_pivot(rot.z, sca, def.pivot);
                let global = calculate_pivot(parent.rot.z, parent.sca, parent_pivot);
                let pos = eval.position_child(&def.pos, timer, local, parent.pos, global);
                (clr, rot, sca, pos)
            }
        };

        let block = &mut out.blocks[step.slot];
        block.clr = clr;
        block.rot = rot;
        block.sca = sca;
        block.pos = pos;

        if def.collider && player_hits_block(pos, rot, sca, player, def.shape) {
            out.hits.push(step.slot);
        }
    }

    out.stats.hits = out.hits.len() as u32;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{
        AnchorPreset, ClrMarker, ColorMode, PosMarker, RotMarker, ScaMarker, ScalarMode,
        ShapeKind, VectorMode,
    };
    use crate::sim::easing::EasingKind;

    fn eval() -> Evaluator {
        Evaluator::new(1337, Vec3::new(16.0, 9.0, 0.0))
    }

    fn pos_n(t: f32, sx: f32, sy: f32) -> PosMarker {
        PosMarker {
            t,
            easing: EasingKind::Linear,
            mode: VectorMode::N,
            anchor: AnchorPreset::CenterMiddle,
            sx,
            sy,
            ex: 0.0,
            ey: 0.0,
            i: 0.0,
        }
    }

    fn sca_n(t: f32, sx: f32, sy: f32) -> ScaMarker {
        ScaMarker {
            t,
            easing: EasingKind::Linear,
            mode: VectorMode::N,
            sx,
            sy,
            ex: 0.0,
            ey: 0.0,
            i: 0.0,
        }
    }

    fn block(id: u32, parent_id: u32) -> BlockDef {
        BlockDef {
            id,
            parent_id,
            start_frame: 0,
            end_frame: 1000,
            shape: ShapeKind::Rectangle,
            collider: false,
            pivot: AnchorPreset::CenterMiddle,
            layer: 0,
            pos: vec![pos_n(0.0, 0.0, 0.0)],
            rot: vec![RotMarker {
                t: 0.0,
                easing: EasingKind::Linear,
                mode: ScalarMode::N,
                sa: 0.0,
                ea: 0.0,
                i: 0.0,
            }],
            sca: vec![sca_n(0.0, 1.0, 1.0)],
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

    fn windows_of(defs: &[BlockDef]) -> Vec<(i32, i32)> {
        defs.iter().map(|d| (d.start_frame, d.end_frame)).collect()
    }

    #[test]
    fn test_active_set_respects_inclusive_windows() {
        let windows = [(0, 10), (5, 20)];
        assert_eq!(active_set(&windows, 3), vec![0]);
        assert_eq!(active_set(&windows, 10), vec![0, 1]);
        assert_eq!(active_set(&windows, 15), vec![1]);
        assert!(active_set(&windows, 21).is_empty());
        assert!(active_set(&windows, -1).is_empty());
    }

    #[test]
    fn test_linear_travel_lands_midway() {
        let mut b = block(1, 0);
        b.pos = vec![pos_n(0.0, 0.0, 0.0), pos_n(1.0, 10.0, 0.0)];
        let defs = vec![b];
        let out = resolve_frame(&defs, &windows_of(&defs), 30, 0.5, Vec3::ZERO, &eval());
        assert_eq!(out.blocks.len(), 1);
        assert!((out.blocks[0].pos - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_child_scale_multiplies_through() {
        let mut parent = block(1, 0);
        parent.sca = vec![sca_n(0.0, 3.0, 3.0)];
        let mut child = block(2, 1);
        child.sca = vec![sca_n(0.0, 2.0, 2.0)];
        let defs = vec![parent, child];
        let out = resolve_frame(&defs, &windows_of(&defs), 5, 0.1, Vec3::ZERO, &eval());

        let child_slot = out
            .blocks
            .iter()
            .find(|b| defs[b.def_index].id == 2)
            .expect("child resolved");
        assert_eq!(child_slot.sca.x, 6.0);
        assert_eq!(child_slot.sca.y, 6.0);
        assert_eq!(out.stats.parents, 1);
    }

    #[test]
    fn test_child_position_rides_parent() {
        let mut parent = block(1, 0);
        parent.pos = vec![pos_n(0.0, 5.0, 0.0)];
        let mut child = block(2, 1);
        child.pos = vec![pos_n(0.0, 1.0, 0.0)];
        let defs = vec![parent, child];
        let out = resolve_frame(&defs, &windows_of(&defs), 5, 0.1, Vec3::ZERO, &eval());

        let child_slot = out
            .blocks
            .iter()
            .find(|b| defs[b.def_index].id == 2)
            .expect("child resolved");
        assert!((child_slot.pos - Vec3::new(6.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_missing_parent_degrades_to_root() {
        let mut orphan = block(1, 42);
        orphan.pos = vec![pos_n(0.0, 2.0, 3.0)];
        let plain = {
            let mut b = block(1, 0);
            b.pos = vec![pos_n(0.0, 2.0, 3.0)];
            b
        };

        let defs_orphan = vec![orphan];
        let defs_plain = vec![plain];
        let out_orphan = resolve_frame(
            &defs_orphan,
            &windows_of(&defs_orphan),
            5,
            0.1,
            Vec3::ZERO,
            &eval(),
        );
        let out_plain = resolve_frame(
            &defs_plain,
            &windows_of(&defs_plain),
            5,
            0.1,
            Vec3::ZERO,
            &eval(),
        );

        assert_eq!(out_orphan.stats.missing_parents, 1);
        assert_eq!(
            out_orphan.blocks[0].pos.to_array(),
            out_plain.blocks[0].pos.to_array()
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut a = block(1, 0);
        a.pos = vec![pos_n(0.0, 0.0, 0.0), pos_n(2.0, 7.0, -4.0)];
        a.rot[0].mode = ScalarMode::Imm;
        a.rot[0].ea = 180.0;
        let mut b = block(2, 1);
        b.sca[0].mode = VectorMode::Imm;
        b.sca[0].ex = 4.0;
        b.sca[0].ey = 4.0;
        let defs = vec![a, b];
        let windows = windows_of(&defs);

        let first = resolve_frame(&defs, &windows, 60, 1.0, Vec3::ZERO, &eval());
        let second = resolve_frame(&defs, &windows, 60, 1.0, Vec3::ZERO, &eval());
        assert_eq!(first.blocks.len(), second.blocks.len());
        for (x, y) in first.blocks.iter().zip(second.blocks.iter()) {
            assert_eq!(x.pos.to_array(), y.pos.to_array());
            assert_eq!(x.rot.to_array(), y.rot.to_array());
            assert_eq!(x.sca.to_array(), y.sca.to_array());
            assert_eq!(x.clr.to_array(), y.clr.to_array());
        }
    }

    #[test]
    fn test_collider_overlap_registers_hit() {
        let mut b = block(1, 0);
        b.collider = true;
        b.sca = vec![sca_n(0.0, 2.0, 2.0)];
        let defs = vec![b];
        let windows = windows_of(&defs);

        let hit = resolve_frame(
            &defs,
            &windows,
            5,
            0.1,
            Vec3::new(1.2, 0.0, 0.0),
            &eval(),
        );
        assert_eq!(hit.hits, vec![0]);
        assert_eq!(hit.stats.hits, 1);

        let miss = resolve_frame(
            &defs,
            &windows,
            5,
            0.1,
            Vec3::new(3.0, 0.0, 0.0),
            &eval(),
        );
        assert!(miss.hits.is_empty());
    }

    #[test]
    fn test_collider_flag_gates_damage() {
        let mut b = block(1, 0);
        b.collider = false;
        b.sca = vec![sca_n(0.0, 4.0, 4.0)];
        let defs = vec![b];
        let out = resolve_frame(&defs, &windows_of(&defs), 5, 0.1, Vec3::ZERO, &eval());
        assert!(out.hits.is_empty());
    }

    #[test]
    fn test_shapeless_collider_never_hits() {
        let mut b = block(1, 0);
        b.collider = true;
        b.shape = ShapeKind::None;
        b.sca = vec![sca_n(0.0, 4.0, 4.0)];
        let defs = vec![b];
        let out = resolve_frame(&defs, &windows_of(&defs), 5, 0.1, Vec3::ZERO, &eval());
        assert!(out.hits.is_empty());
    }

    #[test]
    fn test_inactive_blocks_stay_out_of_the_arena() {
        let mut early = block(1, 0);
        early.end_frame = 10;
        let mut late = block(2, 0);
        late.start_frame = 100;
        let defs = vec![early, late];
        let windows = windows_of(&defs);

        let out = resolve_frame(&defs, &windows, 50, 50.0 / 60.0, Vec3::ZERO, &eval());
        assert!(out.blocks.is_empty());
        assert_eq!(out.stats.active, 0);

        let out = resolve_frame(&defs, &windows, 5, 5.0 / 60.0, Vec3::ZERO, &eval());
        assert_eq!(out.blocks.len(), 1);
        assert_eq!(defs[out.blocks[0].def_index].id, 1);
    }
}

//! Timeline channel evaluation
//!
//! Stateless per-frame sampling of the four marker channels. Every call
//! walks the marker list for the current time, computes both endpoint
//! values (noise included), and eases between them with the curve of the
//! marker being entered. Nothing here stores per-block state: the same
//! (markers, timer) pair always yields the same result.

use glam::{Vec3, Vec4};

use crate::level::{ClrMarker, ColorMode, PosMarker, RotMarker, ScaMarker, ScalarMode, VectorMode};
use crate::quantize_step;
use crate::sim::anchor::{center_anchor, point_on_circle};
use crate::sim::noise::NoiseField;

/// Anything that sits on a timeline at a fixed timestamp.
trait Timed: Copy {
    fn time(&self) -> f32;
}

impl Timed for PosMarker {
    fn time(&self) -> f32 {
        self.t
    }
}
impl Timed for RotMarker {
    fn time(&self) -> f32 {
        self.t
    }
}
impl Timed for ScaMarker {
    fn time(&self) -> f32 {
        self.t
    }
}
impl Timed for ClrMarker {
    fn time(&self) -> f32 {
        self.t
    }
}

/// Where `timer` falls on a marker list.
enum Segment<M> {
    /// Clamped to a single marker: lone marker, before the first, or past
    /// the last.
    At(M),
    Between { start: M, end: M },
}

/// Find the segment for `timer`. Timestamps are trusted to be ascending;
/// if they are not, the first pair enclosing `timer` wins.
fn segment<M: Timed>(markers: &[M], timer: f32) -> Segment<M> {
    if markers.len() == 1 || markers[0].time() >= timer {
        return Segment::At(markers[0]);
    }
    let last = markers[markers.len() - 1];
    if last.time() <= timer {
        return Segment::At(last);
    }

    let mut start = markers[0];
    let mut end = markers[0];
    for pair in markers.windows(2) {
        if pair[0].time() <= timer && pair[1].time() >= timer {
            start = pair[0];
            end = pair[1];
            break;
        }
    }
    Segment::Between { start, end }
}

/// Channel evaluator: the shared noise field plus the playfield border
/// that screen anchors are measured against.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    noise: NoiseField,
    border_screen: Vec3,
}

impl Evaluator {
    pub fn new(seed: i32, border_screen: Vec3) -> Self {
        Self {
            noise: NoiseField::new(seed),
            border_screen,
        }
    }

    /// Position of a root block. `local` is the block's own pivot offset.
    pub fn position(&self, markers: &[PosMarker], timer: f32, local: Vec3) -> Vec3 {
        match segment(markers, timer) {
            Segment::At(m) => self.pos_value(&m, local),
            Segment::Between { start, end } => {
                let a = self.pos_value(&start, local);
                let b = self.pos_value(&end, local);
                let progress = (timer - start.t) / (end.t - start.t);
                a + (b - a) * end.easing.apply(progress)
            }
        }
    }

    /// Position of a child block: the parent's resolved position and pivot
    /// offset fold into the anchor chain before the marker value applies.
    pub fn position_child(
        &self,
        markers: &[PosMarker],
        timer: f32,
        local: Vec3,
        parent_pos: Vec3,
        global: Vec3,
    ) -> Vec3 {
        match segment(markers, timer) {
            Segment::At(m) => self.pos_value_child(&m, local, parent_pos, global),
            Segment::Between { start, end } => {
                let a = self.pos_value_child(&start, local, parent_pos, global);
                let b = self.pos_value_child(&end, local, parent_pos, global);
                let progress = (timer - start.t) / (end.t - start.t);
                a + (b - a) * end.easing.apply(progress)
            }
        }
    }

    /// Z-axis rotation in degrees, as a vector for the collaborator.
    ///
    /// Between markers more than 180 degrees apart the end angle is lifted
    /// a full turn so the blend takes the short way round.
    pub fn rotation(&self, markers: &[RotMarker], timer: f32) -> Vec3 {
        match segment(markers, timer) {
            Segment::At(m) => Vec3::new(0.0, 0.0, self.rot_value(&m)),
            Segment::Between { start, end } => {
                let a = self.rot_value(&start);
                let mut b = self.rot_value(&end);
                if (b - a).abs() > 180.0 {
                    b += 360.0;
                }
                let progress = (timer - start.t) / (end.t - start.t);
                Vec3::new(0.0, 0.0, a + (b - a) * end.easing.apply(progress))
            }
        }
    }

    /// Child rotation; the parent angle scales each marker's value before
    /// the short-way fix and the blend.
    pub fn rotation_child(&self, markers: &[RotMarker], timer: f32, parent_rot: Vec3) -> Vec3 {
        match segment(markers, timer) {
            Segment::At(m) => Vec3::new(0.0, 0.0, self.rot_value_child(&m, parent_rot.z)),
            Segment::Between { start, end } => {
                let a = self.rot_value_child(&start, parent_rot.z);
                let mut b = self.rot_value_child(&end, parent_rot.z);
                if (b - a).abs() > 180.0 {
                    b += 360.0;
                }
                let progress = (timer - start.t) / (end.t - start.t);
                Vec3::new(0.0, 0.0, a + (b - a) * end.easing.apply(progress))
            }
        }
    }

    pub fn scale(&self, markers: &[ScaMarker], timer: f32) -> Vec3 {
        match segment(markers, timer) {
            Segment::At(m) => self.sca_value(&m),
            Segment::Between { start, end } => {
                let a = self.sca_value(&start);
                let b = self.sca_value(&end);
                let progress = (timer - start.t) / (end.t - start.t);
                a + (b - a) * end.easing.apply(progress)
            }
        }
    }

    /// Child scale: the parent's scale multiplies componentwise.
    pub fn scale_child(&self, markers: &[ScaMarker], timer: f32, parent_sca: Vec3) -> Vec3 {
        match segment(markers, timer) {
            Segment::At(m) => self.sca_value_child(&m, parent_sca),
            Segment::Between { start, end } => {
                let a = self.sca_value_child(&start, parent_sca);
                let b = self.sca_value_child(&end, parent_sca);
                let progress = (timer - start.t) / (end.t - start.t);
                a + (b - a) * end.easing.apply(progress)
            }
        }
    }

    /// RGBA color. Color has no child variant; parents never tint.
    pub fn color(&self, markers: &[ClrMarker], timer: f32) -> Vec4 {
        match segment(markers, timer) {
            Segment::At(m) => self.clr_value(&m),
            Segment::Between { start, end } => {
                let a = self.clr_value(&start);
                let b = self.clr_value(&end);
                let progress = (timer - start.t) / (end.t - start.t);
                a + (b - a) * end.easing.apply(progress)
            }
        }
    }

    fn pos_value(&self, m: &PosMarker, local: Vec3) -> Vec3 {
        let full_offset = center_anchor(self.border_screen, m.anchor) + local;
        self.pos_modes(m, full_offset)
    }

    fn pos_value_child(&self, m: &PosMarker, local: Vec3, parent_pos: Vec3, global: Vec3) -> Vec3 {
        let full_offset =
            center_anchor(self.border_screen, m.anchor) + local + global + parent_pos;
        self.pos_modes(m, full_offset)
    }

    /// Mode arm shared by root and child positions; only the offset the
    /// marker value lands on differs.
    fn pos_modes(&self, m: &PosMarker, full_offset: Vec3) -> Vec3 {
        match m.mode {
            VectorMode::N => full_offset + Vec3::new(m.sx, m.sy, 0.0),
            VectorMode::Imm => {
                let xu = self.noise.sample01(m.sx, m.ex, m.t);
                let yu = self.noise.sample01(m.t, m.sy, m.ey);
                let x = m.sx + (m.ex - m.sx) * xu;
                let y = m.sy + (m.ey - m.sy) * yu;
                full_offset + Vec3::new(x, y, 0.0)
            }
            VectorMode::Mm => {
                let xu = self.noise.sample01(m.sx, m.ex, m.t);
                let yu = self.noise.sample01(m.t, m.sy, m.ey);
                let x = quantize_step(m.sx + (m.ex - m.sx) * xu, m.sx, m.ex, m.i);
                let y = quantize_step(m.sy + (m.ey - m.sy) * yu, m.sy, m.ey, m.i);
                full_offset + Vec3::new(x, y, 0.0)
            }
            VectorMode::C => {
                let angle = self.noise.sample(m.ex, m.t, m.ey);
                full_offset + point_on_circle(m.sx, m.sy, angle, m.i)
            }
            VectorMode::M => {
                let factor = self.noise.sample01(m.ex, m.t, m.ey);
                full_offset + Vec3::new(m.sx, m.sy, 0.0) * (m.ex + (m.ey - m.ex) * factor)
            }
        }
    }

    fn rot_value(&self, m: &RotMarker) -> f32 {
        match m.mode {
            ScalarMode::N => m.sa,
            ScalarMode::Imm => {
                let u = self.noise.sample01(m.sa, m.t, m.ea);
                m.sa + (m.ea - m.sa) * u
            }
            ScalarMode::Mm => {
                let u = self.noise.sample01(m.sa, m.t, m.ea);
                quantize_step(m.sa + (m.ea - m.sa) * u, m.sa, m.ea, m.i)
            }
            ScalarMode::M => {
                let factor = self.noise.sample01(m.ea, m.t, m.i);
                m.sa * (m.ea + (m.i - m.ea) * factor)
            }
        }
    }

    /// Child rotation arms. The parent factor lands on a different operand
    /// per mode (on the noise term in `Imm`, on the whole value elsewhere);
    /// levels are authored against exactly this behavior.
    fn rot_value_child(&self, m: &RotMarker, parent_z: f32) -> f32 {
        match m.mode {
            ScalarMode::N => m.sa * parent_z,
            ScalarMode::Imm => {
                let u = self.noise.sample01(m.sa, m.t, m.ea);
                m.sa + (m.ea - m.sa) * u * parent_z
            }
            ScalarMode::Mm => {
                let u = self.noise.sample01(m.sa, m.t, m.ea);
                quantize_step(m.sa + (m.ea - m.sa) * u, m.sa, m.ea, m.i) * parent_z
            }
            ScalarMode::M => {
                let factor = self.noise.sample01(m.ea, m.t, m.i);
                m.sa * (m.ea + (m.i - m.ea) * factor) * parent_z
            }
        }
    }

    fn sca_value(&self, m: &ScaMarker) -> Vec3 {
        match m.mode {
            VectorMode::N => Vec3::new(m.sx, m.sy, 0.0),
            VectorMode::Imm => {
                let xu = self.noise.sample01(m.sx, m.ex, m.t);
                let yu = self.noise.sample01(m.t, m.sy, m.ey);
                let x = m.sx + (m.ex - m.sx) * xu;
                let y = m.sy + (m.ey - m.sy) * yu;
                Vec3::new(x, y, 0.0)
            }
            VectorMode::Mm => {
                let xu = self.noise.sample01(m.sx, m.ex, m.t);
                let yu = self.noise.sample01(m.t, m.sy, m.ey);
                let x = quantize_step(m.sx + (m.ex - m.sx) * xu, m.sx, m.ex, m.i);
                let y = quantize_step(m.sy + (m.ey - m.sy) * yu, m.sy, m.ey, m.i);
                Vec3::new(x, y, 0.0)
            }
            VectorMode::C => {
                let angle = self.noise.sample(m.ex, m.t, m.ey);
                point_on_circle(m.sx, m.sy, angle, m.i)
            }
            VectorMode::M => {
                let factor = self.noise.sample01(m.ex, m.t, m.ey);
                Vec3::new(m.sx, m.sy, 0.0) * (m.ex + (m.ey - m.ex) * factor)
            }
        }
    }

    fn sca_value_child(&self, m: &ScaMarker, parent_sca: Vec3) -> Vec3 {
        self.sca_value(m) * parent_sca
    }

    fn clr_value(&self, m: &ClrMarker) -> Vec4 {
        match m.mode {
            ColorMode::N => Vec4::new(m.sr, m.sg, m.sb, m.sa),
            ColorMode::Imm => {
                let ru = self.noise.sample01(m.t, m.sr, m.er);
                let gu = self.noise.sample01(m.sg, m.t, m.eg);
                let bu = self.noise.sample01(m.sb, m.eb, m.t);
                let au = self.noise.sample01(m.sa, -m.t, m.ea);
                Vec4::new(
                    m.sr + (m.er - m.sr) * ru,
                    m.sg + (m.eg - m.sg) * gu,
                    m.sb + (m.eb - m.sb) * bu,
                    m.sa + (m.ea - m.sa) * au,
                )
            }
            ColorMode::Mm => {
                let ru = self.noise.sample01(m.t, m.sr, m.er);
                let gu = self.noise.sample01(m.sg, m.t, m.eg);
                let bu = self.noise.sample01(m.sb, m.eb, m.t);
                let au = self.noise.sample01(m.sa, -m.t, m.ea);
                Vec4::new(
                    quantize_step(m.sr + (m.er - m.sr) * ru, m.sr, m.er, m.i),
                    quantize_step(m.sg + (m.eg - m.sg) * gu, m.sg, m.eg, m.i),
                    quantize_step(m.sb + (m.eb - m.sb) * bu, m.sb, m.eb, m.i),
                    quantize_step(m.sa + (m.ea - m.sa) * au, m.sa, m.ea, m.i),
                )
            }
        }
    }
}

//! Easing curves
//!
//! The marker interpolation curves. `Constant` floors its input, so a
//! segment holds the start value until the destination marker's timestamp.
//! `Back` and `Elastic` overshoot [0, 1] on purpose.

use serde::{Deserialize, Serialize};

const C1: f32 = 1.70158;
const C2: f32 = C1 * 1.525;
const C3: f32 = C1 + 1.0;
const C4: f32 = 2.0 * std::f32::consts::PI / 3.0;
const C5: f32 = 2.0 * std::f32::consts::PI / 4.5;

/// Interpolation curve, selected per marker and applied while easing
/// *into* that marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingKind {
    #[default]
    Linear,
    Constant,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
}

impl EasingKind {
    /// Remap segment progress `x` (0 at the previous marker, 1 at this one)
    /// onto the curve.
    pub fn apply(self, x: f32) -> f32 {
        use EasingKind::*;
        use std::f32::consts::PI;
        match self {
            Linear => x,
            Constant => x.floor(),

            InSine => 1.0 - ((x * PI) / 2.0).cos(),
            OutSine => ((x * PI) / 2.0).sin(),
            InOutSine => -((PI * x).cos() - 1.0) / 2.0,

            InQuad => x * x,
            OutQuad => 1.0 - (1.0 - x).powf(2.0),
            InOutQuad => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powf(2.0) / 2.0
                }
            }

            InCubic => x * x * x,
            OutCubic => 1.0 - (1.0 - x).powf(3.0),
            InOutCubic => {
                if x < 0.5 {
                    4.0 * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powf(3.0) / 2.0
                }
            }

            InQuart => x * x * x * x,
            OutQuart => 1.0 - (1.0 - x).powf(4.0),
            InOutQuart => {
                if x < 0.5 {
                    8.0 * x * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powf(4.0) / 2.0
                }
            }

            InQuint => x * x * x * x * x,
            OutQuint => 1.0 - (1.0 - x).powf(5.0),
            InOutQuint => {
                if x < 0.5 {
                    16.0 * x * x * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powf(5.0) / 2.0
                }
            }

            InExpo => {
                if x == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * x - 10.0)
                }
            }
            OutExpo => {
                if x == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * x)
                }
            }
            InOutExpo => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else if x < 0.5 {
                    2f32.powf(20.0 * x - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * x + 10.0)) / 2.0
                }
            }

            InCirc => 1.0 - (1.0 - x.powf(2.0)).sqrt(),
            OutCirc => (1.0 - (x - 1.0).powf(2.0)).sqrt(),
            InOutCirc => {
                if x < 0.5 {
                    (1.0 - (1.0 - (2.0 * x).powf(2.0)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * x + 2.0).powf(2.0)).sqrt() + 1.0) / 2.0
                }
            }

            InBack => C3 * x * x * x - C1 * x * x,
            OutBack => 1.0 + C3 * (x - 1.0).powf(3.0) + C1 * (x - 1.0).powf(2.0),
            InOutBack => {
                if x < 0.5 {
                    ((2.0 * x).powf(2.0) * ((C2 + 1.0) * 2.0 * x - C2)) / 2.0
                } else {
                    ((2.0 * x - 2.0).powf(2.0) * ((C2 + 1.0) * (x * 2.0 - 2.0) + C2) + 2.0) / 2.0
                }
            }

            InElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else {
                    -2f32.powf(10.0 * x - 10.0) * ((x * 10.0 - 10.75) * C4).sin()
                }
            }
            OutElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else {
                    2f32.powf(-10.0 * x) * ((x * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
            InOutElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else if x < 0.5 {
                    -(2f32.powf(20.0 * x - 10.0) * ((20.0 * x - 11.125) * C5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * x + 10.0) * ((20.0 * x - 11.125) * C5).sin()) / 2.0 + 1.0
                }
            }
        }
    }
}

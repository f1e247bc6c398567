//! Seeded 3D gradient noise
//!
//! Smooth coherent noise over a unit lattice: per-corner gradients from a
//! wrapping integer hash of (seed, cell), quintic-faded trilinear blend of
//! the corner dot products. Every randomized marker value in the game is a
//! lookup into this field, so two runs of a level are identical.

/// World-to-lattice scale applied to every sample coordinate.
const FREQUENCY: f32 = 0.01;

const X_PRIME: i32 = 1619;
const Y_PRIME: i32 = 31337;
const Z_PRIME: i32 = 6971;

/// Hashed corner gradients; 12 edge directions plus 4 repeats to fill the
/// 4-bit selector.
const GRAD_3D: [[f32; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, -1.0],
];

/// Deterministic noise field; the whole state is the seed.
#[derive(Debug, Clone, Copy)]
pub struct NoiseField {
    seed: i32,
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        Self { seed }
    }

    /// Raw noise at (x, y, z), in [-1, 1].
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let x = x * FREQUENCY;
        let y = y * FREQUENCY;
        let z = z * FREQUENCY;

        let x0 = fast_floor(x);
        let y0 = fast_floor(y);
        let z0 = fast_floor(z);
        let x1 = x0.wrapping_add(1);
        let y1 = y0.wrapping_add(1);
        let z1 = z0.wrapping_add(1);

        let xd0 = x - x0 as f32;
        let yd0 = y - y0 as f32;
        let zd0 = z - z0 as f32;
        let xd1 = xd0 - 1.0;
        let yd1 = yd0 - 1.0;
        let zd1 = zd0 - 1.0;

        let xs = quintic(xd0);
        let ys = quintic(yd0);
        let zs = quintic(zd0);

        let s = self.seed;
        let xf00 = lerp(
            grad_coord(s, x0, y0, z0, xd0, yd0, zd0),
            grad_coord(s, x1, y0, z0, xd1, yd0, zd0),
            xs,
        );
        let xf10 = lerp(
            grad_coord(s, x0, y1, z0, xd0, yd1, zd0),
            grad_coord(s, x1, y1, z0, xd1, yd1, zd0),
            xs,
        );
        let xf01 = lerp(
            grad_coord(s, x0, y0, z1, xd0, yd0, zd1),
            grad_coord(s, x1, y0, z1, xd1, yd0, zd1),
            xs,
        );
        let xf11 = lerp(
            grad_coord(s, x0, y1, z1, xd0, yd1, zd1),
            grad_coord(s, x1, y1, z1, xd1, yd1, zd1),
            xs,
        );

        let yf0 = lerp(xf00, xf10, ys);
        let yf1 = lerp(xf01, xf11, ys);
        lerp(yf0, yf1, zs)
    }

    /// Noise remapped to [0, 1], the form most marker modes consume.
    pub fn sample01(&self, x: f32, y: f32, z: f32) -> f32 {
        self.sample(x, y, z) / 2.0 + 0.5
    }
}

/// Truncate-then-step floor. Whole negative inputs land one cell lower
/// than `f32::floor`; the lattice layout depends on that.
#[inline]
fn fast_floor(f: f32) -> i32 {
    if f >= 0.0 { f as i32 } else { f as i32 - 1 }
}

#[inline]
fn quintic(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Gradient for one lattice corner dotted with the offset to the sample
/// point. All integer arithmetic wraps.
#[inline]
fn grad_coord(seed: i32, x: i32, y: i32, z: i32, xd: f32, yd: f32, zd: f32) -> f32 {
    let mut hash = seed;
    hash ^= X_PRIME.wrapping_mul(x);
    hash ^= Y_PRIME.wrapping_mul(y);
    hash ^= Z_PRIME.wrapping_mul(z);

    hash = hash
        .wrapping_mul(hash)
        .wrapping_mul(hash)
        .wrapping_mul(60493);
    hash = (hash >> 13) ^ hash;

    let g = GRAD_3D[(hash & 15) as usize];
    xd * g[0] + yd * g[1] + zd * g[2]
}

use geomrep_common::Placement;
use glam::{Quat, Vec3};

/// Deterministic generator for scatter layouts, seeded per run.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, range)`.
    pub fn next_f32(&mut self, range: f32) -> f32 {
        // Top 24 bits fill an f32 mantissa exactly.
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        unit * range
    }
}

/// Scatter `count` placements over a square field of side `area` centred on the
/// origin, with random yaw and scale in `[min_scale, min_scale + scale_range)`.
pub fn scatter(count: usize, seed: u64, area: f32, min_scale: f32, scale_range: f32) -> Vec<Placement> {
    let mut rng = SplitMix64::new(seed);
    let half = area * 0.5;
    (0..count)
        .map(|_| {
            let x = rng.next_f32(area) - half;
            let z = rng.next_f32(area) - half;
            let yaw = rng.next_f32(360.0).to_radians();
            let scale = min_scale + rng.next_f32(scale_range);
            Placement::new(Vec3::new(x, 0.0, z), Quat::from_rotation_y(yaw), scale)
        })
        .collect()
}

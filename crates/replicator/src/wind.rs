use std::ops::Range;

use geomrep_mesh::VertexBuffer;
use glam::Vec3;

/// Sway state of one output vertex.
///
/// Advances along the wind velocity until its cycle time runs out, then eases
/// back at half speed and snaps to rest once the cycle time drops below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    /// Post-placement, pre-animation position.
    pub original_position: Vec3,
    pub displacement: Vec3,
    /// Seconds into the current cycle.
    pub elapsed: f32,
    pub reversing: bool,
    /// Animator clock value when this vertex was last stepped.
    pub last_update: f64,
}

impl MotionState {
    pub fn new(original_position: Vec3) -> Self {
        Self {
            original_position,
            displacement: Vec3::ZERO,
            elapsed: 0.0,
            reversing: false,
            last_update: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.original_position + self.displacement
    }

    /// Step the sway by `dt` seconds.
    pub fn advance(&mut self, dt: f32, velocity: Vec3, cycle_period: f32) {
        if !self.reversing {
            self.displacement += velocity * dt;
            self.elapsed += dt;
            if self.elapsed > cycle_period {
                self.reversing = true;
            }
        } else {
            let dt = dt * 0.5;
            self.displacement -= velocity * dt;
            self.elapsed -= dt;
            if self.elapsed < 0.0 {
                self.reversing = false;
                self.displacement = Vec3::ZERO;
                self.elapsed = 0.0;
            }
        }
    }
}

/// Which vertices sway, how, and which batch of copies is next.
#[derive(Debug, Clone, PartialEq)]
pub struct WindMotion {
    slots: Vec<u32>,
    batch_size: usize,
    velocity: Vec3,
    cycle_period: f32,
    cursor: usize,
}

impl WindMotion {
    pub fn new(slots: Vec<u32>, batch_size: usize, velocity: Vec3, cycle_period: f32) -> Self {
        Self {
            slots,
            batch_size,
            velocity,
            cycle_period,
            cursor: 0,
        }
    }

    /// Vertex slots within one copy that move.
    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn cycle_period(&self) -> f32 {
        self.cycle_period
    }

    /// First copy of the next batch.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Copies covered by the next batch.
    pub fn window(&self, replica_count: usize) -> Range<usize> {
        let start = self.cursor.min(replica_count);
        start..(start + self.batch_size).min(replica_count)
    }

    /// Move past the current batch, wrapping to the first copy after the last.
    pub fn advance_cursor(&mut self, replica_count: usize) {
        self.cursor += self.batch_size;
        if self.cursor >= replica_count {
            self.cursor = 0;
        }
    }
}

/// Step every tracked vertex in `window` and write the new positions.
///
/// Only the window's vertex range is locked. Returns the number of vertices
/// written, or `None` if the buffer could not be locked.
pub(crate) fn animate_window(
    buffer: &mut VertexBuffer,
    motion: &mut [MotionState],
    wind: &WindMotion,
    window: Range<usize>,
    vertices_per_copy: usize,
    clock: f64,
    max_vertex_step: f32,
) -> Option<usize> {
    let mut lock = buffer.lock(window.start * vertices_per_copy, window.len() * vertices_per_copy)?;
    let mut written = 0;
    for (local_copy, copy) in window.enumerate() {
        for &slot in wind.slots() {
            let slot = slot as usize;
            let state = &mut motion[copy * vertices_per_copy + slot];
            let dt = ((clock - state.last_update) as f32).clamp(0.0, max_vertex_step);
            state.last_update = clock;
            state.advance(dt, wind.velocity(), wind.cycle_period());
            lock.set_position(local_copy * vertices_per_copy + slot, state.position());
            written += 1;
        }
    }
    Some(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VELOCITY: Vec3 = Vec3::new(0.2, -0.2, 0.2);

    #[test]
    fn advancing_accumulates_velocity() {
        let mut state = MotionState::new(Vec3::ONE);
        state.advance(0.1, VELOCITY, 0.4);
        state.advance(0.1, VELOCITY, 0.4);
        assert!(!state.reversing);
        assert!((state.displacement - VELOCITY * 0.2).length() < 1e-6);
        assert!((state.position() - (Vec3::ONE + VELOCITY * 0.2)).length() < 1e-6);
    }

    #[test]
    fn reverses_after_cycle_then_returns_to_rest() {
        let mut state = MotionState::new(Vec3::ZERO);
        let mut ticks = 0;
        while !state.reversing {
            state.advance(0.1, VELOCITY, 0.4);
            ticks += 1;
            assert!(ticks < 10, "never started reversing");
        }
        assert!(state.elapsed > 0.4);
        let peak = state.displacement;

        // Eases back at half speed.
        state.advance(0.1, VELOCITY, 0.4);
        assert!((state.displacement - (peak - VELOCITY * 0.05)).length() < 1e-6);

        let mut ticks = 0;
        while state.reversing {
            state.advance(0.1, VELOCITY, 0.4);
            ticks += 1;
            assert!(ticks < 100, "never returned to rest");
        }
        assert_eq!(state.displacement, Vec3::ZERO);
        assert_eq!(state.elapsed, 0.0);
    }

    #[test]
    fn reverse_takes_twice_as_long() {
        let mut state = MotionState::new(Vec3::ZERO);
        let mut forward = 0;
        while !state.reversing {
            state.advance(0.01, VELOCITY, 0.1);
            forward += 1;
        }
        let mut backward = 0;
        while state.reversing {
            state.advance(0.01, VELOCITY, 0.1);
            backward += 1;
        }
        assert!(backward >= 2 * forward - 2 && backward <= 2 * forward + 2);
    }

    #[test]
    fn window_clamps_and_cursor_wraps() {
        let mut wind = WindMotion::new(vec![2, 3], 4, VELOCITY, 0.4);
        assert_eq!(wind.window(10), 0..4);
        wind.advance_cursor(10);
        assert_eq!(wind.window(10), 4..8);
        wind.advance_cursor(10);
        assert_eq!(wind.window(10), 8..10);
        wind.advance_cursor(10);
        assert_eq!(wind.cursor(), 0);
        assert_eq!(wind.window(10), 0..4);
    }

    #[test]
    fn batch_covering_everything_stays_at_zero() {
        let mut wind = WindMotion::new(vec![0], 5, VELOCITY, 0.4);
        assert_eq!(wind.window(5), 0..5);
        wind.advance_cursor(5);
        assert_eq!(wind.cursor(), 0);
    }
}

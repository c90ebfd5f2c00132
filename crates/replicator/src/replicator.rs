use std::any::Any;
use std::time::Instant;

use geomrep_common::{Aabb, Placement};
use geomrep_mesh::{Geometry, IndexBuffer, VertexBuffer};
use geomrep_scene::{Component, Drawable};
use glam::Vec3;

use crate::config::{IndexStride, ReplicatorConfig};
use crate::indices::{max_index_stride, remap_indices};
use crate::source::{SourceVertices, capture_indices};
use crate::ticker::FixedTicker;
use crate::wind::{MotionState, WindMotion, animate_window};

/// Packs many transformed copies of one geometry into a single draw, and sways
/// selected vertices of every copy with a simple wind model.
///
/// Owns its geometry. Hosts call [`replicate`](Self::replicate) once when
/// building the scene and then feed frame time through [`tick`](Self::tick)
/// (or through [`Component::update`] when attached to a scene).
pub struct GeomReplicator {
    geometry: Geometry,
    config: ReplicatorConfig,
    replica_count: usize,
    vertices_per_copy: usize,
    /// One entry per output vertex, in output order. Empty unless tracking motion.
    motion: Vec<MotionState>,
    wind: Option<WindMotion>,
    ticker: FixedTicker,
    /// Animator time in seconds; only runs while the ticker is enabled.
    clock: f64,
    /// Bounds of the copies at rest, before any sway margin.
    rest_bounds: Aabb,
}

impl GeomReplicator {
    pub fn new(geometry: Geometry) -> Self {
        Self::with_config(geometry, ReplicatorConfig::default())
    }

    pub fn with_config(geometry: Geometry, config: ReplicatorConfig) -> Self {
        let vertices_per_copy = geometry.vertex_buffer().vertex_count();
        let rest_bounds = geometry.bounding_box();
        Self {
            geometry,
            config,
            replica_count: 0,
            vertices_per_copy,
            motion: Vec::new(),
            wind: None,
            ticker: FixedTicker::new(config.wind.step_interval),
            clock: 0.0,
            rest_bounds,
        }
    }

    pub fn config(&self) -> &ReplicatorConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Direct buffer access for hosts that upload or restore lost data.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    /// Copies produced by the last replicate.
    pub fn replica_count(&self) -> usize {
        self.replica_count
    }

    /// Vertices in each copy's block. Equals the source vertex count unless
    /// `IndexStride::MaxIndex` dropped unreferenced trailing vertices.
    pub fn vertices_per_copy(&self) -> usize {
        self.vertices_per_copy
    }

    pub fn motion_states(&self) -> &[MotionState] {
        &self.motion
    }

    pub fn wind(&self) -> Option<&WindMotion> {
        self.wind.as_ref()
    }

    /// Whether wind steps are currently subscribed to the clock.
    pub fn is_wind_active(&self) -> bool {
        self.wind.is_some() && self.ticker.is_enabled()
    }

    /// Replace the geometry's contents with one transformed copy per placement.
    ///
    /// Normals are rotated with each placement, or set to `normal_override`
    /// when given (e.g. straight up, so foliage lights evenly). Any other
    /// attribute is copied as-is. Returns the number of placements.
    ///
    /// Wind state is discarded; call [`apply_wind_velocity`](Self::apply_wind_velocity)
    /// again afterwards.
    pub fn replicate(&mut self, placements: &[Placement], normal_override: Option<Vec3>) -> usize {
        let _span = tracing::info_span!("replicate", replicas = placements.len()).entered();
        let started = Instant::now();

        self.wind = None;
        self.motion.clear();
        self.ticker.set_enabled(false);
        self.ticker.reset();

        let (vertex_buffer, index_buffer) = self.geometry.buffers_mut();
        let source_indices = capture_indices(index_buffer);
        let per_copy = block_size(
            self.config.index_stride,
            vertex_buffer.vertex_count(),
            source_indices.as_deref(),
        );

        let bounds = replicate_vertices(vertex_buffer, placements, normal_override, per_copy);
        if let Some(bounds) = bounds {
            self.vertices_per_copy = per_copy;
            self.replica_count = placements.len();
            self.rest_bounds = bounds;
            if self.config.track_motion {
                self.motion = (0..vertex_buffer.vertex_count())
                    .map(|i| MotionState::new(vertex_buffer.position(i)))
                    .collect();
            }
        }

        let index_count = match source_indices {
            Some(source) => replicate_indices(index_buffer, &source, per_copy, placements.len()),
            None => {
                tracing::warn!("index buffer unavailable, indices not replicated");
                None
            }
        }
        .unwrap_or_else(|| index_buffer.index_count());

        self.geometry.set_draw_range(0, index_count);
        if let Some(bounds) = bounds {
            self.geometry.set_bounding_box(bounds);
        }

        tracing::info!(
            replicas = placements.len(),
            vertices = self.geometry.vertex_buffer().vertex_count(),
            indices = index_count,
            large_indices = self.geometry.index_buffer().is_large(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "replicated geometry"
        );

        placements.len()
    }

    /// Start swaying `slots` (vertex indices within one copy) of every copy.
    ///
    /// `batch_size` copies are stepped per animation tick. Returns false when
    /// there is nothing to animate: no copies, no motion tracking, or no slots.
    /// The bounding box is widened by the furthest a vertex can sway.
    ///
    /// # Panics
    /// If any slot is not below the per-copy vertex count, or `batch_size` is zero.
    pub fn apply_wind_velocity(
        &mut self,
        slots: &[u32],
        batch_size: usize,
        velocity: Vec3,
        cycle_period: f32,
    ) -> bool {
        for &slot in slots {
            assert!(
                (slot as usize) < self.vertices_per_copy,
                "wind slot {slot} out of range for {} vertices per copy",
                self.vertices_per_copy
            );
        }
        assert!(batch_size > 0, "wind batch size must be positive");

        if self.replica_count == 0 || self.motion.is_empty() || slots.is_empty() {
            tracing::debug!(
                replicas = self.replica_count,
                tracked = self.motion.len(),
                slots = slots.len(),
                "wind not applied: nothing to animate"
            );
            return false;
        }

        for copy in 0..self.replica_count {
            for &slot in slots {
                self.motion[copy * self.vertices_per_copy + slot as usize].last_update = self.clock;
            }
        }
        // Elapsed time overshoots the cycle by at most one clamped step before reversing.
        let reach = velocity.abs() * (cycle_period.max(0.0) + self.config.wind.max_vertex_step);
        self.geometry.set_bounding_box(self.rest_bounds.expanded(reach));
        self.wind = Some(WindMotion::new(slots.to_vec(), batch_size, velocity, cycle_period));
        self.ticker.reset();
        self.ticker.set_enabled(true);

        tracing::info!(
            slots = slots.len(),
            batch_size,
            ?velocity,
            cycle_period,
            "wind applied"
        );
        true
    }

    /// Pause (`true`) or resume (`false`) wind steps. Sway state is kept.
    pub fn stop_wind_velocity(&mut self, stop: bool) {
        tracing::debug!(stop, "wind subscription toggled");
        self.ticker.set_enabled(!stop);
    }

    /// Feed host frame time. Runs one wind step when the fixed interval is due.
    ///
    /// Returns true if a step wrote to the vertex buffer.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.wind.is_none() || !self.ticker.is_enabled() {
            return false;
        }
        self.clock += f64::from(dt);
        if !self.ticker.advance(dt) {
            return false;
        }
        self.step_wind()
    }

    fn step_wind(&mut self) -> bool {
        let Some(wind) = self.wind.as_mut() else {
            return false;
        };
        let window = wind.window(self.replica_count);
        let written = animate_window(
            self.geometry.vertex_buffer_mut(),
            &mut self.motion,
            wind,
            window.clone(),
            self.vertices_per_copy,
            self.clock,
            self.config.wind.max_vertex_step,
        );
        match written {
            Some(written) => {
                wind.advance_cursor(self.replica_count);
                tracing::trace!(?window, written, "wind step");
                true
            }
            None => {
                tracing::warn!(?window, "vertex buffer unavailable, wind step skipped");
                false
            }
        }
    }
}

/// Vertices written per copy, which is also the index offset between copies.
///
/// `MaxIndex` keeps only the vertices up to the largest referenced index, so
/// index and vertex blocks share one stride. Without readable indices every
/// source vertex is kept.
fn block_size(stride: IndexStride, vertex_count: usize, indices: Option<&[u32]>) -> usize {
    match (stride, indices) {
        (IndexStride::MaxIndex, Some(indices)) => max_index_stride(indices).min(vertex_count),
        _ => vertex_count,
    }
}

/// Overwrite `buffer` with one transformed copy of its first `per_copy` vertices
/// per placement.
///
/// Returns the bounds of every written position, or `None` if a lock failed and
/// the buffer was left as it was.
fn replicate_vertices(
    buffer: &mut VertexBuffer,
    placements: &[Placement],
    normal_override: Option<Vec3>,
    per_copy: usize,
) -> Option<Aabb> {
    let Some(source) = SourceVertices::capture(buffer) else {
        tracing::warn!("vertex buffer unavailable, vertices not replicated");
        return None;
    };
    let n = per_copy.min(source.vertex_count);
    let total = n * placements.len();

    buffer.set_size(total);
    let Some(mut lock) = buffer.lock(0, total) else {
        tracing::warn!("vertex buffer lock failed after resize");
        return None;
    };

    let mut bounds = Aabb::EMPTY;
    for (i, placement) in placements.iter().enumerate() {
        let matrix = placement.matrix();
        for j in 0..n {
            let slot = i * n + j;
            lock.vertex_mut(slot).copy_from_slice(source.vertex(j));

            let position = matrix.transform_point3(source.position(j));
            lock.set_position(slot, position);
            bounds.merge(position);

            if let Some(normal) = source.normal(j) {
                lock.set_normal(slot, normal_override.unwrap_or(placement.rotation * normal));
            }
        }
    }
    Some(bounds)
}

/// Replace `buffer` with `copies` remapped copies of `source`. Returns the new count.
fn replicate_indices(
    buffer: &mut IndexBuffer,
    source: &[u32],
    stride: usize,
    copies: usize,
) -> Option<usize> {
    let data = remap_indices(source, stride, copies);
    let count = data.len();
    buffer.lock()?.replace(data);
    Some(count)
}

impl Drawable for GeomReplicator {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

impl Component for GeomReplicator {
    fn type_name(&self) -> &'static str {
        "GeomReplicator"
    }

    fn update(&mut self, dt: f32) {
        self.tick(dt);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

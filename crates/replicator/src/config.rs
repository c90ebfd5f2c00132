use serde::{Deserialize, Serialize};

/// How far apart consecutive copies' index blocks are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStride {
    /// Offset by the source vertex count.
    #[default]
    VertexCount,
    /// Offset by the largest source index + 1, for meshes whose index buffer
    /// does not reach every vertex. Each copy keeps only that many vertices.
    MaxIndex,
}

/// Timing for the wind animator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Seconds between animation steps, independent of the frame rate.
    pub step_interval: f32,
    /// Largest time step a single vertex may take, in seconds.
    pub max_vertex_step: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            step_interval: 1.0 / 60.0,
            max_vertex_step: 0.1,
        }
    }
}

/// Replicator behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicatorConfig {
    pub index_stride: IndexStride,
    /// Record per-vertex motion state at replicate time so wind can be applied.
    pub track_motion: bool,
    pub wind: WindConfig,
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self {
            index_stride: IndexStride::VertexCount,
            track_motion: true,
            wind: WindConfig::default(),
        }
    }
}

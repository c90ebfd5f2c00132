//! Geometry replication: one source mesh expanded into N transformed copies in a
//! single vertex/index buffer pair, with optional per-vertex wind sway.
//!
//! # Invariants
//! - Copy `i` owns vertices `[i * n, (i + 1) * n)` where `n` is the source vertex count.
//! - Every remapped index stays inside its own copy's block when the source mesh is
//!   consistent; the source is trusted, not validated.
//! - A buffer that cannot be locked leaves that buffer stale for the step; nothing
//!   is propagated to the caller.
//! - Wind only rewrites position fields, and only inside the current batch window.

mod config;
mod indices;
mod replicator;
mod source;
mod ticker;
mod wind;

pub use config::{IndexStride, ReplicatorConfig, WindConfig};
pub use indices::{LARGE_INDEX_THRESHOLD, remap_indices};
pub use replicator::GeomReplicator;
pub use ticker::FixedTicker;
pub use wind::{MotionState, WindMotion};

pub fn crate_info() -> &'static str {
    "geomrep-replicator v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("replicator"));
    }
}

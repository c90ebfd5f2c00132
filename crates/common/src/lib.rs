//! Shared value types used across the replication workspace.
//!
//! # Invariants
//! - Placements use a uniform scale; the replicator relies on this when it
//!   rotates normals without renormalizing.
//! - An empty `Aabb` is inverted (min > max) and contains nothing.

mod bounds;
mod types;

pub use bounds::Aabb;
pub use types::{NodeId, Placement};

//! Mesh object model: the host-side buffers the replicator reads from and writes into.
//!
//! Vertex data is kept as raw interleaved bytes described by an [`ElementMask`],
//! the way a GPU vertex buffer would hold it. Writes go through scoped lock guards
//! ([`VertexLock`], [`IndexLock`]) that record the touched range on drop so a
//! renderer can re-upload only what changed.
//!
//! # Invariants
//! - Every vertex layout contains a position, stored first, as three `f32`.
//! - A buffer whose data is lost refuses to lock; callers skip the step.
//! - Locks borrow the buffer mutably, so at most one is alive at a time.

mod buffer;
mod element;
mod geometry;
pub mod primitives;

pub use buffer::{IndexBuffer, IndexData, IndexLock, MeshError, VertexBuffer, VertexLock};
pub use element::ElementMask;
pub use geometry::{DrawRange, Geometry};

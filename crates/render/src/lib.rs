//! Rendering adapter: renderer-agnostic interface over scene drawables.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Output derives only from drawable geometry, node positions, and the view.
//!
//! Actual GPU drawing is left to the host. The crate ships a debug text
//! renderer for CLI output and a stats renderer that counts what a GPU
//! backend would be asked to draw.

mod renderer;

pub use renderer::{DebugTextRenderer, FrameStats, RenderView, Renderer, StatsRenderer};

pub fn crate_info() -> &'static str {
    "geomrep-render v0.1.0"
}
